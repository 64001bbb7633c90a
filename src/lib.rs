use anyhow::{anyhow, bail, Result};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

mod config;
mod internal;
mod surface;

use crate::internal::background_thread;
use crate::internal::events::InternalCmd;
use crate::internal::timer::TokioTimer;

// public exports
pub use config::*;
pub use internal::buffer::CaptionBuffer;
pub use internal::data_types::*;
pub use internal::events::EmittedEvents;
pub use internal::names::{NameCache, FALLBACK_NAME};
pub use internal::timer::ExpiryTimer;
pub use surface::*;

/// simple-captions
/// Keeps the live captions of a WebRTC session on screen.
///
/// The media engine reports a caption for a subscribed stream whenever one is recognized. The
/// `Controller` shows the latest caption of up to `max_captions` streams at once. A stream's
/// caption is taken down `timeout_ms` after its last event, or sooner if a newer stream needs
/// its slot. Every change is emitted as `EmittedEvents::Captions`, containing the full text
/// to display.
///
/// This library is not responsible for producing captions. Connecting to the session,
/// subscribing and enabling captions on the subscriber all happen elsewhere.
pub struct Controller {
    /// feeds the background thread which owns the buffer
    cmd_tx: mpsc::UnboundedSender<InternalCmd>,
    worker: Option<JoinHandle<()>>,
}

// a lazy version of the builder pattern
pub struct InitArgs {
    pub config: CaptionConfig,
    pub emitted_event_chan: mpsc::UnboundedSender<EmittedEvents>,
}

/// The following functions are driven by the media engine:
/// caption
/// set_name
///
/// deinit is called when the session ends
impl Controller {
    /// must be called from within a tokio runtime
    pub fn init(args: InitArgs) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<InternalCmd>();

        let buffer = CaptionBuffer::new(
            &args.config,
            ChannelSurface::new(args.emitted_event_chan),
            TokioTimer::new(cmd_tx.clone()),
        )?;
        log::info!(
            "showing up to {} captions for {}ms each",
            args.config.max_captions,
            args.config.timeout_ms
        );

        let worker = tokio::spawn(background_thread::run(buffer, cmd_rx));

        Ok(Self {
            cmd_tx,
            worker: Some(worker),
        })
    }

    /// a caption was received for a subscribed stream. its timeout starts now, even if the
    /// background thread is still busy with earlier events
    pub fn caption(&self, event: CaptionEvent) -> Result<()> {
        self.send(InternalCmd::Caption {
            event,
            received: Instant::now(),
        })
    }

    /// a participant announced its name. replaces the generated guest name
    pub fn set_name(&self, connection: ConnectionId, name: String) -> Result<()> {
        self.send(InternalCmd::Name { connection, name })
    }

    /// cancels all pending timers and clears the captions
    pub async fn deinit(&mut self) -> Result<()> {
        let worker = match self.worker.take() {
            Some(w) => w,
            None => bail!("controller is not running"),
        };
        if self.cmd_tx.send(InternalCmd::Shutdown).is_err() {
            log::warn!("caption thread exited early");
        }
        worker.await?;
        Ok(())
    }

    fn send(&self, cmd: InternalCmd) -> Result<()> {
        if self.worker.is_none() {
            bail!("controller is not running");
        }
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow!("controller is not running"))
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        // the timer holds a sender too, so the thread won't notice the controller is gone
        if self.worker.is_some() {
            let _ = self.cmd_tx.send(InternalCmd::Shutdown);
        }
    }
}
