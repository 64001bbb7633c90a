use anyhow::{Context, Result};
use tokio::sync::mpsc;

use crate::EmittedEvents;

/// somewhere to put the rendered captions. every write replaces the whole surface
pub trait CaptionSurface {
    fn write(&mut self, text: &str) -> Result<()>;
}

/// forwards each render to the controlling process as an `EmittedEvents::Captions`
pub struct ChannelSurface {
    emitted_event_chan: mpsc::UnboundedSender<EmittedEvents>,
}

impl ChannelSurface {
    pub fn new(emitted_event_chan: mpsc::UnboundedSender<EmittedEvents>) -> Self {
        Self { emitted_event_chan }
    }
}

impl CaptionSurface for ChannelSurface {
    fn write(&mut self, text: &str) -> Result<()> {
        self.emitted_event_chan
            .send(EmittedEvents::Captions { text: text.into() })
            .context("caption event receiver was dropped")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_surface_emits_captions() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut surface = ChannelSurface::new(tx);
        surface.write("Guest00000: hi").unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            EmittedEvents::Captions {
                text: "Guest00000: hi".into()
            }
        );
    }

    #[test]
    fn channel_surface_reports_closed_receiver() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let mut surface = ChannelSurface::new(tx);
        assert!(surface.write("lost").is_err());
    }
}
