use tokio::sync::mpsc;

use crate::internal::buffer::CaptionBuffer;
use crate::internal::events::InternalCmd;
use crate::internal::timer::ExpiryTimer;
use crate::surface::CaptionSurface;

/// owns the buffer. caption events, name signals and timer firings are applied one at a time,
/// in the order they were received
pub async fn run<S, T>(mut buffer: CaptionBuffer<S, T>, mut rx: mpsc::UnboundedReceiver<InternalCmd>)
where
    S: CaptionSurface,
    T: ExpiryTimer,
{
    while let Some(cmd) = rx.recv().await {
        match cmd {
            InternalCmd::Caption { event, received } => buffer.handle_caption(event, received),
            InternalCmd::Name { connection, name } => buffer.set_name(&connection, name),
            InternalCmd::Expired { source, deadline } => buffer.expire(&source, deadline),
            InternalCmd::Shutdown => break,
        }
    }
    log::debug!("caption thread exiting");
    buffer.close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::data_types::CaptionEvent;
    use crate::internal::events::EmittedEvents;
    use crate::internal::timer::TokioTimer;
    use crate::surface::ChannelSurface;
    use crate::CaptionConfig;
    use std::time::Duration;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn deadline_counts_from_arrival() {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let buffer = CaptionBuffer::new(
            &CaptionConfig::default(),
            ChannelSurface::new(event_tx),
            TokioTimer::new(cmd_tx.clone()),
        )
        .unwrap();

        cmd_tx
            .send(InternalCmd::Caption {
                event: CaptionEvent {
                    stream_id: "s1".into(),
                    caption: "hi".into(),
                    connection: None,
                },
                received: Instant::now(),
            })
            .unwrap();
        // the event sits in the queue for 300ms before the thread picks it up
        tokio::time::advance(Duration::from_millis(300)).await;
        let worker = tokio::spawn(run(buffer, cmd_rx));

        assert_eq!(
            event_rx.recv().await,
            Some(EmittedEvents::Captions {
                text: "Guest: hi".into()
            })
        );

        tokio::time::sleep(Duration::from_millis(199)).await;
        assert!(event_rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(
            event_rx.recv().await,
            Some(EmittedEvents::Captions { text: "".into() })
        );

        cmd_tx.send(InternalCmd::Shutdown).unwrap();
        worker.await.unwrap();
    }
}
