use tokio::time::Instant;

use crate::internal::data_types::{CaptionEvent, ConnectionId, SourceId};

/// Used by the controller to communicate with its consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmittedEvents {
    /// the full caption text, one "name: text" line per live source, most recent last.
    /// replaces whatever was displayed before
    Captions { text: String },
}

/// everything that mutates the buffer goes through this channel, so mutations never overlap
#[derive(Debug)]
pub enum InternalCmd {
    Caption {
        event: CaptionEvent,
        /// stamped by the controller when the engine handed the event over
        received: Instant,
    },
    /// a participant announced its name
    Name { connection: ConnectionId, name: String },
    /// sent by the timer task armed for `deadline`
    Expired { source: SourceId, deadline: Instant },
    Shutdown,
}
