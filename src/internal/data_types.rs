use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// uniquely identifies the stream a caption came from
pub type SourceId = String;

/// identifies a participant. one connection may publish several streams
pub type ConnectionId = String;

/// describes the participant which originated a stream, as reported by the media engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    pub connection_id: ConnectionId,
    /// milliseconds since the epoch. some engines omit it
    #[serde(default)]
    pub creation_time: Option<u64>,
}

/// a caption-received notification for a subscribed stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionEvent {
    pub stream_id: SourceId,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub connection: Option<ConnectionInfo>,
}

/// a source which currently has text on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionEntry {
    pub source_id: SourceId,
    // kept so that a later name signal can relabel the entry
    pub connection_id: Option<ConnectionId>,
    pub display_name: String,
    pub text: String,
    pub deadline: Instant,
}

impl CaptionEntry {
    pub fn line(&self) -> String {
        format!("{}: {}", self.display_name, self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caption_event_from_engine_json() {
        let json = r#"{
            "streamId": "s1",
            "caption": "hello",
            "connection": { "connectionId": "c1", "creationTime": 1000000 }
        }"#;
        let event: CaptionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.stream_id, "s1");
        assert_eq!(event.caption, "hello");
        let conn = event.connection.unwrap();
        assert_eq!(conn.connection_id, "c1");
        assert_eq!(conn.creation_time, Some(1000000));
    }

    #[test]
    fn caption_event_tolerates_missing_fields() {
        let event: CaptionEvent = serde_json::from_str(r#"{"streamId": "s2"}"#).unwrap();
        assert_eq!(event.caption, "");
        assert!(event.connection.is_none());

        let event: CaptionEvent =
            serde_json::from_str(r#"{"streamId": "s3", "connection": {"connectionId": "c9"}}"#)
                .unwrap();
        assert_eq!(event.connection.unwrap().creation_time, None);
    }
}
