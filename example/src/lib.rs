use anyhow::Result;
use serde::{Deserialize, Serialize};
use simple_captions::{CaptionEvent, ConnectionId, Controller};

/// one line of input. mirrors what a media engine would hand the controller
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inbound {
    Caption(CaptionEvent),
    #[serde(rename_all = "camelCase")]
    Name {
        connection_id: ConnectionId,
        name: String,
    },
}

impl Inbound {
    pub fn parse(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    pub fn dispatch(self, controller: &Controller) -> Result<()> {
        match self {
            Inbound::Caption(event) => controller.caption(event),
            Inbound::Name {
                connection_id,
                name,
            } => controller.set_name(connection_id, name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_caption_lines() {
        let line = r#"{"type":"caption","streamId":"s1","caption":"hi","connection":{"connectionId":"c1","creationTime":1000000}}"#;
        match Inbound::parse(line).unwrap() {
            Inbound::Caption(event) => {
                assert_eq!(event.stream_id, "s1");
                assert_eq!(event.caption, "hi");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn parses_name_lines() {
        let line = r#"{"type":"name","connectionId":"c1","name":"Ada"}"#;
        match Inbound::parse(line).unwrap() {
            Inbound::Name {
                connection_id,
                name,
            } => {
                assert_eq!(connection_id, "c1");
                assert_eq!(name, "Ada");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_types() {
        assert!(Inbound::parse(r#"{"type":"publish"}"#).is_err());
    }
}
