use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One discovered job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobLead {
    pub title: String,
    pub company: String,
    pub location: String,
    pub url: String,
}

/// A single frame from the agent, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProtocolMessage {
    Status { message: String },
    Result { data: Vec<JobLead> },
    Error { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("payload matches no known message shape: {0}")]
    UnknownShape(String),
}

impl ProtocolMessage {
    /// Decodes one frame payload. Non-JSON text and well-formed JSON of an
    /// unknown shape are reported separately.
    pub fn decode(payload: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value = serde_json::from_str(payload)
            .map_err(|err| ProtocolError::InvalidJson(err.to_string()))?;
        serde_json::from_value(value).map_err(|err| ProtocolError::UnknownShape(err.to_string()))
    }

    /// `result` and `error` end the campaign; nothing may follow them.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProtocolMessage::Status { .. })
    }

    pub fn status(message: impl Into<String>) -> Self {
        ProtocolMessage::Status {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_each_shape() {
        assert_eq!(
            ProtocolMessage::decode(r#"{"type":"status","message":"Searching listings..."}"#),
            Ok(ProtocolMessage::status("Searching listings..."))
        );
        assert_eq!(
            ProtocolMessage::decode(r#"{"type":"error","message":"Login timed out"}"#),
            Ok(ProtocolMessage::Error {
                message: "Login timed out".to_string()
            })
        );
        let result = ProtocolMessage::decode(
            r#"{"type":"result","data":[{"title":"SWE","company":"Google","location":"Remote","url":"https://example.com/1"}]}"#,
        )
        .unwrap();
        match result {
            ProtocolMessage::Result { data } => {
                assert_eq!(data.len(), 1);
                assert_eq!(data[0].title, "SWE");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_result_is_a_valid_terminal_message() {
        let msg = ProtocolMessage::decode(r#"{"type":"result","data":[]}"#).unwrap();
        assert!(msg.is_terminal());
        assert_eq!(msg, ProtocolMessage::Result { data: Vec::new() });
    }

    #[test]
    fn rejects_non_json_and_unknown_shapes() {
        assert!(matches!(
            ProtocolMessage::decode("not json at all"),
            Err(ProtocolError::InvalidJson(_))
        ));
        assert!(matches!(
            ProtocolMessage::decode(r#"{"type":"progress","percent":40}"#),
            Err(ProtocolError::UnknownShape(_))
        ));
        assert!(matches!(
            ProtocolMessage::decode(r#"{"type":"result","data":"nope"}"#),
            Err(ProtocolError::UnknownShape(_))
        ));
        assert!(matches!(
            ProtocolMessage::decode("[1,2,3]"),
            Err(ProtocolError::UnknownShape(_))
        ));
    }

    #[test]
    fn status_is_not_terminal() {
        assert!(!ProtocolMessage::status("working").is_terminal());
        assert!(ProtocolMessage::Error {
            message: "x".into()
        }
        .is_terminal());
    }
}
