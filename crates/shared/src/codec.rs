//! Text-frame codec
//!
//! Frames are single-line UTF-8 JSON documents. `serde_json::to_string`
//! never emits raw newlines, so the encoded form is always newline-free.

use crate::error::ProtocolError;
use crate::messages::{ClientMessage, ServerMessage};

/// Serialize a client message into a text frame.
pub fn encode_client(message: &ClientMessage) -> Result<String, ProtocolError> {
    serde_json::to_string(message).map_err(ProtocolError::Encode)
}

/// Parse a text frame received from the server.
pub fn decode_server(text: &str) -> Result<ServerMessage, ProtocolError> {
    serde_json::from_str(text).map_err(ProtocolError::Decode)
}

/// Serialize a server message into a text frame (server side and test doubles).
pub fn encode_server(message: &ServerMessage) -> Result<String, ProtocolError> {
    serde_json::to_string(message).map_err(ProtocolError::Encode)
}

/// Parse a text frame received from a client (server side and test doubles).
pub fn decode_client(text: &str) -> Result<ClientMessage, ProtocolError> {
    serde_json::from_str(text).map_err(ProtocolError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tableau_domain::PlayerNumber;

    #[test]
    fn decode_reports_malformed_frames() {
        assert!(matches!(
            decode_server("not json"),
            Err(ProtocolError::Decode(_))
        ));
        assert!(matches!(
            decode_server(r#"{"slotIndex": 1}"#),
            Err(ProtocolError::Decode(_))
        ));
        assert!(matches!(
            decode_server(r#"{"type": "card_placed", "slotIndex": 1, "byPlayer": 7}"#),
            Err(ProtocolError::Decode(_))
        ));
    }

    #[test]
    fn decode_rejects_card_value_out_of_range() {
        assert!(matches!(
            decode_server(
                r#"{"type":"peek_result","slotIndex":0,"card":{"suit":"C","value":250}}"#
            ),
            Err(ProtocolError::Decode(_))
        ));
    }

    #[test]
    fn decode_accepts_server_frames() {
        let msg = decode_server(r#"{"type":"card_placed","slotIndex":4,"byPlayer":2}"#)
            .expect("valid frame");
        assert_eq!(
            msg,
            ServerMessage::CardPlaced {
                slot_index: 4,
                by_player: PlayerNumber::Two,
            }
        );
    }

    #[test]
    fn encoded_frames_are_single_line() {
        let frame = encode_client(&ClientMessage::CreateRoom {
            name: "line\nbreak".into(),
        })
        .expect("encode");
        assert!(!frame.contains('\n'));
        assert_eq!(
            decode_client(&frame).expect("decode"),
            ClientMessage::CreateRoom {
                name: "line\nbreak".into()
            }
        );
    }
}
