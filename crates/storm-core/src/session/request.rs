//! Request body parsing for the session protocol.

use serde_json::{Map, Value};
use storm_types::error::{NicknameError, SessionError};

/// Parse a request body that must be a JSON object.
pub(crate) fn parse_object(body: &[u8]) -> Result<Map<String, Value>, SessionError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(SessionError::InvalidRequest(
            "body must be a JSON object".to_string(),
        )),
        Err(e) => Err(SessionError::InvalidRequest(format!("malformed JSON body: {e}"))),
    }
}

/// Extract the `content` of a new message.
pub(crate) fn message_content(body: &[u8]) -> Result<String, SessionError> {
    let object = parse_object(body)?;
    match object.get("content") {
        Some(Value::String(content)) if !content.is_empty() => Ok(content.clone()),
        Some(Value::String(_)) => Err(SessionError::InvalidRequest(
            "`content` must not be empty".to_string(),
        )),
        Some(_) => Err(SessionError::InvalidRequest(
            "`content` must be a string".to_string(),
        )),
        None => Err(SessionError::InvalidRequest("`content` is required".to_string())),
    }
}

/// Extract the requested `nickname`.
pub(crate) fn requested_nickname(body: &[u8]) -> Result<String, SessionError> {
    let object = parse_object(body)?;
    match object.get("nickname") {
        Some(Value::String(nickname)) => Ok(nickname.clone()),
        Some(Value::Null) | None => Err(NicknameError::Missing.into()),
        Some(_) => Err(SessionError::InvalidRequest(
            "`nickname` must be a string".to_string(),
        )),
    }
}
