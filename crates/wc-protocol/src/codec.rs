//! JSON envelope codec
//!
//! Stateless conversion between text frames and typed messages. Only the
//! discriminator is validated; payload fields are taken as the scanner
//! sends them.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::command::OutboundCommand;
use crate::error::{DecodeError, EncodeError};
use crate::event::InboundEvent;

const TYPE_FIELD: &str = "type";
const ACTION_FIELD: &str = "action";
const DATA_FIELD: &str = "data";

/// Encode a command into a text frame
pub fn encode(command: &OutboundCommand) -> Result<String, EncodeError> {
    Ok(serde_json::to_string(command)?)
}

/// Decode a text frame into an event
///
/// Frames with an unrecognized `type` decode successfully into
/// [`InboundEvent::Unknown`]; the caller decides how loudly to complain.
pub fn decode(frame: &str) -> Result<InboundEvent, DecodeError> {
    let mut object = parse_object(frame)?;
    let event_type = tag(&object, TYPE_FIELD)?;

    let event = match event_type.as_str() {
        "users" => InboundEvent::Users(take(&mut object, DATA_FIELD)),
        "state" => InboundEvent::State(take(&mut object, DATA_FIELD)),
        "projects_data" => {
            InboundEvent::ProjectsData(payload(&event_type, take(&mut object, DATA_FIELD))?)
        }
        "camera_preview" => {
            InboundEvent::CameraPreview(payload(&event_type, take(&mut object, DATA_FIELD))?)
        }
        "state_data" => InboundEvent::StateData {
            projects: payload(&event_type, take(&mut object, "project_data"))?,
            disk_usage: take(&mut object, "disk_usage_data"),
        },
        "download_ready" => InboundEvent::DownloadReady {
            project_name: payload(&event_type, take(&mut object, "project_name"))?,
        },
        _ => InboundEvent::Unknown {
            event_type,
            raw: Value::Object(object),
        },
    };

    Ok(event)
}

/// Decode an outbound frame back into the command that produced it
pub fn decode_command(frame: &str) -> Result<OutboundCommand, DecodeError> {
    let object = parse_object(frame)?;
    let action = tag(&object, ACTION_FIELD)?;
    payload(&action, Value::Object(object))
}

fn parse_object(frame: &str) -> Result<Map<String, Value>, DecodeError> {
    match serde_json::from_str(frame).map_err(DecodeError::Malformed)? {
        Value::Object(object) => Ok(object),
        _ => Err(DecodeError::NotAnObject),
    }
}

fn tag(object: &Map<String, Value>, field: &'static str) -> Result<String, DecodeError> {
    match object.get(field) {
        Some(Value::String(tag)) => Ok(tag.clone()),
        _ => Err(DecodeError::MissingTag { field }),
    }
}

fn take(object: &mut Map<String, Value>, field: &str) -> Value {
    object.remove(field).unwrap_or(Value::Null)
}

fn payload<T: DeserializeOwned>(tag: &str, value: Value) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError::InvalidPayload {
        tag: tag.to_string(),
        source,
    })
}
