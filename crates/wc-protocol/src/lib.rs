//! wc-protocol: Wire protocol for the wcscanner turntable
//!
//! This crate defines the JSON envelopes exchanged with the scanner over
//! its WebSocket: commands flow out tagged by `action`, events flow in
//! tagged by `type`.

pub mod codec;
pub mod command;
pub mod error;
pub mod event;
pub mod resolution;

pub use codec::{decode, decode_command, encode};
pub use command::{OutboundCommand, TurnDirection};
pub use error::{DecodeError, EncodeError};
pub use event::{InboundEvent, ProjectRecord};
pub use resolution::PictureResolution;

/// Default TCP port the scanner's WebSocket server listens on.
pub const DEFAULT_PORT: u16 = 6789;
