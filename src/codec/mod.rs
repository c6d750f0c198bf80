//! Data-URI codec for audio payloads.
//!
//! The engine speaks self-describing `data:` URIs while storage and callers
//! deal in raw bytes. This module converts between the two.

mod data_uri;

pub use data_uri::{AudioPayload, CodecError, decode, encode, essence, is_audio_mime};
