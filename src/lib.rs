//! tts-gateway: the boundary between a speech UI and an external TTS engine.
//!
//! This crate keeps a registry of built-in and trained voices, translates
//! synthesis and training requests into calls against the engine, and
//! converts audio between raw bytes and base64 data URIs.

pub mod backend;
pub mod cli;
pub mod codec;
pub mod config;
pub mod gateway;
pub mod voice;
