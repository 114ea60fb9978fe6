//! Functional core for the tonewatch sentiment pipeline.
//!
//! Everything in this crate is pure: event decoding, the sentiment and
//! transcription domain types, and the service traits the Lambda adapters
//! implement. No module here performs I/O.

pub mod event;
pub mod resources;
pub mod sentiment;
pub mod services;
pub mod transcription;
