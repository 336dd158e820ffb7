//! Note Record Core — shared error type and configuration.

pub mod config;
pub mod error;

pub use config::{DataPaths, NoteRecordConfig};
pub use error::{Error, Result};
