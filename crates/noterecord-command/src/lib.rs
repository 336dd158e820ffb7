//! Note Record Command — request validation and dispatch onto the store.

pub mod command;
pub mod error;
pub mod handler;
pub mod validate;

pub use command::{Command, Deleted, Response};
pub use error::{CommandError, ErrorKind};
pub use handler::CommandHandler;
