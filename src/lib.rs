//! driveboard - password-protected board entries for a file-sharing page.
//!
//! Each uploaded file gets a board entry (title plus object key). Entries are
//! listed publicly and deleted only with the password given at creation.

pub mod auth;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{hash_password, verify_password, PasswordError};
pub use board::{
    BoardEntry, BoardEvent, BoardReply, Dispatcher, EntryRepository, EntryRow, NewEntry,
    RequestMethod,
};
pub use config::Config;
pub use db::Database;
pub use error::{DriveboardError, Result};
pub use web::WebServer;
