//! Board module for driveboard.
//!
//! This module provides the board entry store:
//! - Entry types and the listing row shape
//! - Event parsing and field validation
//! - The `t_board` repository
//! - Dispatch of create, list and delete requests

mod dispatch;
mod reply;
mod repository;
mod request;
mod types;
mod validation;

pub use dispatch::Dispatcher;
pub use reply::{success_flag, BoardReply, CORS_HEADERS};
pub use repository::EntryRepository;
pub use request::{BoardEvent, CreateEntryRequest, DeleteEntryRequest, RequestMethod};
pub use types::{BoardEntry, EntryRow, NewEntry, StoredCredential, DATE_FORMAT};
pub use validation::{describe_errors, no_control_chars, not_empty_trimmed, required_text};
