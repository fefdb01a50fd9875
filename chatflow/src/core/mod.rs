//! Core data model for chatflow.
//!
//! This module contains the fundamental types every step works with:
//! - Records and batches
//! - Messages and permissive readers over raw message entries
//! - Step categories

mod category;
mod message;
mod record;

pub use category::StepCategory;
pub use message::{content_text, role_of, value_text, Message};
pub use record::{Batch, Record};
