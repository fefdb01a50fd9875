//! Testing utilities for chatflow steps.
//!
//! This module provides:
//! - A scripted generator double
//! - Chat record fixtures
//! - Assertions over record messages

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{
    assert_contents, assert_has_field, assert_roles, assert_unchanged_except, message_pairs,
};
pub use fixtures::{conversation_batch, ChatRecordBuilder};
pub use mocks::ScriptedGenerator;
