//! # Chatflow
//!
//! Composable record-transformation steps for batches of chat records.
//!
//! A record holds a `messages` list of role/content pairs plus any other
//! fields. Steps consume a batch of records, perform one transformation and
//! hand the batch on:
//!
//! - **`FormatTranscript`**: renders messages into a plaintext `transcript`
//! - **`InsertMessage`**: inserts a message built from the `content` field
//! - **`RewriteMessages`**: rewrites selected messages through a generator
//! - **`DropEmpty`**: drops records with empty values
//! - **`SaveToJsonl`**: writes each record's messages to a JSONL file
//!
//! ## Quick Start
//!
//! ```rust
//! use chatflow::prelude::*;
//! use serde_json::json;
//!
//! let record = Record::from_value(json!({
//!     "messages": [{"role": "user", "content": "Hi"}],
//!     "content": "Be nice"
//! }))?;
//!
//! let out = InsertMessage::new(0, "system").process(vec![record])?;
//! assert_eq!(
//!     out[0].messages(),
//!     Some(&json!([
//!         {"role": "system", "content": "Be nice"},
//!         {"role": "user", "content": "Hi"}
//!     ]))
//! );
//! # Ok::<(), chatflow::errors::ChatflowError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod config;
pub mod core;
pub mod errors;
pub mod generation;
pub mod observability;
pub mod pipeline;
pub mod steps;
pub mod testing;


/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{PredicateConfig, StepConfig};
    pub use crate::core::{Batch, Message, Record, StepCategory};
    pub use crate::errors::{ChatflowError, GenerationError};
    pub use crate::generation::{
        build_prompt, Always, AsyncGenerator, BlockingGenerator, ContainsPredicate, Generator,
        Predicate, RegexPredicate,
    };
    pub use crate::pipeline::StepChain;
    pub use crate::steps::{
        DropEmpty, FnStep, FormatTranscript, InsertMessage, RewriteMessages, SaveToJsonl, Step,
    };
}
