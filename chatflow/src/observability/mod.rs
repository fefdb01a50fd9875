//! Observability utilities.

mod subscriber;
mod timing;

pub use subscriber::{init_tracing, LogFormat};
pub use timing::{SpanTimer, StepSpanAttributes};
