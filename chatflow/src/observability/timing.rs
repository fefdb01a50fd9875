//! Step timing and span attributes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

/// Span attributes for one step run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepSpanAttributes {
    /// Step name.
    pub step_name: String,
    /// Records received.
    pub records_in: usize,
    /// Records returned.
    pub records_out: Option<usize>,
    /// Duration in milliseconds.
    pub duration_ms: Option<f64>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl StepSpanAttributes {
    /// Creates new step span attributes.
    #[must_use]
    pub fn new(step_name: impl Into<String>, records_in: usize) -> Self {
        Self {
            step_name: step_name.into(),
            records_in,
            ..Default::default()
        }
    }

    /// Sets the number of records returned.
    #[must_use]
    pub fn with_records_out(mut self, records_out: usize) -> Self {
        self.records_out = Some(records_out);
        self
    }

    /// Sets the duration.
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Sets the error.
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Converts to flat, dotted attribute names.
    #[must_use]
    pub fn to_attributes(&self) -> HashMap<String, String> {
        let mut attrs = HashMap::new();

        attrs.insert("step.name".to_string(), self.step_name.clone());
        attrs.insert("step.records_in".to_string(), self.records_in.to_string());

        if let Some(v) = self.records_out {
            attrs.insert("step.records_out".to_string(), v.to_string());
        }
        if let Some(v) = self.duration_ms {
            attrs.insert("step.duration_ms".to_string(), v.to_string());
        }
        if let Some(ref v) = self.error {
            attrs.insert("step.error".to_string(), v.clone());
        }

        attrs
    }
}

/// Simple span timing helper.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: String,
}

impl SpanTimer {
    /// Starts a new span timer.
    #[must_use]
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Returns the span name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finishes the span and returns the duration.
    #[must_use]
    pub fn finish(self) -> f64 {
        self.elapsed_ms()
    }
}
