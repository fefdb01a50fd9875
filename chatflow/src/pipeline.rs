//! Sequential step chains.
//!
//! A [`StepChain`] runs steps one after another over a set of input batches.
//! It does no scheduling of its own: no branching, no concurrency and no
//! retries.

use crate::config::StepConfig;
use crate::core::{Batch, StepCategory};
use crate::errors::Result;
use crate::generation::Generator;
use crate::observability::{SpanTimer, StepSpanAttributes};
use crate::steps::Step;
use std::sync::Arc;
use tracing::{info, info_span, warn};

/// An ordered list of steps.
#[derive(Debug, Default)]
pub struct StepChain {
    name: String,
    steps: Vec<Box<dyn Step>>,
}

impl StepChain {
    /// Creates an empty chain.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// Appends a step.
    #[must_use]
    pub fn then(mut self, step: impl Step + 'static) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Appends a boxed step.
    pub fn push(&mut self, step: Box<dyn Step>) {
        self.steps.push(step);
    }

    /// Builds a chain from step configurations.
    ///
    /// The generator is shared by every rewrite step in the chain.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error.
    pub fn from_configs(
        name: impl Into<String>,
        configs: &[StepConfig],
        generator: Option<Arc<dyn Generator>>,
    ) -> Result<Self> {
        let mut chain = Self::new(name);
        for config in configs {
            chain.push(config.build(generator.clone())?);
        }
        Ok(chain)
    }

    /// Returns the chain name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the step names in order.
    #[must_use]
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if the chain has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs every step over the input batches.
    ///
    /// Regular steps see each batch separately. Global steps see all
    /// batches merged into one, and their single output batch is what the
    /// following steps receive.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first step error.
    pub fn run(&self, inputs: Vec<Batch>) -> Result<Vec<Batch>> {
        let _chain = info_span!("chain", chain = %self.name).entered();
        let mut batches = inputs;

        for step in &self.steps {
            let records_in: usize = batches.iter().map(Vec::len).sum();
            let side_effects = step.categories().iter().any(StepCategory::is_side_effecting);
            let _span = info_span!(
                "step",
                step = step.name(),
                global = step.is_global(),
                side_effects
            )
            .entered();
            let timer = SpanTimer::start(step.name());

            let result = if step.is_global() {
                step.process(batches.into_iter().flatten().collect())
                    .map(|merged| vec![merged])
            } else {
                step.process_all(batches)
            };

            let attributes = StepSpanAttributes::new(step.name(), records_in).with_duration_ms(timer.finish());
            batches = match result {
                Ok(out) => {
                    let attributes = attributes.with_records_out(out.iter().map(Vec::len).sum());
                    info!(attributes = ?attributes.to_attributes(), "Step completed");
                    out
                }
                Err(err) => {
                    let attributes = attributes.with_error(err.to_string());
                    warn!(attributes = ?attributes.to_attributes(), "Step failed");
                    return Err(err);
                }
            };
        }

        Ok(batches)
    }

    /// Runs the chain over a single batch, merging the outputs.
    pub fn run_batch(&self, batch: Batch) -> Result<Batch> {
        Ok(self.run(vec![batch])?.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Record;
    use crate::steps::{DropEmpty, FnStep, FormatTranscript};
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[test]
    fn test_empty_chain_passes_batches_through() {
        let chain = StepChain::new("empty");
        let inputs = vec![vec![Record::new()], vec![]];

        assert!(chain.is_empty());
        assert_eq!(chain.run(inputs.clone()).unwrap(), inputs);
    }

    #[test]
    fn test_regular_steps_keep_batches_apart() {
        let chain = StepChain::new("format").then(FormatTranscript::new());
        let out = chain
            .run(vec![
                vec![record(json!({"messages": []}))],
                vec![record(json!({"messages": []})), record(json!({"messages": []}))],
            ])
            .unwrap();

        assert_eq!(out.iter().map(Vec::len).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_global_step_merges_batches() {
        let chain = StepChain::new("filter")
            .then(DropEmpty::with_columns(["text"]))
            .then(FnStep::new("count", |batch: Batch| {
                let size = batch.len();
                Ok(batch.into_iter().map(|r| r.with_field("seen", json!(size))).collect())
            }));

        let out = chain
            .run(vec![
                vec![record(json!({"text": "a"})), record(json!({"text": ""}))],
                vec![record(json!({"text": "b"}))],
            ])
            .unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), 2);
        assert_eq!(out[0][0].get("seen"), Some(&json!(2)));
        assert_eq!(chain.step_names(), vec!["drop_empty", "count"]);
    }

    #[test]
    fn test_first_error_stops_chain() {
        let chain = StepChain::new("broken")
            .then(FormatTranscript::new())
            .then(FnStep::new("unreachable", |_: Batch| panic!("must not run")));

        let err = chain.run_batch(vec![record(json!({"no_messages": true}))]).unwrap_err();
        assert_eq!(err.kind(), "missing_field");
    }

    #[test]
    fn test_from_configs() {
        let configs = StepConfig::list_from_json(
            r#"[{"type": "format_transcript"}, {"type": "drop_empty", "columns": ["transcript"]}]"#,
        )
        .unwrap();
        let chain = StepChain::from_configs("configured", &configs, None).unwrap();

        assert_eq!(chain.len(), 2);
        let out = chain
            .run_batch(vec![
                record(json!({"messages": []})),
                record(json!({"messages": [{"role": "user", "content": "hi"}]})),
            ])
            .unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].get("transcript"), Some(&json!("user: hi")));
    }
}
