//! Benchmarks for chatflow steps.

use chatflow::prelude::*;
use chatflow::testing::conversation_batch;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

fn steps_benchmark(c: &mut Criterion) {
    let batch = conversation_batch(256, 4);

    c.bench_function("format_transcript", |b| {
        let step = FormatTranscript::new();
        b.iter(|| black_box(step.process(batch.clone())))
    });

    c.bench_function("drop_empty", |b| {
        let step = DropEmpty::new();
        b.iter(|| black_box(step.process(batch.clone())))
    });

    c.bench_function("rewrite_messages", |b| {
        let step = RewriteMessages::new(
            "Shorten.",
            "assistant",
            Arc::new(ContainsPredicate::new("answer")),
            Arc::new(|prompt: &str| -> Result<String, GenerationError> { Ok(prompt.to_uppercase()) }),
        );
        b.iter(|| black_box(step.process(batch.clone())))
    });
}

criterion_group!(benches, steps_benchmark);
criterion_main!(benches);
