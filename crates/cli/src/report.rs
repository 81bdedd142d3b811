//! Markdown output generation for stored benchmark results.
//!
//! This module renders query results as markdown tables suitable for
//! pasting into a report or a pull-request comment.

use modelbench_core::BenchmarkResult;
use std::fmt::Write;

/// Render a model's history as a markdown table, newest first.
pub fn history_markdown(model_name: &str, results: &[BenchmarkResult]) -> String {
    let mut output = String::new();

    writeln!(output, "# Benchmark History: {model_name}").unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "| Timestamp | Throughput (tokens/s) | Latency (ms) | Memory (GB) | Commit |"
    )
    .unwrap();
    writeln!(
        output,
        "|-----------|----------------------|--------------|-------------|--------|"
    )
    .unwrap();

    for result in results {
        writeln!(
            output,
            "| {} | {:.2} | {:.2} | {:.1} | {} |",
            result.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            result.throughput_tokens_per_sec,
            result.latency_ms,
            result.memory_usage_gb,
            result.commit_reference,
        )
        .unwrap();
    }

    writeln!(output).unwrap();
    writeln!(output, "Total results: {}", results.len()).unwrap();

    output
}

/// Render cross-model leaderboard rows, best throughput first.
pub fn leaderboard_markdown(results: &[BenchmarkResult]) -> String {
    let mut output = String::new();

    writeln!(output, "# Throughput Leaderboard").unwrap();
    writeln!(output).unwrap();
    writeln!(
        output,
        "| Rank | Model | Throughput (tokens/s) | Latency (ms) | Commit |"
    )
    .unwrap();
    writeln!(
        output,
        "|------|-------|----------------------|--------------|--------|"
    )
    .unwrap();

    for (rank, result) in results.iter().enumerate() {
        writeln!(
            output,
            "| {} | {} | {:.2} | {:.2} | {} |",
            rank + 1,
            result.model_name,
            result.throughput_tokens_per_sec,
            result.latency_ms,
            result.commit_reference,
        )
        .unwrap();
    }

    output
}
