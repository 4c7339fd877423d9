//! JSON output for command results.

use serde::Serialize;
use serde_json::json;

use storefront_core::{AggregateStats, Diagnostic, QueryResult};

/// `list` output: the page plus match counts and any diagnostics.
pub fn list_json<R: Serialize>(
    kind: &str,
    result: &QueryResult<R>,
    diagnostics: &[Diagnostic],
) -> serde_json::Value {
    json!({
        "kind": kind,
        "result": result,
        "diagnostics": diagnostics,
    })
}

pub fn stats_json(kind: &str, total: usize, stats: &AggregateStats) -> serde_json::Value {
    json!({
        "kind": kind,
        "records": total,
        "metrics": stats,
    })
}

/// `apply` output. `changed` is false when the mutation was a no-op.
pub fn apply_json<R: Serialize>(
    kind: &str,
    mutation: &str,
    changed: bool,
    saved: bool,
    count: usize,
    record: Option<&R>,
    diagnostics: &[Diagnostic],
) -> serde_json::Value {
    json!({
        "kind": kind,
        "mutation": mutation,
        "changed": changed,
        "saved": saved,
        "count": count,
        "record": record,
        "diagnostics": diagnostics,
    })
}

pub fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
