use std::collections::BTreeMap;
use std::io::{self, Write};

use serde::Serialize;

use crate::outcome::{RunSummary, FAILURE_STATUS};

// =============================================================================
// Human Output
// =============================================================================

pub fn write_human<W: Write>(out: &mut W, summary: &RunSummary) -> io::Result<()> {
    let latency = &summary.latency;

    writeln!(out, "════════════════════════════════════════════════════════════")?;
    writeln!(out, "                      LOAD TEST SUMMARY")?;
    writeln!(out, "════════════════════════════════════════════════════════════")?;
    writeln!(out, "Total Duration:      {:.3?}", summary.total_duration)?;
    writeln!(out, "Total Requests:      {}", summary.total_requests)?;
    writeln!(out, "Status 200:          {}", summary.success_count)?;
    writeln!(out, "Throughput:          {:.2} req/s", summary.requests_per_second())?;

    writeln!(out)?;
    writeln!(out, "Other Statuses:")?;
    let mut any_other = false;
    for (status, count) in summary.other_statuses() {
        any_other = true;
        if status == FAILURE_STATUS {
            writeln!(out, "  Status {} (transport error): {}", status, count)?;
        } else {
            writeln!(out, "  Status {}: {}", status, count)?;
        }
    }
    if !any_other {
        writeln!(out, "  None")?;
    }

    writeln!(out)?;
    writeln!(out, "Latency (ms):")?;
    if summary.total_requests > 0 {
        writeln!(out, "  Min:    {:.2}", latency.min)?;
        writeln!(out, "  Mean:   {:.2}", latency.mean)?;
        writeln!(out, "  p50:    {:.2}", latency.p50)?;
        writeln!(out, "  p95:    {:.2}", latency.p95)?;
        writeln!(out, "  p99:    {:.2}", latency.p99)?;
        writeln!(out, "  Max:    {:.2}", latency.max)?;
    } else {
        writeln!(out, "  No data")?;
    }
    writeln!(out, "════════════════════════════════════════════════════════════")
}

// =============================================================================
// JSON Output
// =============================================================================

#[derive(Debug, Serialize)]
struct JsonReport {
    total_duration_ms: f64,
    total_requests: u64,
    success_count: u64,
    failure_count: u64,
    requests_per_second: f64,
    status_histogram: BTreeMap<String, u64>,
    latency_ms: JsonLatency,
}

#[derive(Debug, Serialize)]
struct JsonLatency {
    min: f64,
    mean: f64,
    p50: f64,
    p95: f64,
    p99: f64,
    max: f64,
}

pub fn render_json(summary: &RunSummary) -> Result<String, sonic_rs::Error> {
    let latency = &summary.latency;
    let report = JsonReport {
        total_duration_ms: summary.total_duration.as_secs_f64() * 1_000.0,
        total_requests: summary.total_requests,
        success_count: summary.success_count,
        failure_count: summary.failure_count(),
        requests_per_second: summary.requests_per_second(),
        status_histogram: summary
            .status_histogram
            .iter()
            .map(|(status, count)| (status.to_string(), *count))
            .collect(),
        latency_ms: JsonLatency {
            min: latency.min,
            mean: latency.mean,
            p50: latency.p50,
            p95: latency.p95,
            p99: latency.p99,
            max: latency.max,
        },
    };
    sonic_rs::to_string(&report)
}
