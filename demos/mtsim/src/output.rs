use std::fmt::{self, Write};

use mts_core::RunReport;
use mts_prometheus::PrometheusMetrics;

use crate::app::OutputFormat;

pub fn render(format: OutputFormat, reports: &[RunReport]) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(text(reports)?),
        OutputFormat::Json => {
            let out = match reports {
                [one] => serde_json::to_string_pretty(one)?,
                many => serde_json::to_string_pretty(many)?,
            };
            Ok(out)
        }
        OutputFormat::Prometheus => {
            let metrics = PrometheusMetrics::new()?;
            for report in reports {
                metrics.observe(report);
            }
            Ok(metrics.render()?)
        }
    }
}

fn text(reports: &[RunReport]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    for r in reports {
        let m = &r.metrics;
        writeln!(out, "{} ({} tasks)", r.model, r.requested)?;
        writeln!(out, "  total cycles:          {}", m.total_cycles)?;
        writeln!(out, "  executed instructions: {}", m.executed_instructions)?;
        writeln!(out, "  bubble cycles:         {}", m.bubble_cycles)?;
        writeln!(out, "  IPC:                   {:.6}", m.ipc)?;
        writeln!(out, "  elapsed:               {} ms", r.elapsed_ms)?;
        for f in &r.failures {
            writeln!(out, "  failed {}: {}", f.task, f.reason)?;
        }
    }
    Ok(out)
}
