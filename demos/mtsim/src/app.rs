use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use mts_core::{SimConfig, config};

/// mtsim - compare simultaneous, interleaved and block multithreading on the same workload
#[derive(Debug, Parser)]
#[command(name = "mtsim", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Output format of the run reports.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Log filter directive, e.g. `info` or `mts_exec=trace,warn`.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log format: text, json or journald.
    #[arg(long, global = true, default_value = "text")]
    pub log_format: String,

    /// Cycles every task runs before its random extra delay.
    #[arg(long, global = true, default_value_t = config::DEFAULT_BASE_CYCLES)]
    pub base_cycles: u64,

    /// Exclusive upper bound of the random extra delay, in cycles.
    #[arg(long, global = true, default_value_t = config::DEFAULT_JITTER_BOUND)]
    pub jitter_bound: u64,

    /// Wall time of one simulated cycle, in microseconds.
    #[arg(long, global = true, default_value_t = 1000)]
    pub cycle_us: u64,

    /// Cancel the SMT pool if it has not drained after this many milliseconds.
    #[arg(long, global = true, value_name = "MS")]
    pub await_timeout_ms: Option<u64>,

    /// Cancel every outstanding task of a run after this many milliseconds.
    #[arg(long, global = true, value_name = "MS")]
    pub run_timeout_ms: Option<u64>,
}

impl GlobalOptions {
    pub fn sim_config(&self) -> SimConfig {
        let mut cfg = SimConfig::default()
            .with_base_cycles(self.base_cycles)
            .with_jitter_bound(self.jitter_bound)
            .with_cycle(Duration::from_micros(self.cycle_us));
        if let Some(ms) = self.await_timeout_ms {
            cfg = cfg.with_await_timeout(Duration::from_millis(ms));
        }
        if let Some(ms) = self.run_timeout_ms {
            cfg = cfg.with_run_timeout(Duration::from_millis(ms));
        }
        cfg
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one batch with a single model.
    Run {
        /// Multithreading model: smt, imt or bmt.
        #[arg(short, long)]
        model: String,

        /// Number of tasks in the batch (a positive integer).
        #[arg(short, long, allow_hyphen_values = true)]
        tasks: String,
    },

    /// Run the same batch with every model, one after another.
    Compare {
        /// Number of tasks in the batch (a positive integer).
        #[arg(short, long, allow_hyphen_values = true)]
        tasks: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Prometheus,
}
