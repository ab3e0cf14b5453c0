mod app;
mod output;

use std::sync::Arc;

use clap::Parser;
use mts_core::Simulator;
use mts_exec::default_router;
use mts_model::{Model, RunSpec, TaskCount};
use mts_observe::{LogObserver, LoggerConfig, logger_init};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::app::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1) Logger
    let log_cfg = LoggerConfig {
        format: cli.global.log_format.parse()?,
        level: cli.global.log_level.clone(),
        ..Default::default()
    };
    logger_init(&log_cfg)?;

    // 2) Simulator
    let sim = Simulator::new(default_router(), cli.global.sim_config())
        .with_observer(Arc::new(LogObserver::new()));

    // 3) Ctrl+C interrupts whatever is still running; the partial report is still printed.
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted; cancelling outstanding tasks");
            on_signal.cancel();
        }
    });

    // 4) Run
    let reports = match &cli.command {
        Command::Run { model, tasks } => {
            let spec = RunSpec::parse(tasks, model)?;
            vec![sim.run_with_cancel(spec, cancel).await?]
        }
        Command::Compare { tasks } => {
            let count: TaskCount = tasks.parse()?;
            info!(tasks = count.get(), models = Model::ALL.len(), "comparing models");
            sim.compare_with_cancel(count, cancel).await?
        }
    };

    print!("{}", output::render(cli.global.format, &reports)?);
    Ok(())
}
