use mts_core::RunReport;
use prometheus::{Encoder, GaugeVec, IntCounterVec, Opts, Registry, TextEncoder};

const MODEL: &[&str] = &["model"];

#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    runs: IntCounterVec,
    cycles: IntCounterVec,
    instructions: IntCounterVec,
    bubble_cycles: IntCounterVec,
    task_failures: IntCounterVec,
    ipc: GaugeVec,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        Self::with_registry(Registry::new())
    }

    /// Register every series on `registry`.
    pub fn with_registry(registry: Registry) -> Result<Self, prometheus::Error> {
        let runs = counter("mts_runs_total", "Simulation runs completed")?;
        let cycles = counter("mts_cycles_total", "Simulated cycles recorded by completed tasks")?;
        let instructions = counter("mts_instructions_total", "Instructions executed")?;
        let bubble_cycles = counter("mts_bubble_cycles_total", "Idle or stall cycles")?;
        let task_failures = counter("mts_task_failures_total", "Tasks that recorded nothing")?;
        let ipc = GaugeVec::new(
            Opts::new("mts_ipc", "Instructions per cycle of the latest run"),
            MODEL,
        )?;

        registry.register(Box::new(runs.clone()))?;
        registry.register(Box::new(cycles.clone()))?;
        registry.register(Box::new(instructions.clone()))?;
        registry.register(Box::new(bubble_cycles.clone()))?;
        registry.register(Box::new(task_failures.clone()))?;
        registry.register(Box::new(ipc.clone()))?;

        Ok(Self {
            registry,
            runs,
            cycles,
            instructions,
            bubble_cycles,
            task_failures,
            ipc,
        })
    }

    /// Add one run to the series of its model.
    pub fn observe(&self, report: &RunReport) {
        let model = [report.model.as_str()];
        let m = &report.metrics;

        self.runs.with_label_values(&model).inc();
        self.cycles.with_label_values(&model).inc_by(m.total_cycles);
        self.instructions
            .with_label_values(&model)
            .inc_by(m.executed_instructions);
        self.bubble_cycles
            .with_label_values(&model)
            .inc_by(m.bubble_cycles);
        self.task_failures
            .with_label_values(&model)
            .inc_by(report.failures.len() as u64);
        self.ipc.with_label_values(&model).set(m.ipc);
    }

    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Text exposition format of everything observed so far.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

fn counter(name: &str, help: &str) -> Result<IntCounterVec, prometheus::Error> {
    IntCounterVec::new(Opts::new(name, help), MODEL)
}

#[cfg(test)]
mod tests {
    use mts_core::TaskFailure;
    use mts_model::{MetricsSnapshot, Model};

    use super::*;

    fn report(model: Model, cycles: u64, instructions: u64, failed: usize) -> RunReport {
        RunReport {
            run_id: Default::default(),
            model,
            requested: instructions as usize + failed,
            metrics: MetricsSnapshot::new(cycles, instructions, 0),
            failures: (0..failed)
                .map(|i| TaskFailure {
                    task: model.task_name(i),
                    reason: "interrupted".into(),
                })
                .collect(),
            elapsed_ms: 0,
        }
    }

    #[test]
    fn nothing_observed_renders_no_samples() {
        let metrics = PrometheusMetrics::new().unwrap();
        assert!(!metrics.render().unwrap().contains("model=\""));
    }

    #[test]
    fn observe_accumulates_per_model() {
        let metrics = PrometheusMetrics::new().unwrap();
        metrics.observe(&report(Model::Smt, 100, 4, 1));
        metrics.observe(&report(Model::Smt, 50, 2, 0));
        metrics.observe(&report(Model::Bmt, 10, 1, 0));

        let smt = [Model::Smt.as_str()];
        assert_eq!(metrics.runs.with_label_values(&smt).get(), 2);
        assert_eq!(metrics.cycles.with_label_values(&smt).get(), 150);
        assert_eq!(metrics.instructions.with_label_values(&smt).get(), 6);
        assert_eq!(metrics.task_failures.with_label_values(&smt).get(), 1);
        assert_eq!(metrics.ipc.with_label_values(&smt).get(), 2.0 / 50.0);

        let text = metrics.render().unwrap();
        assert!(text.contains(r#"mts_runs_total{model="smt"} 2"#));
        assert!(text.contains(r#"mts_cycles_total{model="bmt"} 10"#));
    }

    #[test]
    fn shared_registry_rejects_duplicates() {
        let registry = Registry::new();
        PrometheusMetrics::with_registry(registry.clone()).unwrap();
        assert!(PrometheusMetrics::with_registry(registry).is_err());
    }
}
