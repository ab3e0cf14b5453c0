mod metrics_snapshot;
mod model;
mod run_spec;
mod task_count;

pub use metrics_snapshot::{IPC_UNDEFINED, MetricsSnapshot, ipc_of};
pub use model::Model;
pub use run_spec::RunSpec;
pub use task_count::TaskCount;
