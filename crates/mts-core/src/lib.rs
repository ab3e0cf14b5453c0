pub mod config;
pub use config::{SimConfig, Timing};
pub mod dispatch;
pub use dispatch::{Batch, Dispatch};
pub mod error;
pub use error::{CoreError, TaskError};
pub mod metrics;
pub use metrics::Metrics;
pub mod observer;
pub use observer::{ChannelObserver, Observer, Observers, RunEvent};
pub mod router;
pub use router::DispatchRouter;
pub mod simulator;
pub use simulator::{RunReport, Simulator, TaskFailure};
pub mod task;
pub use task::{Task, TaskEnv, TaskHandle, TaskOutcome, TaskReport};
pub mod worker;
pub use worker::{Phase, Worker};
