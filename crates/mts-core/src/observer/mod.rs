//! Lifecycle notifications delivered to whoever presents a run.
//!
//! Callbacks run synchronously on the worker that performed the step, on whatever thread that
//! worker happens to be scheduled. An observer that needs a specific thread (a UI event loop,
//! say) marshals the call itself; [`ChannelObserver`] is the ready-made way to do that.

mod channel;
pub use channel::{ChannelObserver, RunEvent};

use std::{
    any::Any,
    panic::{AssertUnwindSafe, catch_unwind},
    sync::Arc,
};

use tracing::warn;

use crate::{simulator::RunReport, task::TaskOutcome};

/// Receiver of task and run lifecycle notifications.
///
/// Every method defaults to a no-op so implementations only override what they care about.
pub trait Observer: Send + Sync {
    /// A task began executing on its worker.
    fn on_task_started(&self, _task: &str) {}

    /// A task reached a terminal state, successfully or not.
    fn on_task_finished(&self, _task: &str, _outcome: &TaskOutcome) {}

    /// Every task of the run was joined and the metrics are final.
    fn on_run_completed(&self, _report: &RunReport) {}
}

/// Fan-out over any number of observers, notified in registration order.
#[derive(Clone, Default)]
pub struct Observers {
    inner: Vec<Arc<dyn Observer>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observer: Arc<dyn Observer>) {
        self.inner.push(observer);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<Vec<Arc<dyn Observer>>> for Observers {
    fn from(inner: Vec<Arc<dyn Observer>>) -> Self {
        Self { inner }
    }
}

impl Observer for Observers {
    fn on_task_started(&self, task: &str) {
        for o in &self.inner {
            o.on_task_started(task);
        }
    }

    fn on_task_finished(&self, task: &str, outcome: &TaskOutcome) {
        for o in &self.inner {
            o.on_task_finished(task, outcome);
        }
    }

    fn on_run_completed(&self, report: &RunReport) {
        for o in &self.inner {
            o.on_run_completed(report);
        }
    }
}

/// Deliver one notification, keeping a panicking observer from unwinding into the caller.
///
/// Used for notifications sent after an outcome is final; the panic is logged and dropped.
pub(crate) fn notify_guarded(hook: &'static str, notify: impl FnOnce()) {
    if let Err(payload) = catch_unwind(AssertUnwindSafe(notify)) {
        warn!(
            hook,
            reason = %panic_message(payload),
            "observer panicked; notification dropped"
        );
    }
}

pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        return (*s).to_string();
    }
    if let Some(s) = payload.downcast_ref::<String>() {
        return s.clone();
    }
    "unknown panic".to_string()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Default)]
    struct Counting {
        started: AtomicUsize,
        finished: AtomicUsize,
    }

    impl Observer for Counting {
        fn on_task_started(&self, _task: &str) {
            self.started.fetch_add(1, Ordering::SeqCst);
        }
        fn on_task_finished(&self, _task: &str, _outcome: &TaskOutcome) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn fan_out_reaches_every_observer() {
        let a = Arc::new(Counting::default());
        let b = Arc::new(Counting::default());
        let all = Observers::from(vec![
            Arc::clone(&a) as Arc<dyn Observer>,
            Arc::clone(&b) as Arc<dyn Observer>,
        ]);

        all.on_task_started("SMT-0");
        all.on_task_finished("SMT-0", &TaskOutcome::Completed { cycles: 3 });

        for o in [&a, &b] {
            assert_eq!(o.started.load(Ordering::SeqCst), 1);
            assert_eq!(o.finished.load(Ordering::SeqCst), 1);
        }
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn guarded_notification_contains_panics() {
        let mut delivered = false;
        notify_guarded("on_task_finished", || panic!("observer down"));
        notify_guarded("on_task_finished", || delivered = true);
        assert!(delivered);
    }

    #[test]
    fn panic_payloads_become_messages() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(7_u8)), "unknown panic");
    }

    #[test]
    fn empty_fan_out_is_silent() {
        let all = Observers::new();
        assert!(all.is_empty());
        all.on_task_started("IMT-0");
    }
}
