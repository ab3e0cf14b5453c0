use std::sync::Arc;

use mts_model::Model;
use tracing::{instrument, trace};

use crate::{dispatch::Dispatch, error::CoreError};

/// Registry of dispatchers, picked by the model a run asks for.
#[derive(Default)]
pub struct DispatchRouter {
    dispatchers: Vec<Arc<dyn Dispatch>>,
}

impl DispatchRouter {
    #[inline]
    pub fn new() -> Self {
        Self {
            dispatchers: Vec::new(),
        }
    }

    #[inline]
    pub fn register(&mut self, dispatcher: Arc<dyn Dispatch>) {
        self.dispatchers.push(dispatcher);
    }

    #[inline]
    pub fn with(mut self, dispatcher: Arc<dyn Dispatch>) -> Self {
        self.register(dispatcher);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dispatchers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dispatchers.is_empty()
    }

    /// First registered dispatcher supporting `model`.
    pub fn pick(&self, model: Model) -> Option<&Arc<dyn Dispatch>> {
        self.dispatchers.iter().find(|d| d.supports(model))
    }

    #[instrument(level = "trace", skip(self), fields(model = %model))]
    pub fn resolve(&self, model: Model) -> Result<Arc<dyn Dispatch>, CoreError> {
        let d = self
            .pick(model)
            .ok_or_else(|| CoreError::NoDispatcher(model.as_str().to_string()))?;
        trace!(dispatcher = d.name(), "dispatcher resolved");
        Ok(Arc::clone(d))
    }
}
