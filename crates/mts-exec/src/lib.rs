//! Dispatchers for the three multithreading models.
//!
//! Each dispatcher implements [`mts_core::Dispatch`]; [`default_router`] registers all of the
//! enabled ones so a [`mts_core::Simulator`] can serve every [`mts_model::Model`].

mod error;
pub use error::ExecError;

#[cfg(feature = "bmt")]
pub mod bmt;
#[cfg(feature = "bmt")]
pub use bmt::BmtDispatch;

#[cfg(feature = "imt")]
pub mod imt;
#[cfg(feature = "imt")]
pub use imt::ImtDispatch;

#[cfg(feature = "smt")]
pub mod smt;
#[cfg(feature = "smt")]
pub use smt::SmtDispatch;

use std::sync::Arc;

use mts_core::DispatchRouter;
use tracing::debug;

/// Register every enabled dispatcher on `router`.
pub fn register_dispatchers(router: &mut DispatchRouter) {
    #[cfg(feature = "smt")]
    router.register(Arc::new(SmtDispatch::new()));
    #[cfg(feature = "imt")]
    router.register(Arc::new(ImtDispatch::new()));
    #[cfg(feature = "bmt")]
    router.register(Arc::new(BmtDispatch::new()));
    debug!(dispatchers = router.len(), "dispatchers registered");
}

/// Router serving every enabled model.
pub fn default_router() -> DispatchRouter {
    let mut router = DispatchRouter::new();
    register_dispatchers(&mut router);
    router
}

pub mod prelude {
    pub use crate::error::ExecError;
    pub use crate::{default_router, register_dispatchers};

    #[cfg(feature = "bmt")]
    pub use crate::BmtDispatch;
    #[cfg(feature = "imt")]
    pub use crate::ImtDispatch;
    #[cfg(feature = "smt")]
    pub use crate::SmtDispatch;
}
