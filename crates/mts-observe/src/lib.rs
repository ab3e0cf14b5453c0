mod logger;
pub use logger::*;

#[cfg(feature = "observer")]
mod observer;
#[cfg(feature = "observer")]
pub use observer::*;
