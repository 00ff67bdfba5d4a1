//! Shared utilities for the Skein wallet.

pub mod gate;
pub mod logging;

pub use gate::{GateClosed, OperationGate, OperationGuard};
pub use logging::init_tracing;
