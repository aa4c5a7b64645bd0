//! Application layer - discovery cycles, scheduling and the read API

pub mod api;
pub mod scheduler;
pub mod services;

pub use api::ApiState;
pub use scheduler::{RefreshScheduler, SchedulerHandle, SchedulerState, SchedulerStatus};
pub use services::{CycleReport, DiscoveryService};
