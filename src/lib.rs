pub mod config;
pub mod engine;
pub mod fetcher;
pub mod models;
pub mod plugins;
pub mod scheduler;
pub mod stock_checker;
pub mod utils;

// Re-export commonly used types
pub use crate::config::AppConfig;
pub use crate::scheduler::{CycleOutcome, IntervalPolicy, PollScheduler, SchedulerPhase};
pub use crate::stock_checker::{CheckReport, StockChecker, WatchTargets};
pub use crate::utils::error::{AppError, Result};
