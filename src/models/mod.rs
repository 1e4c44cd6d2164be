pub mod catalog;
pub mod gpu;
pub mod inventory;

// Re-exports for convenience
pub use catalog::*;
pub use gpu::*;
pub use inventory::*;
