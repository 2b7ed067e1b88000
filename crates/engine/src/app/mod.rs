mod input;
mod loop_runner;
mod metrics;
mod renderer;

pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
