//! Heartbeat / liveness state machine shared by the broker and worker loops.

pub mod monitor;
pub mod record;

pub use monitor::LivenessMonitor;
pub use record::LivenessState;
