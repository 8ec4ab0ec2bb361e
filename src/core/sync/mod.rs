//! Synchronization orchestrator and its phase state machine.

pub mod coordinator;
pub mod state;

pub use coordinator::{SyncOrchestrator, SyncSummary};
pub use state::{IllegalTransition, Phase, SyncState};
