//! Glance workspace state
//!
//! The top layer of the Glance analytics engine: the mutable workspace
//! container the embedding host drives, plus persistence.
//!
//! # Overview
//!
//! - **Container**: one [`Workspace`] holds every mode's sub-state at once.
//!   Mutations are synchronous whole-snapshot replacements; subscribers see
//!   each completed snapshot, never a partial update. Switching modes never
//!   clears another mode's work.
//! - **Assist**: the AI query-generation state machine — the only async
//!   surface, modeled as explicit phases with snapshot-on-entry so a cancel
//!   restores the pre-generation state exactly.
//! - **Persistence**: the cross-mode [`WorkspaceSnapshot`] blob and the
//!   recently-used-fields list, written to a [`Storage`] key-value backend.
//!   Writes are fire-and-forget: a failed write is logged and swallowed,
//!   in-memory state stays authoritative.
//!
//! # Usage
//!
//! ```ignore
//! use glance_state::{MemoryStorage, Workspace};
//! use std::sync::Arc;
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let mut workspace = Workspace::load(storage);
//! workspace.add_metric("Orders.count");
//! let request = workspace.build_request();
//! ```

pub mod assist;
pub mod container;
pub mod error;
pub mod persist;
pub mod recent;
pub mod storage;

#[cfg(test)]
mod persist_test;

// Re-exports for convenience
pub use assist::{Generation, GenerationPhase};
pub use container::{SubscriptionId, Workspace};
pub use error::{Result, StateError};
pub use persist::{
    load_workspace, save_workspace, WorkspaceSnapshot, RECENT_FIELDS_KEY, WORKSPACE_KEY,
    WORKSPACE_VERSION,
};
pub use recent::{RecentFields, MAX_RECENT_FIELDS};
pub use storage::{FileStorage, MemoryStorage, Storage};
