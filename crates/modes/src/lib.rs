//! Glance mode adapters
//!
//! The middle layer of the Glance analytics engine. An analysis *mode* (ad
//! hoc query, funnel, flow, retention) is a mutually exclusive configuration
//! sharing one contract: extract its slice of the composed state, validate
//! completeness, build the backend request, and save/load a versioned
//! [`AnalysisConfig`].
//!
//! # Overview
//!
//! - **Model**: per-mode state shapes plus the composed [`AnalysisState`]
//! - **Adapters**: one [`ModeAdapter`] implementation per mode, looked up via
//!   [`adapter_for`] — the only indirection mode-agnostic callers need
//! - **Validation**: completeness rules returning human-readable errors,
//!   never exceptions; an incomplete mode builds to `None`
//! - **Config**: the single-mode serializable unit used for shareable links
//!   and embedded views
//!
//! # Usage
//!
//! ```ignore
//! use glance_modes::{adapter_for, AnalysisState, AnalysisType};
//!
//! let state = AnalysisState::new();
//! let adapter = adapter_for(state.active_type);
//! let mode = adapter.extract_state(&state);
//! if adapter.validate(&mode).is_valid {
//!     let request = adapter.build_request(&mode);
//! }
//! ```

pub mod adapter;
pub mod adapters;
pub mod chart;
pub mod config;
pub mod model;
pub mod registry;

// Re-exports for convenience
pub use adapter::{BuiltRequest, ModeAdapter, Validation};
pub use chart::{ActiveView, ChartConfig, ChartType};
pub use config::{
    AnalysisConfig, ConfigPayload, FlowPayload, FunnelPayload, QueryPayload, RetentionPayload,
    CONFIG_VERSION,
};
pub use model::{
    AnalysisState, AnalysisType, FlowModeState, FunnelModeState, MergeStrategy, ModeState,
    QueryModeState, QueryTabs, RetentionModeState, ValidationStatus,
};
pub use registry::{adapter_for, all_adapters};
