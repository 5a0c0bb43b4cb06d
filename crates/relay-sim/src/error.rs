//! SPEC_FULL.md §7 error taxonomy, encoded as `thiserror` enums.
//!
//! `TransientComponentError` is deliberately absent here: a failing
//! `simulate_logic` is captured via `catch_unwind` at the component-call
//! boundary and accumulated into run statistics rather than propagated as
//! a Rust `Error` (see `engine`).

use crate::ids::{ComponentId, PinId};

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("document major version {found} is not supported (supported: {supported:?})")]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    #[error("component {component:?} references unknown pin id {pin_ref:?}")]
    UnknownPinRef { component: String, pin_ref: String },

    #[error("wire references unknown tab id {0:?}")]
    UnknownTabRef(String),

    #[error("component {0:?} has link_name {1:?} but no tabs - link is unconnectable")]
    UnconnectableLink(ComponentId, String),

    #[error("sub-circuit definition {0:?} has a pin with no corresponding internal Link component")]
    SubCircuitPinWithoutLink(String),

    #[error("sub-circuit nesting exceeds the maximum supported depth of {max}")]
    SubCircuitTooDeep { max: u32 },

    #[error("sub-circuit definition {0:?} is not declared on the document")]
    UnknownSubCircuitDefinition(String),

    #[error("pin {0:?} appears twice in the same component")]
    DuplicatePin(PinId),

    #[error("malformed document: {0}")]
    Malformed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine is not in a state that allows this operation: {0}")]
    InvalidState(String),

    #[error("no document has been loaded")]
    NotLoaded,

    #[error("unknown component id")]
    UnknownComponent,

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Bridge(#[from] crate::bridge::BridgeError),

    #[error(transparent)]
    Link(#[from] crate::link_resolver::LinkError),

    /// A worker-pool barrier (evaluate/propagate/component phase) did not
    /// complete within its configured timeout — the pool is presumed
    /// wedged and the run is aborted rather than hung indefinitely.
    #[error("internal barrier timed out after {0:?} waiting for worker-pool phase to complete")]
    InternalBarrierTimeout(std::time::Duration),
}
