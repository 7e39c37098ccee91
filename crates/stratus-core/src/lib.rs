//! Stratus core
//!
//! The resource model shared by every provider crate and the CLI: typed
//! resource declarations, the [`Stack`] program context wiring declarations
//! into the deferred-value graph, explicit program configuration, and typed
//! [`Output`] handles for values that only exist after provisioning.

pub mod config;
pub mod error;
pub mod output;
pub mod property;
pub mod resource;
pub mod stack;

pub use config::{ConfigKey, ProgramConfig};
pub use error::{CoreError, Result};
pub use output::Output;
pub use property::{Input, PropertyValue};
pub use resource::{physical_name, Resource, ResourceDecl};
pub use stack::{Export, ResourceEntry, Stack};

// Graph types cross this crate's API (ids in properties, graph access on
// the stack), so re-export them for consumers.
pub use stratus_graph::{GraphError, OutputGraph, OutputId, Value, ValueState};
