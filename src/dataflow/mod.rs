//! The dataflow analysis engine: an abstract-interpretation
//! fixpoint over CI/Bash pipelines. `state` defines the lattice and transfer
//! filters, `node` the node hierarchy and worklist algorithm, `forest`
//! traversal helpers used by later components to walk the built graph.

pub mod forest;
pub mod node;
pub mod state;

pub use node::{AnalysisContext, Node, NodeHandle};
pub use state::{transfer_state, AllowAll, DebugLabel, ExcludeLocations, ExcludeScopes, ExitType, State, StateTransferFilter};
