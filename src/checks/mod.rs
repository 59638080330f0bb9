//! The check registry, scheduler, and corpus:
//! `registry` validates check ids and resolves the dependency DAG,
//! `scheduler` runs checks in order and applies skip propagation, `facts`
//! defines the shared result/fact shapes checks persist, `confidence`
//! holds the shared confidence-level constants the corpus scores facts
//! with, and `corpus` holds the representative checks themselves.

pub mod confidence;
pub mod corpus;
pub mod facts;
pub mod registry;
pub mod scheduler;

pub use facts::{CheckFact, CheckResult, CheckResultType, SkippedInfo};
pub use registry::{CheckDescriptor, Registry};
pub use scheduler::{scan, CheckRunner};
