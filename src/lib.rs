//! `slsa_sentry`: a supply-chain analyzer that reconstructs a software
//! component's build pipeline and evaluates it against the SLSA framework.
//!
//! This library is the core analyzer: a dataflow analysis
//! engine over CI/Bash pipelines (`dataflow`, `ci`), a provenance
//! extractor/validator (`provenance`, `models::intoto`), a check registry
//! and scheduler (`checks`), and a PURL-to-commit resolver (`repo`).
//! Everything the core merely *consumes* as a contract — CLI parsing,
//! config-file loading, rendering, database persistence, remote cloning,
//! package-registry/OSV HTTP access — is modeled as a trait or plain data
//! shape in `registry_access`/`ci_service`/`config`, never implemented here.

pub mod buildtool;
pub mod checks;
pub mod ci;
pub mod ci_service;
pub mod config;
pub mod dataflow;
pub mod error;
pub mod models;
pub mod provenance;
pub mod registry_access;
pub mod repo;
