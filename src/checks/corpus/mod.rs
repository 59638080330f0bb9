//! The representative check corpus: `build_as_code`,
//! `detect_malicious_metadata`, and `dockerfile_security`, each consuming
//! components A-G and producing its own typed [`super::facts::CheckFact`].

pub mod build_as_code;
pub mod detect_malicious_metadata;
pub mod dockerfile_security;
