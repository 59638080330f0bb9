//! Confidence-level constants shared by the check corpus.
//!
//! `CheckFact.confidence` is constrained to `[0, 1]` but nothing fixes
//! numeric values for the named levels the original check implementations
//! use (`Confidence.HIGH/MEDIUM/LOW`); that enum's definition was not
//! available in the original source, so these three points are an explicit
//! design decision (see DESIGN.md) rather than a ported constant.

pub const HIGH: f64 = 1.0;
pub const MEDIUM: f64 = 0.6;
pub const LOW: f64 = 0.2;
