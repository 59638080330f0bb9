//! In-toto envelope validation: checking that a payload is a well-formed
//! Statement wrapping a predicate type this analyzer understands.

use serde_json::Value as Json;

use crate::error::ValidateInTotoPayloadError;

pub const IN_TOTO_STATEMENT_V1_TYPE: &str = "https://in-toto.io/Statement/v1";
pub const IN_TOTO_STATEMENT_V01_TYPE: &str = "https://in-toto.io/Statement/v0.1";

pub const SLSA_V01_PREDICATE_TYPE: &str = "https://slsa.dev/provenance/v0.1";
pub const SLSA_V02_PREDICATE_TYPE: &str = "https://slsa.dev/provenance/v0.2";
pub const SLSA_V1_PREDICATE_TYPE: &str = "https://slsa.dev/provenance/v1";
pub const WITNESS_COLLECTION_V01_PREDICATE_TYPE: &str =
    "https://witness.testifysec.com/attestation-collection/v0.1";

/// `(_type, predicateType)` pairs this analyzer considers well-formed.
/// Any other combination — including a
/// recognized `_type` paired with a `predicateType` it doesn't allow — fails
/// validation, matching the original's combination table rather than
/// checking each field in isolation.
const ALLOWED_COMBINATIONS: &[(&str, &str)] = &[
    (IN_TOTO_STATEMENT_V1_TYPE, SLSA_V1_PREDICATE_TYPE),
    (IN_TOTO_STATEMENT_V01_TYPE, SLSA_V02_PREDICATE_TYPE),
    (IN_TOTO_STATEMENT_V01_TYPE, SLSA_V01_PREDICATE_TYPE),
    (IN_TOTO_STATEMENT_V01_TYPE, WITNESS_COLLECTION_V01_PREDICATE_TYPE),
];

/// A validated, dialect-agnostic envelope: the statement `_type`, the
/// `predicateType`, and the raw `predicate` JSON for a dialect-specific
/// extractor (see [`super::extractor`]) to walk.
#[derive(Debug, Clone)]
pub struct ValidatedEnvelope {
    pub statement_type: String,
    pub predicate_type: String,
    pub predicate: Json,
    pub subjects: Vec<Json>,
}

/// Parses and validates `payload` as an in-toto Statement: the `(_type,
/// predicateType)` pair must be one of [`ALLOWED_COMBINATIONS`], and
/// `predicate` must be present.
pub fn validate_envelope(payload: &Json) -> Result<ValidatedEnvelope, ValidateInTotoPayloadError> {
    let statement_type = payload
        .get("_type")
        .and_then(Json::as_str)
        .ok_or_else(|| ValidateInTotoPayloadError::UnexpectedStatementType("<missing>".to_string()))?;

    let predicate_type = payload
        .get("predicateType")
        .and_then(Json::as_str)
        .ok_or_else(|| ValidateInTotoPayloadError::UnexpectedPredicateType("<missing>".to_string()))?;

    if !ALLOWED_COMBINATIONS
        .iter()
        .any(|(t, p)| *t == statement_type && *p == predicate_type)
    {
        if !ALLOWED_COMBINATIONS.iter().any(|(t, _)| *t == statement_type) {
            return Err(ValidateInTotoPayloadError::UnexpectedStatementType(
                statement_type.to_string(),
            ));
        }
        return Err(ValidateInTotoPayloadError::UnexpectedPredicateType(
            predicate_type.to_string(),
        ));
    }

    let predicate = payload
        .get("predicate")
        .cloned()
        .ok_or_else(|| ValidateInTotoPayloadError::UnexpectedPredicateType(predicate_type.to_string()))?;

    let subjects = payload
        .get("subject")
        .and_then(Json::as_array)
        .cloned()
        .unwrap_or_default();

    Ok(ValidatedEnvelope {
        statement_type: statement_type.to_string(),
        predicate_type: predicate_type.to_string(),
        predicate,
        subjects,
    })
}
