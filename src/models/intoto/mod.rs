pub mod predicate;
pub mod provenance;
pub mod provenancev02;
pub mod statement;

// NOTE(mlieberman85): Many of the models include additional schemars attributes, e.g. "with".
// See: https://github.com/GREsau/schemars/issues/89 for more info.
