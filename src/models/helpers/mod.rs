pub mod b64_option_serde;
pub mod url_serde;
