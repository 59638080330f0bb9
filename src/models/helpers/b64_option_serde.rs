use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Deserializer, Serializer};

#[allow(dead_code)]
pub fn serialize<S>(bytes: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match bytes {
        Some(bytes) => serializer.serialize_str(general_purpose::STANDARD.encode(bytes).as_str()),
        None => serializer.serialize_none(),
    }
}

#[allow(dead_code)]
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
where
    D: Deserializer<'de>,
{
    let bytes_option: Option<String> = Option::deserialize(deserializer)?;

    match bytes_option {
        Some(bytes) => {
            let deserialized_bytes = general_purpose::STANDARD
                .decode(bytes)
                .map_err(serde::de::Error::custom)?;
            Ok(Some(deserialized_bytes))
        }
        None => Ok(None),
    }
}
