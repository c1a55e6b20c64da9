//! Human-readable formats.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{CodecError, Marshaler};

/// JSON via `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Marshaler for JsonCodec {
    fn marshal<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(serde_json::to_vec(value)?)
    }

    fn unmarshal<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// TOML via `toml`. Values must serialize to a table.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCodec;

impl Marshaler for TomlCodec {
    fn marshal<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(toml::to_string(value)?.into_bytes())
    }

    fn unmarshal<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(toml::from_str(text)?)
    }
}
