//! Pluggable serialization for role sets and single roles.
//!
//! A format is anything implementing [`Marshaler`]. The schemas in
//! [`role_set`] are written against that capability only, so adding a format
//! means adding one adapter.

mod binary;
pub mod role_set;
mod text;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub use binary::BsonCodec;
pub use role_set::{marshal_role, unmarshal_role, RoleSetData};
pub use text::{JsonCodec, TomlCodec};

/// Encoding and decoding errors.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),

    #[error("TOML decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),

    #[error("BSON encode error: {0}")]
    BsonEncode(#[from] bson::ser::Error),

    #[error("BSON decode error: {0}")]
    BsonDecode(#[from] bson::de::Error),

    #[error("Invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// A single-role payload named a role the registry does not know.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Unknown format: {0} (expected json, toml or bson)")]
    UnknownFormat(String),
}

/// Byte-oriented structured format.
pub trait Marshaler {
    fn marshal<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    fn unmarshal<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// Format selected at runtime, e.g. from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodecFormat {
    #[default]
    Json,
    Toml,
    Bson,
}

impl CodecFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Bson => "bson",
        }
    }
}

impl fmt::Display for CodecFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodecFormat {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "toml" => Ok(Self::Toml),
            "bson" => Ok(Self::Bson),
            other => Err(CodecError::UnknownFormat(other.to_string())),
        }
    }
}

impl Marshaler for CodecFormat {
    fn marshal<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        match self {
            Self::Json => JsonCodec.marshal(value),
            Self::Toml => TomlCodec.marshal(value),
            Self::Bson => BsonCodec.marshal(value),
        }
    }

    fn unmarshal<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        match self {
            Self::Json => JsonCodec.unmarshal(bytes),
            Self::Toml => TomlCodec.unmarshal(bytes),
            Self::Bson => BsonCodec.unmarshal(bytes),
        }
    }
}
