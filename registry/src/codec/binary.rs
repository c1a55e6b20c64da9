//! Binary formats.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{CodecError, Marshaler};

/// BSON via `bson`. Values must serialize to a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct BsonCodec;

impl Marshaler for BsonCodec {
    fn marshal<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        Ok(bson::to_vec(value)?)
    }

    fn unmarshal<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        Ok(bson::from_slice(bytes)?)
    }
}
