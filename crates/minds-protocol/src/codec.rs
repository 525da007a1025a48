//! Codec trait and the JSON implementation.
//!
//! The server doesn't care how events become wire text — anything
//! implementing [`Codec`] will do. JSON is the only codec today because
//! the browser client speaks JSON text frames.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes values to wire text and decodes wire text back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a text frame.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes a text frame back into a value.
    fn decode<T: DeserializeOwned>(&self, data: &str) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &str) -> Result<T, ProtocolError> {
        serde_json::from_str(data).map_err(ProtocolError::Decode)
    }
}
