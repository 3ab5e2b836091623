use crate::error::EnvelopeError;
use crate::msg::{CallEnvelope, ResponseEnvelope};
use bytes::Bytes;

pub fn encode_call(envelope: &CallEnvelope) -> Result<Bytes, serde_json::Error> {
    let json = serde_json::to_vec(envelope)?;
    Ok(Bytes::from(json))
}

pub fn decode_call(data: &[u8]) -> Result<CallEnvelope, serde_json::Error> {
    serde_json::from_slice(data)
}

pub fn decode_response(data: &[u8]) -> Result<ResponseEnvelope, EnvelopeError> {
    let value = serde_json::from_slice(data)?;
    ResponseEnvelope::from_value(value)
}
