// Wire-level building blocks shared by the rpclane transport and client:
// call/response envelopes, correlation ids, the error object, the calendar
// date codec and header merging.

pub mod codec;
pub mod date;
pub mod error;
pub mod headers;
pub mod ids;
pub mod msg;

pub use codec::{decode_call, decode_response, encode_call};
pub use date::DateError;
pub use error::{EnvelopeError, ErrorCode, ErrorObject, FieldViolation, LocSegment};
pub use headers::{merge_headers, HeaderError, HeaderSink};
pub use ids::{next_call_id, CallId, CallIdAllocator};
pub use msg::{CallEnvelope, Outcome, ResponseEnvelope};
