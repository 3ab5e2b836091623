pub mod call;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
#[cfg(feature = "macros")]
pub mod macros;

pub use call::{AbortableCall, CancelHandle};
pub use client::Client;
pub use config::{ClientConfig, RequestHook, ResponseHook};
pub use error::{ClientError, ConfigError};

pub use rpclane_core::{
    date, merge_headers, CallId, ErrorCode, ErrorObject, FieldViolation, HeaderError, LocSegment,
};
pub use rpclane_transport::{HttpTransport, RequestDescriptor, ResponseDescriptor, TransportError};
