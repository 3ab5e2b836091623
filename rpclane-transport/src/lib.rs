pub mod reqwest_transport;
pub mod transport;

pub use reqwest_transport::ReqwestTransport;
pub use transport::{
    HttpTransport, RequestDescriptor, ResponseDescriptor, TransportError, JSON_ACCEPT,
    JSON_CONTENT_TYPE,
};
