//! Public types for the Munin API.

mod method;
mod request;
mod transport;

pub use method::Method;
pub use request::Request;
pub use transport::{TransportRequest, TransportResponse};
