//! Gateway implementation and builder

mod builder;
mod dispatch;
mod pending;

pub use builder::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, DEFAULT_TOKEN_HEADER, Munin, MuninBuilder};
pub use dispatch::{RequestGateway, ResponseFuture};
