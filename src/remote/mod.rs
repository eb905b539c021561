//! Remote feed loading
//!
//! Fetches the raw feed over an HTTP transport abstraction and maps the wire
//! payload into domain records. Transport failures and malformed payloads are
//! reported as two distinct error kinds so callers can decide what is worth
//! retrying; a malformed payload never is.

mod client;
mod loader;
mod mapper;

pub use client::{HttpClient, HttpError, HttpResponse, ReqwestHttpClient};
pub use loader::{RemoteError, RemoteFeedLoader};
