//! EventHub analytics API client

pub mod body;
pub mod codec;
pub mod errors;
pub mod event;
mod event_hub;
pub mod filter;
mod http_client;
mod hyper_client;
mod options;
pub mod response;
pub mod user;
pub mod validate;

pub use codec::Codec;
pub use errors::{Error, Result};
pub use event::Event;
pub use event_hub::{EventHub, DEFAULT_EVENTHUB_URL};
pub use filter::FilterMap;
pub use http_client::{HaveHttpClient, HttpClient};
pub use hyper_client::HyperClient;
pub use options::*;
pub use user::User;
