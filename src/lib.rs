//! Typed Rust client for the Esendex XML message dispatch API.
//!
//! The crate is split into a domain layer of strong types, a transport layer for
//! the XML wire format, and a small client layer orchestrating requests.
//!
//! ```rust,no_run
//! use esendex_dispatch::{AccountReference, Credentials, EsendexClient, OutboundMessage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), esendex_dispatch::EsendexError> {
//!     let client = EsendexClient::new(Credentials::new("user@example.com", "...")?);
//!     let account = client.account(AccountReference::new("EX0000000")?);
//!     let message = OutboundMessage::new("447700900123", "hello");
//!     let result = account.send(vec![message]).await?;
//!     println!("batch {}", result.batch_id);
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
mod transport;

pub use client::{AccountClient, Credentials, EsendexClient, EsendexClientBuilder, EsendexError};
pub use domain::{
    AccountReference, DispatchResult, MessageResult, OutboundMessage, Password, Username,
    ValidationError,
};
