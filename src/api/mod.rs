//! Admin API interaction module
//!
//! # Module Structure
//!
//! - [`auth`] - Obtaining an API key through the web login form
//! - [`client`] - Main admin client, URL helpers, summaries, and site import
//! - [`collection`] - List, lookup, create, update, and delete for each resource kind
//! - [`http`] - HTTP utilities and transport options
//!
//! # Example
//!
//! ```ignore
//! use gophish_client::api::{ApiClient, ClientOptions};
//!
//! async fn example() -> gophish_client::Result<()> {
//!     let client = ApiClient::new("https://localhost:3333", "api-key")?;
//!     if let Some(page) = client.pages().get_by_name("Login portal").await? {
//!         client.pages().delete_by_id(page.id).await?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Requests from one client may be issued concurrently; the client adds no locking, rate
//! limiting, or retries of its own.

pub mod auth;
pub mod client;
pub mod collection;
pub mod http;

pub use auth::{bootstrap, Bootstrap, LoginPatterns};
pub use client::ApiClient;
pub use collection::Collection;
pub use http::ClientOptions;
