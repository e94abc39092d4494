//! Client for the Gophish phishing-simulation platform
//!
//! - [`api`] - Admin API: login bootstrap and resource management
//! - [`definition`] - YAML resource definitions with variables and included files
//! - [`models`] - Templates, pages, sending profiles, groups, and campaigns
//! - [`phish`] - Open and click tracking against the public server
//!
//! # Example
//!
//! ```ignore
//! use gophish_client::definition::{load, Variables};
//! use gophish_client::models::Campaign;
//! use gophish_client::{ClientOptions, Gophish};
//!
//! async fn run() -> gophish_client::Result<()> {
//!     let options = ClientOptions::default();
//!     let gophish = Gophish::from_credentials(
//!         "https://phish.example.com",
//!         "https://localhost:3333",
//!         "admin",
//!         "password",
//!         &options,
//!     )
//!     .await?;
//!
//!     let campaign = load::<Campaign>("defs/campaign.yaml", &Variables::new())?;
//!     gophish.api.campaigns().create(&campaign).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod definition;
pub mod error;
pub mod models;
pub mod phish;

pub use api::{ApiClient, ClientOptions, Collection};
pub use error::{Error, Result};
pub use phish::{TrackOptions, TrackingClient};

/// Admin API and tracking clients together
#[derive(Clone)]
pub struct Gophish {
    pub api: ApiClient,
    pub phish: TrackingClient,
}

impl Gophish {
    pub fn new(
        phish_url: &str,
        admin_url: &str,
        api_key: &str,
        options: &ClientOptions,
    ) -> Result<Self> {
        Ok(Self {
            api: ApiClient::with_options(admin_url, api_key, options)?,
            phish: TrackingClient::new(phish_url, options)?,
        })
    }

    /// Log in to the admin console to obtain the API key
    pub async fn from_credentials(
        phish_url: &str,
        admin_url: &str,
        username: &str,
        password: &str,
        options: &ClientOptions,
    ) -> Result<Self> {
        Ok(Self {
            api: ApiClient::from_credentials(admin_url, username, password, options).await?,
            phish: TrackingClient::new(phish_url, options)?,
        })
    }
}
