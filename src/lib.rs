//! Async client for the sumo statistics API.
//!
//! ```no_run
//! use sumoapi::{ClientConfig, SumoApi, SumoClient};
//!
//! # async fn demo() -> sumoapi::Result<()> {
//! let client = SumoClient::new(ClientConfig::default())?;
//! let rikishi = client.get_rikishi(1511).await?;
//! println!("{}", rikishi.shikona_en);
//! client.close();
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod sumo;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use sumo::{SumoApi, SumoClient};
