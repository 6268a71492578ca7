#![crate_name = "sascar_rs"]

//! # SasIntegra Client
//!
//! `sascar_rs` is a web client which is used to consume Sascar's SasIntegra web service, a SOAP API for their fleet telemetry platform.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sascar_rs::{Credentials, SascarClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = SascarClient::builder()
//!         .credentials(Credentials::from_env().unwrap())
//!         .build();
//!
//!     let vehicles = client.vehicles(0).await.unwrap();
//!     sascar_rs::export::export(&vehicles, "veiculos", sascar_rs::Format::Csv).unwrap();
//! }
//! ```

pub mod client;
pub mod credentials;
pub mod error;
pub mod export;
mod macros;
pub mod models;
pub mod params;
mod record;
pub mod requests;
pub mod responses;
pub mod service;

pub use client::{RetryPolicy, SascarClient};
pub use credentials::Credentials;
pub use error::SascarError;
pub use export::Format;
pub use params::Parameters;
pub use service::{format_datetime, PositionScope};

pub use serde_json::Value;

/// Result type for the sascar-rs crate.
pub type SascarResult<T> = Result<T, SascarError>;
