//! Client library for the Weather Machine forecast API.
//!
//! This crate defines:
//! - The [`WeatherClient`] request builder and its projection helpers
//! - Validated request options (source, units, output)
//! - A pluggable HTTP [`Transport`]
//! - On-disk configuration used by `weathermachine-cli`

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod options;
pub mod transport;

pub use client::{DEFAULT_ENDPOINT, MAX_WARNINGS, WeatherClient};
pub use config::Config;
pub use error::Error;
pub use model::{ForecastResponse, entry_time};
pub use options::{InvalidOption, OptionKind, Output, Source, Units};
pub use transport::{ReqwestTransport, Transport, TransportResponse};
