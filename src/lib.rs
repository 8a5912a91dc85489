//! PingDirectory provider
//!
//! Exposes the PingDirectory Configuration API as declarative resources
//! served over a gRPC plugin protocol.
//!
//! # Overview
//!
//! - **Protocol**: prost/tonic types for the plugin protocol, JSON payloads
//! - **Server**: the [`ProviderService`] trait and [`serve`], which prints the
//!   handshake line and serves until shutdown
//! - **Client**: [`client::ConfigClient`], a basic-auth client for `/config`
//! - **Model**: attribute tables describing each configuration object kind,
//!   plan modification and PATCH operation diffing
//! - **Resources**: `pingdirectory_backend`, `pingdirectory_default_backend`
//!   and the `pingdirectory_backend(s)` data sources
//!
//! # Handshake Protocol
//!
//! When the provider starts via [`serve`], it writes one line to stdout:
//!
//! ```text
//! PINGDIRECTORY_PROVIDER|1|127.0.0.1:50051
//! ```
//!
//! Format: `PINGDIRECTORY_PROVIDER|<protocol_version>|<address>`
//!
//! # Provider Configuration
//!
//! ```hcl
//! provider "pingdirectory" {
//!   https_host      = "https://localhost:1443"
//!   username        = "cn=administrator"
//!   password        = "2FederateM0re"
//!   product_version = "9.3.0.0"
//! }
//! ```
//!
//! Each attribute may instead come from a `PINGDIRECTORY_PROVIDER_*`
//! environment variable; see [`config`].

#![warn(clippy::all)]

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod operations;
pub mod plan;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod server;
pub mod testing;
pub mod types;
pub mod validation;
pub mod version;

#[allow(missing_docs)]
#[allow(clippy::all)]
pub mod generated;

pub use error::ProviderError;
pub use logging::{init_logging, try_init_logging};
pub use provider::{PingDirectoryProvider, ProviderContext};
pub use schema::ProviderSchema;
pub use server::{serve, serve_with_options, ProviderService, ServeOptions};
pub use types::{
    AttributeChange, ImportedResource, PlanResult, ProviderMetadata, ServerCapabilities,
    StateResponse, HANDSHAKE_PREFIX, PROTOCOL_VERSION, UNKNOWN_VALUE,
};
pub use validation::validate;
pub use version::ProductVersion;
