// letmein-api: Async Rust client for the ONOS northbound REST API.

pub mod client;
pub mod devices;
pub mod error;
pub mod flows;
pub mod models;
pub mod netcfg;
pub mod transport;

pub use client::{Credentials, OnosClient};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
