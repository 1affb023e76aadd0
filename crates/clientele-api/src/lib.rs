// clientele-api: Async Rust client for the appliance's client-management REST API

pub mod client;
pub mod clients;
pub mod error;
pub mod groups;
pub mod info;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
pub use types::{
    ClientEntry, ClientUpdate, DatabaseCounts, GroupEntry, NewClient, SuggestionEntry,
};
