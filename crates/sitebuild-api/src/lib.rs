// sitebuild-api: Async Rust client for the cloud site and inventory endpoints

pub mod client;
pub mod error;
pub mod inventory;
pub mod models;
pub mod sites;
pub mod templates;
pub mod transport;

pub use client::Client;
pub use error::Error;
pub use models::{
    AssignRequest, AssignmentResult, InventoryDevice, InventoryOp, LatLng, NewSite, Site,
    SiteSetting, Template, TemplateApplies, TemplateUpdate,
};
pub use transport::{TlsMode, TransportConfig};
