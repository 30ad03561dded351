// sitebuild-core: Site provisioning workflow between sitebuild-api and the CLI.

pub mod config;
pub mod convert;
pub mod error;
pub mod mac;
pub mod model;
pub mod provision;
pub mod remote;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{Coordinates, SiteBuildConfig, SiteSettings, TemplateIds, TlsVerification};
pub use error::CoreError;
pub use mac::{MacAddress, split_operator_input, validate_macs};
pub use model::{AssignmentFailure, AssignmentReport, Device, Site};
pub use provision::{Operator, ProvisionOutcome, Provisioner, SiteBuildApi, Step};
pub use remote::connect;
pub use source::{DEFAULT_DEVICES_FILE, DeviceSource, resolve_device_list};
