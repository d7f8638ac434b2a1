//! # Data Models
//!
//! SeaORM entities for the registry tables and the small response types shared
//! by the handlers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod company;
pub mod document;
pub mod machine;

pub use company::Entity as Company;
pub use document::Entity as Document;
pub use machine::Entity as Machine;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "registry".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
