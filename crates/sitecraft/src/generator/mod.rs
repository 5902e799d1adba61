//! Client for the remote website-generation service.

mod deepsite;
mod error;
mod provider;

pub use deepsite::DeepSiteClient;
pub use error::GenerationError;
pub use provider::SiteGenerator;
