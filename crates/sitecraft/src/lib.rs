//! Sitecraft - relay chat prompts to a website-generation service and deliver
//! the generated HTML back to the user as a document.

pub mod artifact;
pub mod config;
pub mod generator;
pub mod locale;
pub mod relay;

pub use config::Config;
pub use relay::MessageRelay;
