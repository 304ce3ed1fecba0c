//! Infrastructure layer for consilium
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod council;

// Re-export commonly used types
pub use config::{ConfigLoader, ConfigValidationError, FileConfig};
pub use council::{framing::FrameDecoder, gateway::HttpCouncilGateway, protocol::decode_frame};
