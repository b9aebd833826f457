// rkv-common - Shared types for RemoteKV
//
// This crate defines the application error value used across the workspace

pub mod error;

// Re-export for convenience
pub use error::*;
