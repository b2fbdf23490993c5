//! Data models for the Tabspire backend.
//!
//! Serialized field names match the extension's TypeScript interfaces (camelCase).

mod audio;
mod cache;
mod devotional;
mod photo;
mod preferences;
mod verse;

pub use audio::*;
pub use cache::*;
pub use devotional::*;
pub use photo::*;
pub use preferences::*;
pub use verse::*;
