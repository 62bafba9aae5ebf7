//! Configuration management for copyloto
//!
//! Two kinds of configuration:
//! - **session**: per-load settings resolved from the loaded document or the
//!   array picker (array path, display/copy fields, color rules)
//! - **preferences**: display preferences persisted as JSON between runs

pub mod preferences;
pub mod session;

pub use preferences::DisplayPreferences;
pub use session::{ArrayPath, ConfigPatch, SessionConfig};
