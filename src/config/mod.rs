//! Engine configuration.
//!
//! Settings and statutory contribution tables are loaded from a YAML
//! configuration directory, validated up front so bracket-coverage defects
//! surface at load time rather than mid-payroll.

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::EngineSettings;
