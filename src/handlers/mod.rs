// Handler modules
pub mod info;
pub mod install;
pub mod lint;

// Re-export all handler functions
pub use info::{handle_config, handle_version};
pub use install::{InstallOptions, handle_install};
pub use lint::{LintOptions, handle_lint};
