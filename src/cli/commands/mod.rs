//! Command implementations for the ner-features CLI
//!
//! Each command has its own module and returns a displayable error string.

pub mod count;
pub mod generate;
pub mod models;

pub use count::cmd_count;
pub use generate::cmd_generate;
pub use models::cmd_models;
