//! CLI command implementations.

mod config;
mod doctor;
mod generate;
mod init;
mod voices;

pub use config::run_config;
pub use doctor::run_doctor;
pub use generate::{run_generate, GenerateArgs};
pub use init::run_init;
pub use voices::run_voices;
