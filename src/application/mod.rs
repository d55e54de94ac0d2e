mod application;
pub mod data;
mod output;
mod runtime_config;

pub use application::{Application, ApplicationError, Outcome};
pub use runtime_config::RuntimeConfig;
