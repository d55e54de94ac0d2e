mod cli;

pub use cli::{Backend, Cli, Command};
