use std::path::PathBuf;

use ufs::{FilesystemOptions, NormalizedPath};

use crate::cli::{Backend, Cli, Command};

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub store: PathBuf,
    pub backend: Backend,
    pub options: FilesystemOptions,
    pub json: bool,
    pub command: Command,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            store: cli.store,
            backend: cli.backend,
            options: FilesystemOptions {
                starting_directory: NormalizedPath::from(cli.current_directory.as_str()),
            },
            json: cli.json,
            command: cli.command,
        }
    }
}
