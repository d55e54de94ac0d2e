use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Run filesystem operations against a virtual JSON volume")]
pub struct Cli {
    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// File holding the virtual volume
    #[clap(long, short, default_value = "ufs.json")]
    pub store: PathBuf,

    /// How the volume is laid out in the store file
    #[clap(long, short, default_value = "json", value_enum)]
    pub backend: Backend,

    /// Directory that relative paths resolve against
    #[clap(long = "cwd", short = 'C', default_value = "/")]
    pub current_directory: String,

    /// Print listings and trees as JSON
    #[clap(long)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Backend {
    /// One JSON document holding the whole tree
    #[default]
    Json,
    /// One record per file or empty directory
    Records,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the normalized form of the joined fragments
    Resolve {
        #[arg(required = true)]
        fragments: Vec<String>,
    },
    /// List a directory
    Ls {
        #[arg(default_value = ".")]
        path: String,
    },
    /// Print a file's contents
    Cat { path: String },
    /// Create an empty directory
    Mkdir { path: String },
    /// Create or overwrite a file
    Write { path: String, contents: String },
    /// Print whether a node exists
    Exists { path: String },
    /// Print whether a node is a file or a directory
    Stat { path: String },
    /// Delete a file
    Rm { path: String },
    /// Delete a directory and everything below it
    Rmdir { path: String },
    /// Move or rename a node
    Mv { from: String, to: String },
    /// Print the whole volume
    Tree,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_options_and_subcommand() {
        let cli = Cli::try_parse_from([
            "ufs", "--store", "vol.json", "-b", "records", "-C", "/home", "mv", "a", "b",
        ])
        .unwrap();

        assert_eq!(cli.store, PathBuf::from("vol.json"));
        assert_eq!(cli.backend, Backend::Records);
        assert_eq!(cli.current_directory, "/home");
        assert_eq!(
            cli.command,
            Command::Mv {
                from: "a".into(),
                to: "b".into()
            }
        );
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["ufs", "ls"]).unwrap();

        assert_eq!(cli.store, PathBuf::from("ufs.json"));
        assert_eq!(cli.backend, Backend::Json);
        assert_eq!(cli.current_directory, "/");
        assert!(!cli.json);
        assert_eq!(cli.command, Command::Ls { path: ".".into() });
    }

    #[test]
    fn resolve_requires_fragments() {
        assert!(Cli::try_parse_from(["ufs", "resolve"]).is_err());
    }
}
