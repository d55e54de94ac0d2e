use snafu::Snafu;
use snafu::prelude::*;
use tracing::debug;
use ufs::{
    AsyncFilesystem, AsyncStorage, EntryKind, FileRecords, Filesystem, FilesystemError,
    JsonFileStorage, Listing, NormalizedPath, RecordStorage, Storage, StorageError, Store,
};

use crate::application::RuntimeConfig;
use crate::application::output;
use crate::cli::{Backend, Command};

/// Result of one command, rendered after the engine is done with the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Path(NormalizedPath),
    Listing(Listing),
    Contents(String),
    Exists(bool),
    Kind(Option<EntryKind>),
    Tree(Store),
    Done,
}

pub struct Application;

impl Application {
    pub async fn run(config: impl Into<RuntimeConfig>) -> Result<Outcome, ApplicationError> {
        let config: RuntimeConfig = config.into();
        debug!("Runtime config: {:?}", config);

        let outcome = match config.backend {
            Backend::Json => {
                let filesystem = Filesystem::with_options(
                    JsonFileStorage::new(&config.store),
                    config.options.clone(),
                );
                Self::execute(&filesystem, &config.command)?
            }
            Backend::Records => {
                let filesystem = AsyncFilesystem::with_options(
                    RecordStorage::new(FileRecords::new(&config.store)),
                    config.options.clone(),
                );
                Self::execute_async(&filesystem, &config.command).await?
            }
        };

        output::print(&outcome, config.json).context(RenderSnafu)?;
        Ok(outcome)
    }

    fn execute<S: Storage>(
        filesystem: &Filesystem<S>,
        command: &Command,
    ) -> Result<Outcome, ApplicationError> {
        let outcome = match command {
            Command::Resolve { fragments } => Outcome::Path(filesystem.resolve_path(fragments.as_slice())?),
            Command::Ls { path } => Outcome::Listing(filesystem.read_directory(path)?),
            Command::Cat { path } => Outcome::Contents(filesystem.read_file(path)?),
            Command::Mkdir { path } => {
                filesystem.make_directory(path)?;
                Outcome::Done
            }
            Command::Write { path, contents } => {
                filesystem.write_file(path, contents)?;
                Outcome::Done
            }
            Command::Exists { path } => Outcome::Exists(filesystem.exists(path)?),
            Command::Stat { path } => {
                let kind = if filesystem.is_file(path)? {
                    Some(EntryKind::File)
                } else if filesystem.is_directory(path)? {
                    Some(EntryKind::Directory)
                } else {
                    None
                };
                Outcome::Kind(kind)
            }
            Command::Rm { path } => {
                filesystem.delete_file(path)?;
                Outcome::Done
            }
            Command::Rmdir { path } => {
                filesystem.delete_directory(path)?;
                Outcome::Done
            }
            Command::Mv { from, to } => {
                filesystem.rename(from, to)?;
                Outcome::Done
            }
            Command::Tree => Outcome::Tree(filesystem.storage().load().context(VolumeSnafu)?),
        };
        Ok(outcome)
    }

    async fn execute_async<S: AsyncStorage>(
        filesystem: &AsyncFilesystem<S>,
        command: &Command,
    ) -> Result<Outcome, ApplicationError> {
        let outcome = match command {
            Command::Resolve { fragments } => Outcome::Path(filesystem.resolve_path(fragments.as_slice())?),
            Command::Ls { path } => Outcome::Listing(filesystem.read_directory(path).await?),
            Command::Cat { path } => Outcome::Contents(filesystem.read_file(path).await?),
            Command::Mkdir { path } => {
                filesystem.make_directory(path).await?;
                Outcome::Done
            }
            Command::Write { path, contents } => {
                filesystem.write_file(path, contents).await?;
                Outcome::Done
            }
            Command::Exists { path } => Outcome::Exists(filesystem.exists(path).await?),
            Command::Stat { path } => {
                let kind = if filesystem.is_file(path).await? {
                    Some(EntryKind::File)
                } else if filesystem.is_directory(path).await? {
                    Some(EntryKind::Directory)
                } else {
                    None
                };
                Outcome::Kind(kind)
            }
            Command::Rm { path } => {
                filesystem.delete_file(path).await?;
                Outcome::Done
            }
            Command::Rmdir { path } => {
                filesystem.delete_directory(path).await?;
                Outcome::Done
            }
            Command::Mv { from, to } => {
                filesystem.rename(from, to).await?;
                Outcome::Done
            }
            Command::Tree => Outcome::Tree(
                filesystem
                    .storage()
                    .load()
                    .await
                    .context(VolumeSnafu)?,
            ),
        };
        Ok(outcome)
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Filesystem operation failed"), context(false))]
    OperationError { source: FilesystemError },
    #[snafu(display("Failed to load the volume"))]
    VolumeError { source: StorageError },
    #[snafu(display("Failed to render the result"))]
    RenderError { source: serde_json::Error },
}
