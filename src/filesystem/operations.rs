//! File and directory primitives applied to an already loaded [`Store`].
//!
//! Every function validates existence and node type, converting navigation
//! failures into [`FilesystemError`]s that carry the operation name and the
//! resolved path. None of them touch the backing store.

use snafu::ensure;

use crate::filesystem::error::{
    AlreadyExistsSnafu, FilesystemError, InvalidArgumentSnafu, IsADirectorySnafu,
    NotADirectorySnafu, NotFoundSnafu,
};
use crate::filesystem::navigator::{Blocked, Location, locate};
use crate::filesystem::tree::{self, Listing, Node, Store};
use crate::filesystem::NormalizedPath;

/// Whether an operation leaves the tree untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    ReadOnly,
    Mutating,
}

impl Persistence {
    pub fn should_persist(self) -> bool {
        self == Persistence::Mutating
    }
}

fn blocked(operation: &'static str, path: &NormalizedPath, reason: Blocked) -> FilesystemError {
    match reason {
        Blocked::Missing => NotFoundSnafu {
            operation,
            path: path.clone(),
        }
        .build(),
        Blocked::NotADirectory => NotADirectorySnafu {
            operation,
            path: path.clone(),
        }
        .build(),
    }
}

fn locate_for<'tree, 'path>(
    operation: &'static str,
    store: &'tree mut Store,
    path: &'path NormalizedPath,
) -> Result<Location<'tree, 'path>, FilesystemError> {
    locate(&mut store.files, path).map_err(|reason| blocked(operation, path, reason))
}

pub fn exists(store: &mut Store, path: &NormalizedPath) -> bool {
    locate(&mut store.files, path).is_ok_and(|location| location.exists())
}

pub fn is_file(store: &mut Store, path: &NormalizedPath) -> bool {
    locate(&mut store.files, path).is_ok_and(|location| location.is_file())
}

pub fn is_directory(store: &mut Store, path: &NormalizedPath) -> bool {
    locate(&mut store.files, path).is_ok_and(|location| location.is_directory())
}

/// Fails unless `path` names an existing directory.
pub fn require_directory(
    operation: &'static str,
    store: &mut Store,
    path: &NormalizedPath,
) -> Result<(), FilesystemError> {
    let location = locate_for(operation, store, path)?;
    ensure!(
        location.exists(),
        NotFoundSnafu {
            operation,
            path: path.clone(),
        }
    );
    ensure!(
        location.is_directory(),
        NotADirectorySnafu {
            operation,
            path: path.clone(),
        }
    );
    Ok(())
}

pub fn read_directory(store: &mut Store, path: &NormalizedPath) -> Result<Listing, FilesystemError> {
    const OPERATION: &str = "read_directory";
    let location = locate_for(OPERATION, store, path)?;
    ensure!(
        location.exists(),
        NotFoundSnafu {
            operation: OPERATION,
            path: path.clone(),
        }
    );
    match location.into_directory() {
        Some(children) => Ok(tree::list(children)),
        None => NotADirectorySnafu {
            operation: OPERATION,
            path: path.clone(),
        }
        .fail(),
    }
}

pub fn read_file(store: &mut Store, path: &NormalizedPath) -> Result<String, FilesystemError> {
    const OPERATION: &str = "read_file";
    match locate_for(OPERATION, store, path)? {
        Location::Root(_) => IsADirectorySnafu {
            operation: OPERATION,
            path: path.clone(),
        }
        .fail(),
        Location::Entry { parent, name } => match parent.get(name) {
            Some(Node::File(contents)) => Ok(contents.clone()),
            Some(Node::Directory(_)) => IsADirectorySnafu {
                operation: OPERATION,
                path: path.clone(),
            }
            .fail(),
            None => NotFoundSnafu {
                operation: OPERATION,
                path: path.clone(),
            }
            .fail(),
        },
    }
}

pub fn make_directory(store: &mut Store, path: &NormalizedPath) -> Result<(), FilesystemError> {
    const OPERATION: &str = "make_directory";
    match locate_for(OPERATION, store, path)? {
        Location::Root(_) => AlreadyExistsSnafu {
            operation: OPERATION,
            path: path.clone(),
        }
        .fail(),
        Location::Entry { parent, name } => {
            ensure!(
                !parent.contains_key(name),
                AlreadyExistsSnafu {
                    operation: OPERATION,
                    path: path.clone(),
                }
            );
            parent.insert(name.to_string(), Node::empty_directory());
            Ok(())
        }
    }
}

pub fn write_file(
    store: &mut Store,
    path: &NormalizedPath,
    contents: &str,
) -> Result<(), FilesystemError> {
    const OPERATION: &str = "write_file";
    match locate_for(OPERATION, store, path)? {
        Location::Root(_) => IsADirectorySnafu {
            operation: OPERATION,
            path: path.clone(),
        }
        .fail(),
        Location::Entry { parent, name } => match parent.get_mut(name) {
            Some(Node::Directory(_)) => IsADirectorySnafu {
                operation: OPERATION,
                path: path.clone(),
            }
            .fail(),
            Some(Node::File(existing)) => {
                contents.clone_into(existing);
                Ok(())
            }
            None => {
                parent.insert(name.to_string(), Node::File(contents.to_string()));
                Ok(())
            }
        },
    }
}

pub fn delete_file(store: &mut Store, path: &NormalizedPath) -> Result<(), FilesystemError> {
    const OPERATION: &str = "delete_file";
    match locate_for(OPERATION, store, path)? {
        Location::Root(_) => IsADirectorySnafu {
            operation: OPERATION,
            path: path.clone(),
        }
        .fail(),
        Location::Entry { parent, name } => match parent.get(name) {
            Some(Node::File(_)) => {
                parent.remove(name);
                Ok(())
            }
            Some(Node::Directory(_)) => IsADirectorySnafu {
                operation: OPERATION,
                path: path.clone(),
            }
            .fail(),
            None => NotFoundSnafu {
                operation: OPERATION,
                path: path.clone(),
            }
            .fail(),
        },
    }
}

/// Removes a directory together with everything below it.
pub fn delete_directory(store: &mut Store, path: &NormalizedPath) -> Result<(), FilesystemError> {
    const OPERATION: &str = "delete_directory";
    match locate_for(OPERATION, store, path)? {
        Location::Root(_) => InvalidArgumentSnafu {
            operation: OPERATION,
            reason: "the root directory cannot be deleted",
        }
        .fail(),
        Location::Entry { parent, name } => match parent.get(name) {
            Some(Node::Directory(_)) => {
                parent.remove(name);
                Ok(())
            }
            Some(Node::File(_)) => NotADirectorySnafu {
                operation: OPERATION,
                path: path.clone(),
            }
            .fail(),
            None => NotFoundSnafu {
                operation: OPERATION,
                path: path.clone(),
            }
            .fail(),
        },
    }
}

/// Moves the node at `from` to `to`, across directories if needed.
///
/// The destination's parent must already be a directory and the destination
/// itself must not exist. Renaming a node onto its own path is a no-op.
pub fn rename(
    store: &mut Store,
    from: &NormalizedPath,
    to: &NormalizedPath,
) -> Result<(), FilesystemError> {
    const OPERATION: &str = "rename";
    ensure!(
        !from.is_root() && !to.is_root(),
        InvalidArgumentSnafu {
            operation: OPERATION,
            reason: "the root directory cannot be renamed or replaced",
        }
    );
    ensure!(
        exists(store, from),
        NotFoundSnafu {
            operation: OPERATION,
            path: from.clone(),
        }
    );
    if from == to {
        return Ok(());
    }
    ensure!(
        !to.is_descendant_of(from),
        InvalidArgumentSnafu {
            operation: OPERATION,
            reason: format!("'{from}' cannot be moved into its own subtree at '{to}'"),
        }
    );

    let destination = locate_for(OPERATION, store, to)?;
    ensure!(
        !destination.exists(),
        AlreadyExistsSnafu {
            operation: OPERATION,
            path: to.clone(),
        }
    );

    let node = match locate_for(OPERATION, store, from)? {
        Location::Entry { parent, name } => parent.remove(name),
        Location::Root(_) => None,
    };
    let Some(node) = node else {
        return NotFoundSnafu {
            operation: OPERATION,
            path: from.clone(),
        }
        .fail();
    };

    match locate_for(OPERATION, store, to)? {
        Location::Entry { parent, name } => {
            parent.insert(name.to_string(), node);
            Ok(())
        }
        Location::Root(_) => InvalidArgumentSnafu {
            operation: OPERATION,
            reason: "the root directory cannot be replaced",
        }
        .fail(),
    }
}
