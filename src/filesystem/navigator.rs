//! Walks the virtual tree down to the container holding a path's final
//! segment.
//!
//! The navigator never raises user-facing errors. When the walk is blocked
//! by a missing or non-directory intermediate segment it reports where it
//! stopped and lets the node operation decide what that means.

use crate::filesystem::NormalizedPath;
use crate::filesystem::tree::{Children, Node};

#[derive(Debug)]
pub enum Location<'tree, 'path> {
    /// The path is `/`: the target is the root container itself.
    Root(&'tree mut Children),
    /// The final segment, unresolved, together with its parent container.
    Entry {
        parent: &'tree mut Children,
        name: &'path str,
    },
}

impl<'tree> Location<'tree, '_> {
    pub fn node(&self) -> Option<&Node> {
        match self {
            Location::Root(_) => None,
            Location::Entry { parent, name } => parent.get(*name),
        }
    }

    pub fn exists(&self) -> bool {
        match self {
            Location::Root(_) => true,
            Location::Entry { .. } => self.node().is_some(),
        }
    }

    pub fn is_file(&self) -> bool {
        self.node().is_some_and(Node::is_file)
    }

    pub fn is_directory(&self) -> bool {
        match self {
            Location::Root(_) => true,
            Location::Entry { .. } => self.node().is_some_and(Node::is_directory),
        }
    }

    /// Children of the target when it is a directory.
    pub fn into_directory(self) -> Option<&'tree mut Children> {
        match self {
            Location::Root(children) => Some(children),
            Location::Entry { parent, name } => match parent.get_mut(name) {
                Some(Node::Directory(children)) => Some(children),
                _ => None,
            },
        }
    }
}

/// Why a walk stopped before reaching the final segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocked {
    /// An intermediate segment does not exist.
    Missing,
    /// An intermediate segment is a file.
    NotADirectory,
}

pub fn locate<'tree, 'path>(
    root: &'tree mut Children,
    path: &'path NormalizedPath,
) -> Result<Location<'tree, 'path>, Blocked> {
    let mut segments = path.segments().peekable();
    let mut parent = root;

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            return Ok(Location::Entry {
                parent,
                name: segment,
            });
        }
        parent = match parent.get_mut(segment) {
            Some(Node::Directory(children)) => children,
            Some(Node::File(_)) => return Err(Blocked::NotADirectory),
            None => return Err(Blocked::Missing),
        };
    }

    Ok(Location::Root(parent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::path::resolve;
    use crate::filesystem::tree::Store;

    fn path(raw: &str) -> NormalizedPath {
        resolve(&NormalizedPath::root(), &[raw]).unwrap()
    }

    fn sample() -> Store {
        Store::from_json(r#"{"files":{"a":{"b":{"c.txt":"deep"}},"f.txt":"top"}}"#).unwrap()
    }

    #[test]
    fn root_path_yields_root_sentinel() {
        let mut store = sample();
        let root = path("/");
        let location = locate(&mut store.files, &root).unwrap();
        assert!(matches!(location, Location::Root(_)));
        assert!(location.exists());
        assert!(location.is_directory());
        assert!(!location.is_file());
    }

    #[test]
    fn returns_parent_and_unresolved_final_segment() {
        let mut store = sample();
        let target = path("/a/b/c.txt");
        let Location::Entry { parent, name } = locate(&mut store.files, &target).unwrap() else {
            panic!("Expected an entry location");
        };
        assert_eq!(name, "c.txt");
        assert_eq!(parent.get("c.txt"), Some(&Node::File("deep".into())));
    }

    #[test]
    fn final_segment_need_not_exist() {
        let mut store = sample();
        let target = path("/a/new");
        let location = locate(&mut store.files, &target).unwrap();
        assert!(!location.exists());
    }

    #[test]
    fn mutations_through_parent_reach_the_tree() {
        let mut store = sample();
        let target = path("/a/b/c.txt");
        if let Location::Entry { parent, name } = locate(&mut store.files, &target).unwrap() {
            parent.remove(name);
        }
        let target = path("/a/b");
        let children = locate(&mut store.files, &target)
            .unwrap()
            .into_directory()
            .unwrap();
        assert!(children.is_empty());
    }

    #[test]
    fn reports_where_the_walk_was_blocked() {
        let mut store = sample();
        let missing = path("/nope/x");
        assert_eq!(
            locate(&mut store.files, &missing).unwrap_err(),
            Blocked::Missing
        );
        let through_file = path("/f.txt/x");
        assert_eq!(
            locate(&mut store.files, &through_file).unwrap_err(),
            Blocked::NotADirectory
        );
    }
}
