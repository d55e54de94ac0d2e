use derive_more::IsVariant;
use hashlink::LinkedHashMap;
use serde::{Deserialize, Serialize, Serializer};

/// Children of a directory, keyed by entry name in insertion order.
pub type Children = LinkedHashMap<String, Node>;

/// A node of the virtual tree.
///
/// The persisted shape carries no type tag: a file is a JSON string holding
/// its contents, a directory is a JSON object holding its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, IsVariant)]
#[serde(untagged)]
pub enum Node {
    File(String),
    Directory(Children),
}

impl Node {
    pub fn empty_directory() -> Self {
        Node::Directory(Children::new())
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Node::File(_) => EntryKind::File,
            Node::Directory(_) => EntryKind::Directory,
        }
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub files: Children,
}

impl Store {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// One entry of a directory listing, without the entry's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IsVariant)]
pub enum EntryKind {
    File,
    Directory,
}

/// Listing marker for files.
pub const FILE_MARKER: &str = "...";

impl Serialize for EntryKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            EntryKind::File => serializer.serialize_str(FILE_MARKER),
            EntryKind::Directory => LinkedHashMap::<String, String>::new().serialize(serializer),
        }
    }
}

pub type Listing = LinkedHashMap<String, EntryKind>;

pub(crate) fn list(children: &Children) -> Listing {
    children
        .iter()
        .map(|(name, node)| (name.clone(), node.kind()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_serializes_to_empty_files_object() {
        assert_eq!(Store::default().to_json().unwrap(), r#"{"files":{}}"#);
    }

    #[test]
    fn store_parses_strings_as_files_and_objects_as_directories() {
        let store = Store::from_json(r#"{"files":{"a":{"b.txt":"hello"},"c":"x"}}"#).unwrap();

        let Some(Node::Directory(a)) = store.files.get("a") else {
            panic!("Expected /a to be a directory");
        };
        assert_eq!(a.get("b.txt"), Some(&Node::File("hello".into())));
        assert!(store.files.get("c").is_some_and(Node::is_file));
    }

    #[test]
    fn store_rejects_non_string_leaves() {
        assert!(Store::from_json(r#"{"files":{"a":1}}"#).is_err());
        assert!(Store::from_json(r#"{"nothing":{}}"#).is_err());
    }

    #[test]
    fn listing_keeps_insertion_order_and_hides_contents() {
        let mut children = Children::new();
        children.insert("z".into(), Node::empty_directory());
        children.insert("a.txt".into(), Node::File("secret".into()));

        let listing = list(&children);
        let names: Vec<_> = listing.keys().map(String::as_str).collect();
        assert_eq!(names, ["z", "a.txt"]);
        assert_eq!(
            serde_json::to_string(&listing).unwrap(),
            r#"{"z":{},"a.txt":"..."}"#
        );
    }
}
