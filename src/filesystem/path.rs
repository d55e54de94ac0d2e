use derive_more::Display;
use snafu::ensure;
use tracing::trace;

use crate::filesystem::error::{FilesystemError, InvalidArgumentSnafu};

const SEPARATOR: char = '/';

/// An absolute path with every `.`, `..` and redundant slash resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    pub fn root() -> Self {
        NormalizedPath(SEPARATOR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR).filter(|segment| !segment.is_empty())
    }

    /// Final segment, `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Whether `self` lies strictly below `ancestor`.
    pub fn is_descendant_of(&self, ancestor: &NormalizedPath) -> bool {
        if ancestor.is_root() {
            return !self.is_root();
        }
        self.0
            .strip_prefix(ancestor.as_str())
            .is_some_and(|rest| rest.starts_with(SEPARATOR))
    }

    fn from_segments<'a>(segments: impl IntoIterator<Item = &'a str>) -> Self {
        let mut path = String::new();
        for segment in segments {
            path.push(SEPARATOR);
            path.push_str(segment);
        }
        if path.is_empty() {
            return Self::root();
        }
        NormalizedPath(path)
    }
}

/// Normalizes `raw` against the root, so relative input is treated as
/// absolute.
impl From<&str> for NormalizedPath {
    fn from(raw: &str) -> Self {
        join_and_normalize(vec!["/", strip_trailing_slashes(raw)])
    }
}

impl AsRef<str> for NormalizedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<NormalizedPath> for String {
    fn from(path: NormalizedPath) -> Self {
        path.0
    }
}

/// Resolves `fragments` against `current_directory` the way a shell would.
///
/// A fragment starting with `/` discards everything accumulated before it.
/// `..` at the root stays at the root.
pub fn resolve<S: AsRef<str>>(
    current_directory: &NormalizedPath,
    fragments: &[S],
) -> Result<NormalizedPath, FilesystemError> {
    trace!("[resolve_path] {} fragment(s)", fragments.len());
    ensure!(
        !fragments.is_empty(),
        InvalidArgumentSnafu {
            operation: "resolve_path",
            reason: "at least one path fragment is required",
        }
    );

    let mut parts: Vec<&str> = fragments
        .iter()
        .map(|fragment| strip_trailing_slashes(fragment.as_ref()))
        .collect();
    if !parts[0].starts_with(SEPARATOR) {
        parts.insert(0, strip_trailing_slashes(current_directory.as_str()));
    }

    Ok(join_and_normalize(parts))
}

/// Joins already stripped parts and folds `.`/`..` segments.
fn join_and_normalize(parts: Vec<&str>) -> NormalizedPath {
    let mut joined = String::new();
    for part in parts {
        if part.starts_with(SEPARATOR) {
            joined.clear();
        } else if joined != "/" {
            joined.push(SEPARATOR);
        }
        joined.push_str(part);
    }

    let mut stack: Vec<&str> = Vec::new();
    for segment in joined.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop();
            }
            name => stack.push(name),
        }
    }

    NormalizedPath::from_segments(stack)
}

/// Strips trailing slashes; a fragment made only of slashes (or nothing)
/// collapses to the root.
fn strip_trailing_slashes(fragment: &str) -> &str {
    match fragment.trim_end_matches(SEPARATOR) {
        "" => "/",
        stripped => stripped,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn cwd(path: &str) -> NormalizedPath {
        NormalizedPath::from(path)
    }

    #[rstest]
    #[case(&["/"], "/")]
    #[case(&["/a/b/c"], "/a/b/c")]
    #[case(&["/a/b/c/"], "/a/b/c")]
    #[case(&["//a///b//"], "/a/b")]
    #[case(&["/a/./b/."], "/a/b")]
    #[case(&["/a/b/../c"], "/a/c")]
    #[case(&["/a", "..", ".."], "/")]
    #[case(&["/../../x"], "/x")]
    #[case(&["/a", "b", "c.txt"], "/a/b/c.txt")]
    #[case(&["/a", "/b", "c"], "/b/c")]
    #[case(&["/a", "///"], "/")]
    #[case(&["/a/", "b/"], "/a/b")]
    #[case(&["/a", ""], "/")]
    fn resolves_absolute_fragments(#[case] fragments: &[&str], #[case] expected: &str) {
        let resolved = resolve(&cwd("/ignored"), fragments).unwrap();
        assert_eq!(resolved.as_str(), expected);
    }

    #[rstest]
    #[case("/home/user", &["relative/path"], "/home/user/relative/path")]
    #[case("/home/user", &["."], "/home/user")]
    #[case("/home/user", &[".."], "/home")]
    #[case("/home/user", &["../../../etc"], "/etc")]
    #[case("/", &["a", "b"], "/a/b")]
    #[case("/home", &["user", "/abs"], "/abs")]
    fn resolves_relative_fragments_against_current_directory(
        #[case] current: &str,
        #[case] fragments: &[&str],
        #[case] expected: &str,
    ) {
        let resolved = resolve(&cwd(current), fragments).unwrap();
        assert_eq!(resolved.as_str(), expected);
    }

    #[test]
    fn rejects_empty_fragment_list() {
        let fragments: [&str; 0] = [];
        let error = resolve(&NormalizedPath::root(), &fragments).unwrap_err();
        assert!(matches!(error, FilesystemError::InvalidArgument { .. }));
        assert!(error.to_string().contains("resolve_path"));
    }

    #[rstest]
    #[case("/")]
    #[case("/a")]
    #[case("/a/b/c.txt")]
    #[case("/with space/ünïcode")]
    fn normalized_paths_are_fixed_points(#[case] path: &str) {
        let once = resolve(&NormalizedPath::root(), &[path]).unwrap();
        let twice = resolve(&cwd("/elsewhere"), &[once.as_str()]).unwrap();
        assert_eq!(once.as_str(), path);
        assert_eq!(once, twice);
    }

    #[test]
    fn exposes_segments_and_file_name() {
        let path = cwd("/a/b/c.txt");
        assert_eq!(path.segments().collect::<Vec<_>>(), ["a", "b", "c.txt"]);
        assert_eq!(path.file_name(), Some("c.txt"));
        assert!(!path.is_root());

        let root = NormalizedPath::root();
        assert_eq!(root.segments().count(), 0);
        assert_eq!(root.file_name(), None);
        assert!(root.is_root());
    }

    #[rstest]
    #[case("a/b", "/a/b")]
    #[case("/a/../..", "/")]
    #[case("", "/")]
    fn from_str_treats_input_as_absolute(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(NormalizedPath::from(raw).as_str(), expected);
    }

    #[rstest]
    #[case("/a/b", "/a", true)]
    #[case("/a", "/", true)]
    #[case("/ab", "/a", false)]
    #[case("/a", "/a", false)]
    #[case("/", "/", false)]
    fn detects_descendants(#[case] path: &str, #[case] ancestor: &str, #[case] expected: bool) {
        assert_eq!(cwd(path).is_descendant_of(&cwd(ancestor)), expected);
    }
}
