//! Lexical path arithmetic.
//!
//! Nothing here touches the filesystem: paths are compared component by
//! component, so links can be planned before their directories exist.

use std::path::{Component, Path, PathBuf};

/// Remove `.` components and fold `name/..` pairs.
///
/// A `..` that climbs above the start of a relative path is kept; one that
/// climbs above the root of an absolute path is dropped.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(comp),
            },
            _ => parts.push(comp),
        }
    }

    parts.iter().collect()
}

/// Path that reaches `target` when resolved from inside `base_dir`.
///
/// Returns `None` when the two paths have no lexical relationship: one is
/// absolute and the other is not, they sit on different prefixes, or
/// `base_dir` still climbs through `..` after the shared components.
pub fn relative_from(target: &Path, base_dir: &Path) -> Option<PathBuf> {
    let target = normalize_lexically(target);
    let base_dir = normalize_lexically(base_dir);

    if target.has_root() != base_dir.has_root() {
        return None;
    }

    let mut target_parts = target.components().peekable();
    let mut base_parts = base_dir.components().peekable();

    while let (Some(t), Some(b)) = (target_parts.peek(), base_parts.peek()) {
        if t != b {
            break;
        }
        target_parts.next();
        base_parts.next();
    }

    let mut relative = PathBuf::new();
    for comp in base_parts {
        match comp {
            Component::Normal(_) => relative.push(".."),
            _ => return None,
        }
    }
    for comp in target_parts {
        match comp {
            Component::Prefix(_) | Component::RootDir => return None,
            _ => relative.push(comp),
        }
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    Some(relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/a/b/./c", "/a/b/c")]
    #[case("/a/b/../c", "/a/c")]
    #[case("/../a", "/a")]
    #[case("a/../../b", "../b")]
    #[case("./a/b/", "a/b")]
    #[case("a/..", "")]
    fn test_normalize_lexically(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_lexically(Path::new(input)), PathBuf::from(expected));
    }

    #[rstest]
    #[case("/app/public/assets/widget-abc123.js", "/app/public/assets", "widget-abc123.js")]
    #[case("/app/public/assets/widget-abc123.js", "/app/public/assets/v1", "../widget-abc123.js")]
    #[case(
        "/app/public/assets/widget-abc123.js",
        "/app/public/assets/v1/deep/er",
        "../../../widget-abc123.js"
    )]
    #[case(
        "/app/public/assets/external/widget-abc123.js",
        "/app/public/assets/external",
        "widget-abc123.js"
    )]
    #[case(
        "/app/public/path/to/assets/widget-abc123.js",
        "/app/public/assets",
        "../path/to/assets/widget-abc123.js"
    )]
    #[case("/app/public/assets", "/app/public/assets", ".")]
    #[case("/app/public/assets/x/../y.js", "/app/public/assets/./v1", "../y.js")]
    #[case("/a/b", "/c/d", "../../a/b")]
    #[case("lib/widget.js", "public", "../lib/widget.js")]
    fn test_relative_from(#[case] target: &str, #[case] base: &str, #[case] expected: &str) {
        assert_eq!(
            relative_from(Path::new(target), Path::new(base)),
            Some(PathBuf::from(expected))
        );
    }

    #[test]
    fn test_relative_from_mixed_roots() {
        assert_eq!(relative_from(Path::new("/a/b"), Path::new("c")), None);
        assert_eq!(relative_from(Path::new("a/b"), Path::new("/c")), None);
    }

    #[test]
    fn test_relative_from_unresolvable_base() {
        assert_eq!(relative_from(Path::new("a"), Path::new("../b")), None);
    }

    #[test]
    fn test_relative_from_round_trips_through_join() {
        let target = Path::new("/srv/app/public/assets/external/widget-abc123.js");
        let base = Path::new("/srv/app/public/assets/v1/js");
        let relative = relative_from(target, base).unwrap();
        assert_eq!(normalize_lexically(&base.join(relative)), target);
    }
}
