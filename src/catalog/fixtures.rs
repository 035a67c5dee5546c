//! Fixture sources for the catalog
//!
//! Fixtures follow the layout `<kind_dir>/<name>.json`, one resource per
//! file. The directory name picks the [`Resource`] variant.

use std::path::Path;

use rust_embed::RustEmbed;
use walkdir::WalkDir;

use crate::error::StubError;
use crate::models::{Resource, ResourceKind};

/// Fixtures compiled into the binary.
#[derive(RustEmbed)]
#[folder = "fixtures/"]
struct EmbeddedFixtures;

/// Returns the embedded fixtures as `(path, bytes)` pairs in path order.
pub fn embedded_fixtures() -> Vec<(String, Vec<u8>)> {
    let mut paths: Vec<String> = EmbeddedFixtures::iter()
        .map(|path| path.into_owned())
        .filter(|path| is_json(path))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .filter_map(|path| {
            EmbeddedFixtures::get(&path).map(|file| (path, file.data.into_owned()))
        })
        .collect()
}

/// Decodes one fixture, using the first path component as the kind.
///
/// # Errors
///
/// Returns [`StubError::CatalogLoad`] naming the file when the directory
/// is unknown or the bytes do not decode as that kind.
pub fn parse_fixture(path: &str, bytes: &[u8]) -> Result<Resource, StubError> {
    let normalized = path.replace('\\', "/");
    let dir = normalized
        .split('/')
        .rev()
        .nth(1)
        .ok_or_else(|| StubError::CatalogLoad {
            file: path.to_string(),
            reason: "fixture must live under a resource kind directory".to_string(),
        })?;

    let kind = ResourceKind::from_fixture_dir(dir).ok_or_else(|| StubError::CatalogLoad {
        file: path.to_string(),
        reason: format!("unknown resource kind directory '{}'", dir),
    })?;

    Resource::from_json(kind, bytes).map_err(|e| StubError::CatalogLoad {
        file: path.to_string(),
        reason: e.to_string(),
    })
}

/// Reads every `*.json` file below `root`, in path order.
///
/// Unreadable files and directories are logged and skipped. Paths are
/// returned relative to `root`.
pub fn read_fixture_dir(root: &Path) -> Vec<(String, Vec<u8>)> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable fixture path");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let rel_path = match entry.path().strip_prefix(root) {
            Ok(p) => p.to_string_lossy().replace('\\', "/"),
            Err(_) => continue,
        };
        if !is_json(&rel_path) {
            continue;
        }

        match std::fs::read(entry.path()) {
            Ok(bytes) => files.push((rel_path, bytes)),
            Err(e) => {
                tracing::warn!(file = %rel_path, error = %e, "Skipping unreadable fixture");
            }
        }
    }

    files
}

fn is_json(path: &str) -> bool {
    Path::new(path)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_embedded_fixtures_cover_every_kind() {
        let fixtures = embedded_fixtures();
        assert!(!fixtures.is_empty());
        for kind in ResourceKind::ALL {
            let prefix = format!("{}/", kind.fixture_dir());
            assert!(
                fixtures.iter().any(|(path, _)| path.starts_with(&prefix)),
                "no fixture for {}",
                kind
            );
        }
    }

    #[test]
    fn test_embedded_fixtures_are_sorted() {
        let paths: Vec<String> = embedded_fixtures().into_iter().map(|(p, _)| p).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn test_parse_fixture_picks_kind_from_directory() {
        let resource =
            parse_fixture("search_content_deleted/a.json", br#"{"uri": "/gone"}"#).unwrap();
        assert_eq!(resource.kind(), ResourceKind::SearchContentDeleted);
        assert_eq!(resource.uri(), "/gone");
    }

    #[test]
    fn test_parse_fixture_accepts_nested_root() {
        let resource = parse_fixture("data/standard/a.json", br#"{"uri": "/a"}"#).unwrap();
        assert_eq!(resource.kind(), ResourceKind::Standard);
    }

    #[test]
    fn test_parse_fixture_accepts_irregular_release_date() {
        let json = br#"{"uri": "/r", "release_date": "2024-11-21:20:14Z", "published": true}"#;
        let resource = parse_fixture("release/odd.json", json).unwrap();
        assert_eq!(resource.kind(), ResourceKind::Release);
    }

    #[test]
    fn test_parse_fixture_rejects_unknown_directory() {
        let err = parse_fixture("widgets/a.json", b"{}").unwrap_err();
        assert!(matches!(err, StubError::CatalogLoad { ref file, .. } if file == "widgets/a.json"));
        assert!(err.to_string().contains("widgets"));
    }

    #[test]
    fn test_parse_fixture_rejects_file_at_root() {
        let err = parse_fixture("a.json", b"{}").unwrap_err();
        assert!(matches!(err, StubError::CatalogLoad { .. }));
    }

    #[test]
    fn test_parse_fixture_reports_decode_error() {
        let err = parse_fixture("standard/broken.json", b"{not json").unwrap_err();
        match err {
            StubError::CatalogLoad { file, reason } => {
                assert_eq!(file, "standard/broken.json");
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_read_fixture_dir_only_returns_json_in_order() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("standard")).unwrap();
        std::fs::create_dir_all(temp.path().join("release")).unwrap();
        std::fs::write(temp.path().join("standard/b.json"), "{}").unwrap();
        std::fs::write(temp.path().join("standard/a.json"), "{}").unwrap();
        std::fs::write(temp.path().join("release/c.json"), "{}").unwrap();
        std::fs::write(temp.path().join("standard/notes.txt"), "skip").unwrap();

        let paths: Vec<String> = read_fixture_dir(temp.path())
            .into_iter()
            .map(|(p, _)| p)
            .collect();
        assert_eq!(
            paths,
            vec!["release/c.json", "standard/a.json", "standard/b.json"]
        );
    }

    #[test]
    fn test_read_fixture_dir_missing_root_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(read_fixture_dir(&temp.path().join("missing")).is_empty());
    }
}
