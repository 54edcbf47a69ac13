//! Loading target universes from JSON target spec shards.
//!
//! A shard is a JSON object mapping target ids to targets. Shards are decoded
//! in parallel and then joined into one universe before any engine stage
//! runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use crate::core::{Target, TargetId, TargetUniverse};
use crate::util::diagnostic::{suggestions, Diagnostic};

/// Error loading target specs.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode `{}`: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to search `{}` for target specs", dir.display())]
    Walk {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("target `{id}` is defined in both `{}` and `{}`", first.display(), second.display())]
    DuplicateTarget {
        id: TargetId,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("no target specs given")]
    NoInputs,
}

impl LoadError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            LoadError::Read { path, source } => Diagnostic::error(self.to_string())
                .with_context(source.to_string())
                .with_location(path),

            LoadError::Decode { path, source } => {
                Diagnostic::error(format!("invalid target spec file `{}`", path.display()))
                    .with_context(source.to_string())
                    .with_location(path)
                    .with_suggestion(suggestions::INVALID_SPEC)
            }

            LoadError::Walk { dir, source } => Diagnostic::error(self.to_string())
                .with_context(source.to_string())
                .with_location(dir),

            LoadError::DuplicateTarget { id, second, .. } => Diagnostic::error(self.to_string())
                .with_target(id)
                .with_location(second)
                .with_suggestion(suggestions::DUPLICATE_TARGET),

            LoadError::NoInputs => Diagnostic::error(self.to_string())
                .with_suggestion("help: Pass target spec files or --dir"),
        }
    }
}

/// Decode one shard.
pub fn load_file(path: &Path) -> Result<TargetUniverse, LoadError> {
    let contents = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_shard(&contents).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode a shard from a string.
pub fn parse_shard(contents: &str) -> Result<TargetUniverse, serde_json::Error> {
    let mut targets: BTreeMap<TargetId, Target> = serde_json::from_str(contents)?;
    for target in targets.values_mut() {
        target.normalize();
    }
    Ok(targets)
}

/// All `*.json` files under `dir`, sorted.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|source| LoadError::Walk {
            dir: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path.to_path_buf());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Decode every shard in parallel and join them into one universe.
pub fn load_universe(paths: &[PathBuf]) -> Result<TargetUniverse, LoadError> {
    if paths.is_empty() {
        return Err(LoadError::NoInputs);
    }

    let shards: Vec<TargetUniverse> = paths
        .par_iter()
        .map(|path| load_file(path))
        .collect::<Result<_, _>>()?;

    let mut universe = TargetUniverse::new();
    let mut origins: BTreeMap<TargetId, &Path> = BTreeMap::new();
    for (path, shard) in paths.iter().zip(shards) {
        debug!("{} targets in {}", shard.len(), path.display());
        for (id, target) in shard {
            if let Some(first) = origins.get(&id) {
                return Err(LoadError::DuplicateTarget {
                    id,
                    first: first.to_path_buf(),
                    second: path.clone(),
                });
            }
            origins.insert(id.clone(), path);
            universe.insert(id, target);
        }
    }

    Ok(universe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SHARD: &str = r#"{
        "Lib-sim": {
            "name": "Lib",
            "label": "//lib:Lib",
            "configuration": "ios-sim",
            "xcode_configurations": ["Release", "Debug", "Debug"],
            "platform": {
                "os": "ios",
                "variant": "iphonesimulator",
                "arch": "arm64",
                "minimum_os_version": "15.0"
            },
            "product": {
                "name": "Lib",
                "type": "com.apple.product-type.library.static",
                "path": "bazel-out/lib/libLib.a"
            }
        }
    }"#;

    #[test]
    fn test_parse_shard_normalizes() {
        let targets = parse_shard(SHARD).unwrap();

        let target = &targets[&TargetId::from("Lib-sim")];
        assert_eq!(target.xcode_configurations, ["Debug", "Release"]);
    }

    #[test]
    fn test_discover_and_load() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested/a.json"), SHARD).unwrap();
        fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();

        let paths = discover(tmp.path()).unwrap();
        assert_eq!(paths.len(), 1);

        let universe = load_universe(&paths).unwrap();
        assert!(universe.contains_key("Lib-sim"));
    }

    #[test]
    fn test_duplicate_target_across_shards() {
        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("a.json");
        let second = tmp.path().join("b.json");
        fs::write(&first, SHARD).unwrap();
        fs::write(&second, SHARD).unwrap();

        let err = load_universe(&[first, second]).unwrap_err();
        assert!(matches!(err, LoadError::DuplicateTarget { .. }));
        assert!(err.to_diagnostic().format(false).contains("Pass each target spec shard only once"));
    }

    #[test]
    fn test_invalid_json_is_a_decode_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.json");
        fs::write(&path, "[1, 2]").unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, LoadError::Decode { .. }));
    }

    #[test]
    fn test_no_inputs() {
        assert!(matches!(load_universe(&[]), Err(LoadError::NoInputs)));
    }
}
