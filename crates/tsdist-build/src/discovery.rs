//! Source discovery for `files`/`include`/`exclude`.

use anyhow::{Context, Result, bail};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DEFAULT_EXCLUDES: [&str; 3] = ["node_modules", "bower_components", "jspm_packages"];
const SOURCE_EXTENSIONS: [&str; 3] = [".d.ts", ".tsx", ".ts"];

#[derive(Debug, Clone, Default)]
pub struct FileDiscoveryOptions {
    pub base_dir: PathBuf,
    pub files: Vec<String>,
    pub include: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    /// Always excluded so earlier output is never picked up as input.
    pub out_dir: Option<PathBuf>,
}

/// Explicit `files` first, then `include` matches minus `exclude` matches.
/// Sorted and deduplicated.
pub fn discover_ts_files(options: &FileDiscoveryOptions) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for file in &options.files {
        let path = options.base_dir.join(file);
        if !path.is_file() {
            bail!("file '{}' listed in tsconfig files not found", path.display());
        }
        found.push(path);
    }

    let include = match &options.include {
        Some(patterns) => patterns.clone(),
        None if options.files.is_empty() => vec!["**/*".to_string()],
        None => Vec::new(),
    };
    if !include.is_empty() {
        let include_set = build_glob_set(&include)?;
        let exclude = match &options.exclude {
            Some(patterns) => patterns.clone(),
            None => DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
        };
        let exclude_set = build_glob_set(&exclude)?;
        let out_dir = options.out_dir.as_deref();

        let walker = WalkDir::new(&options.base_dir)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 {
                    return true;
                }
                if out_dir.is_some_and(|out| entry.path().starts_with(out)) {
                    return false;
                }
                let relative = relative_posix(&options.base_dir, entry.path());
                !exclude_set.is_match(&relative)
            });
        for entry in walker {
            let entry = entry.with_context(|| {
                format!("failed to walk {}", options.base_dir.display())
            })?;
            if !entry.file_type().is_file() || !is_source_file(entry.path()) {
                continue;
            }
            let relative = relative_posix(&options.base_dir, entry.path());
            if include_set.is_match(&relative) {
                found.push(entry.into_path());
            }
        }
    }

    found.sort();
    found.dedup();
    Ok(found)
}

pub fn is_source_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| SOURCE_EXTENSIONS.iter().any(|ext| name.ends_with(ext)))
}

/// A pattern without wildcards names a file or a directory; directories
/// match everything below them.
fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = normalize_pattern(pattern);
        if pattern.is_empty() {
            continue;
        }
        let mut expanded = vec![pattern.clone()];
        if !pattern.ends_with("**/*") {
            expanded.push(format!("{pattern}/**/*"));
        }
        for glob in expanded {
            builder.add(
                GlobBuilder::new(&glob)
                    .literal_separator(true)
                    .build()
                    .with_context(|| format!("invalid glob pattern '{glob}'"))?,
            );
        }
    }
    Ok(builder.build()?)
}

fn normalize_pattern(pattern: &str) -> String {
    let pattern = pattern.trim().replace('\\', "/");
    let pattern = pattern.strip_prefix("./").unwrap_or(&pattern);
    pattern.trim_end_matches('/').to_string()
}

fn relative_posix(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in [
            "src/index.ts",
            "src/view.tsx",
            "src/types.d.ts",
            "src/util/math.ts",
            "src/util/math.test.ts",
            "src/legacy.js",
            "node_modules/dep/index.d.ts",
            "lib/esm/index.d.ts",
            "scripts/gen.ts",
        ] {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        dir
    }

    fn relative(dir: &TempDir, files: Vec<PathBuf>) -> Vec<String> {
        files
            .iter()
            .map(|path| relative_posix(dir.path(), path))
            .collect()
    }

    #[test]
    fn default_include_skips_node_modules_and_out_dir() {
        let dir = project();
        let files = discover_ts_files(&FileDiscoveryOptions {
            base_dir: dir.path().to_path_buf(),
            out_dir: Some(dir.path().join("lib/esm")),
            ..FileDiscoveryOptions::default()
        })
        .unwrap();
        assert_eq!(
            relative(&dir, files),
            [
                "scripts/gen.ts",
                "src/index.ts",
                "src/types.d.ts",
                "src/util/math.test.ts",
                "src/util/math.ts",
                "src/view.tsx",
            ]
        );
    }

    #[test]
    fn directory_include_and_glob_exclude() {
        let dir = project();
        let files = discover_ts_files(&FileDiscoveryOptions {
            base_dir: dir.path().to_path_buf(),
            include: Some(vec!["./src".to_string()]),
            exclude: Some(vec!["**/*.test.ts".to_string()]),
            ..FileDiscoveryOptions::default()
        })
        .unwrap();
        assert_eq!(
            relative(&dir, files),
            ["src/index.ts", "src/types.d.ts", "src/util/math.ts", "src/view.tsx"]
        );
    }

    #[test]
    fn single_star_stays_within_one_directory() {
        let dir = project();
        let files = discover_ts_files(&FileDiscoveryOptions {
            base_dir: dir.path().to_path_buf(),
            include: Some(vec!["src/*.ts".to_string()]),
            ..FileDiscoveryOptions::default()
        })
        .unwrap();
        assert_eq!(relative(&dir, files), ["src/index.ts", "src/types.d.ts"]);
    }

    #[test]
    fn explicit_files_must_exist() {
        let dir = project();
        let options = FileDiscoveryOptions {
            base_dir: dir.path().to_path_buf(),
            files: vec!["scripts/gen.ts".to_string()],
            ..FileDiscoveryOptions::default()
        };
        assert_eq!(relative(&dir, discover_ts_files(&options).unwrap()), ["scripts/gen.ts"]);

        let missing = FileDiscoveryOptions {
            files: vec!["nope.ts".to_string()],
            ..options
        };
        assert!(discover_ts_files(&missing).is_err());
    }
}
