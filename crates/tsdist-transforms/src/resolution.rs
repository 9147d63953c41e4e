//! Module resolution with extension-retry fallback.
//!
//! [`NodeModuleResolver`] implements classic Node-style lookup:
//! - Relative and absolute specifiers (`./foo`, `/abs/foo`)
//! - Bare specifiers through `node_modules` (`lodash`, `@scope/pkg/sub`)
//! - `package.json` `types`/`typings`/`main` entry points
//! - TypeScript extensions (`.ts`, `.tsx`, `.d.ts`) before JavaScript ones
//!
//! [`ResolutionFallback`] wraps any resolver and, when a specifier does not
//! resolve, retries with one recognized extension removed:
//!
//! ```text
//! ./a.js.ts  -> not found
//! ./a.js     -> not found
//! ./a        -> ./a.ts
//! ```

use dashmap::DashMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::trace;
use tsdist_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use tsdist_common::{Diagnostic, Span};

/// Extensions [`ResolutionFallback`] strips before retrying, longest first.
pub const RETRY_EXTENSIONS: [&str; 6] = [".d.ts", ".json", ".tsx", ".jsx", ".ts", ".js"];

/// Candidate extensions appended to an extensionless path.
const EXTENSION_CANDIDATES: [&str; 5] = [".ts", ".tsx", ".d.ts", ".js", ".jsx"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    pub resolved_path: PathBuf,
    /// Resolved from `node_modules`.
    pub is_external: bool,
    pub package_name: Option<String>,
    pub original_specifier: String,
    pub extension: ModuleExtension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleExtension {
    Ts,
    Tsx,
    Dts,
    Js,
    Jsx,
    Json,
    Unknown,
}

impl ModuleExtension {
    pub fn from_path(path: &Path) -> Self {
        if path.to_string_lossy().ends_with(".d.ts") {
            return ModuleExtension::Dts;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some("ts") => ModuleExtension::Ts,
            Some("tsx") => ModuleExtension::Tsx,
            Some("js") => ModuleExtension::Js,
            Some("jsx") => ModuleExtension::Jsx,
            Some("json") => ModuleExtension::Json,
            _ => ModuleExtension::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleExtension::Ts => ".ts",
            ModuleExtension::Tsx => ".tsx",
            ModuleExtension::Dts => ".d.ts",
            ModuleExtension::Js => ".js",
            ModuleExtension::Jsx => ".jsx",
            ModuleExtension::Json => ".json",
            ModuleExtension::Unknown => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionFailure {
    #[error("Cannot find module '{specifier}' from '{containing_file}'")]
    NotFound {
        specifier: String,
        containing_file: String,
    },
    #[error("{message}")]
    PackageJsonError {
        specifier: String,
        message: String,
        containing_file: String,
    },
}

impl ResolutionFailure {
    pub fn not_found(specifier: &str, containing_file: &Path) -> Self {
        ResolutionFailure::NotFound {
            specifier: specifier.to_string(),
            containing_file: containing_file.display().to_string(),
        }
    }

    pub fn specifier(&self) -> &str {
        match self {
            ResolutionFailure::NotFound { specifier, .. }
            | ResolutionFailure::PackageJsonError { specifier, .. } => specifier,
        }
    }

    pub fn containing_file(&self) -> &str {
        match self {
            ResolutionFailure::NotFound {
                containing_file, ..
            }
            | ResolutionFailure::PackageJsonError {
                containing_file, ..
            } => containing_file,
        }
    }

    /// TS2307 at the span of the specifier that failed.
    pub fn to_diagnostic(&self, span: Span) -> Diagnostic {
        Diagnostic::error(
            self.containing_file(),
            span.start,
            span.len(),
            format_message(diagnostic_messages::CANNOT_FIND_MODULE, &[self.specifier()]),
            diagnostic_codes::CANNOT_FIND_MODULE,
        )
    }
}

/// Resolver a compilation uses for every import it encounters.
pub trait ModuleResolver: Send + Sync {
    fn resolve_module(
        &self,
        specifier: &str,
        containing_file: &Path,
    ) -> Result<ResolvedModule, ResolutionFailure>;
}

impl<R: ModuleResolver + ?Sized> ModuleResolver for &R {
    fn resolve_module(
        &self,
        specifier: &str,
        containing_file: &Path,
    ) -> Result<ResolvedModule, ResolutionFailure> {
        (**self).resolve_module(specifier, containing_file)
    }
}

/// Retries failed resolutions with one recognized extension removed.
#[derive(Debug)]
pub struct ResolutionFallback<R> {
    inner: R,
}

impl<R: ModuleResolver> ResolutionFallback<R> {
    pub fn new(inner: R) -> Self {
        ResolutionFallback { inner }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: ModuleResolver> ModuleResolver for ResolutionFallback<R> {
    fn resolve_module(
        &self,
        specifier: &str,
        containing_file: &Path,
    ) -> Result<ResolvedModule, ResolutionFailure> {
        let failure = match self.inner.resolve_module(specifier, containing_file) {
            Ok(resolved) => return Ok(resolved),
            Err(failure) => failure,
        };
        let Some(shorter) = strip_retry_extension(specifier) else {
            return Err(failure);
        };
        trace!(specifier, retry = shorter, "retrying resolution without extension");
        self.resolve_module(shorter, containing_file).map_err(|_| failure)
    }
}

/// `specifier` without its longest recognized extension, if any remains.
pub fn strip_retry_extension(specifier: &str) -> Option<&str> {
    RETRY_EXTENSIONS
        .iter()
        .find_map(|ext| specifier.strip_suffix(ext))
        .filter(|rest| !rest.is_empty())
}

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    name: Option<String>,
    main: Option<String>,
    types: Option<String>,
    typings: Option<String>,
}

/// Classic Node resolution over the real file system.
#[derive(Debug, Default)]
pub struct NodeModuleResolver {
    cache: DashMap<(PathBuf, String), Result<ResolvedModule, ResolutionFailure>>,
}

impl NodeModuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    fn resolve_uncached(
        &self,
        specifier: &str,
        containing_dir: &Path,
        containing_file: &Path,
    ) -> Result<ResolvedModule, ResolutionFailure> {
        if is_relative(specifier) || Path::new(specifier).is_absolute() {
            let candidate = containing_dir.join(specifier);
            return match try_file_or_directory(&candidate) {
                Some(resolved) => Ok(local_module(specifier, resolved)),
                None => Err(ResolutionFailure::not_found(specifier, containing_file)),
            };
        }
        self.resolve_bare_specifier(specifier, containing_dir, containing_file)
    }

    fn resolve_bare_specifier(
        &self,
        specifier: &str,
        containing_dir: &Path,
        containing_file: &Path,
    ) -> Result<ResolvedModule, ResolutionFailure> {
        let (package_name, subpath) = parse_package_specifier(specifier);

        for dir in containing_dir.ancestors() {
            let package_dir = dir.join("node_modules").join(&package_name);
            if !package_dir.is_dir() {
                continue;
            }
            let manifest = read_package_json(&package_dir).map_err(|message| {
                ResolutionFailure::PackageJsonError {
                    specifier: specifier.to_string(),
                    message,
                    containing_file: containing_file.display().to_string(),
                }
            })?;
            let resolved = match &subpath {
                Some(subpath) => try_file_or_directory(&package_dir.join(subpath)),
                None => package_entry(&package_dir, manifest.as_ref()),
            };
            if let Some(resolved) = resolved {
                return Ok(ResolvedModule {
                    extension: ModuleExtension::from_path(&resolved),
                    resolved_path: resolved,
                    is_external: true,
                    package_name: Some(
                        manifest
                            .and_then(|manifest| manifest.name)
                            .unwrap_or(package_name),
                    ),
                    original_specifier: specifier.to_string(),
                });
            }
        }

        Err(ResolutionFailure::not_found(specifier, containing_file))
    }
}

impl ModuleResolver for NodeModuleResolver {
    fn resolve_module(
        &self,
        specifier: &str,
        containing_file: &Path,
    ) -> Result<ResolvedModule, ResolutionFailure> {
        let containing_dir = containing_file
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();
        let key = (containing_dir, specifier.to_string());
        if let Some(cached) = self.cache.get(&key) {
            return cached.value().clone();
        }
        let result = self.resolve_uncached(specifier, &key.0, containing_file);
        self.cache.insert(key, result.clone());
        result
    }
}

fn local_module(specifier: &str, resolved: PathBuf) -> ResolvedModule {
    ResolvedModule {
        extension: ModuleExtension::from_path(&resolved),
        resolved_path: resolved,
        is_external: false,
        package_name: None,
        original_specifier: specifier.to_string(),
    }
}

pub(crate) fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// `@scope/pkg/sub` -> (`@scope/pkg`, `sub`)
fn parse_package_specifier(specifier: &str) -> (String, Option<String>) {
    let name_segments = if specifier.starts_with('@') { 2 } else { 1 };
    let mut parts = specifier.splitn(name_segments + 1, '/');
    let name: Vec<&str> = parts.by_ref().take(name_segments).collect();
    let subpath = parts.next().filter(|rest| !rest.is_empty());
    (name.join("/"), subpath.map(str::to_string))
}

/// `Ok(None)` when the directory has no manifest.
fn read_package_json(package_dir: &Path) -> Result<Option<PackageJson>, String> {
    let path = package_dir.join("package.json");
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))
}

fn package_entry(package_dir: &Path, manifest: Option<&PackageJson>) -> Option<PathBuf> {
    if let Some(manifest) = manifest {
        let declared = [&manifest.types, &manifest.typings, &manifest.main];
        for entry in declared.into_iter().flatten() {
            if let Some(resolved) = try_file_or_directory(&package_dir.join(entry)) {
                return Some(resolved);
            }
        }
    }
    try_file(&package_dir.join("index"))
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut joined = path.as_os_str().to_owned();
    joined.push(suffix);
    PathBuf::from(joined)
}

/// `path` itself or `path` plus a module extension, when that is a file.
pub(crate) fn try_file(path: &Path) -> Option<PathBuf> {
    if path.extension().is_some() && path.is_file() {
        return Some(path.to_path_buf());
    }
    EXTENSION_CANDIDATES
        .iter()
        .map(|ext| with_suffix(path, ext))
        .find(|candidate| candidate.is_file())
}

fn try_file_or_directory(path: &Path) -> Option<PathBuf> {
    if let Some(resolved) = try_file(path) {
        return Some(resolved);
    }
    if path.is_dir() {
        let manifest = read_package_json(path).ok().flatten();
        return package_entry(path, manifest.as_ref());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_package_specifiers() {
        assert_eq!(parse_package_specifier("lodash"), ("lodash".into(), None));
        assert_eq!(
            parse_package_specifier("lodash/fp"),
            ("lodash".into(), Some("fp".into()))
        );
        assert_eq!(
            parse_package_specifier("@scope/pkg"),
            ("@scope/pkg".into(), None)
        );
        assert_eq!(
            parse_package_specifier("@scope/pkg/deep/sub"),
            ("@scope/pkg".into(), Some("deep/sub".into()))
        );
    }

    #[test]
    fn strips_longest_extension_first() {
        assert_eq!(strip_retry_extension("./a.d.ts"), Some("./a"));
        assert_eq!(strip_retry_extension("./a.js.ts"), Some("./a.js"));
        assert_eq!(strip_retry_extension("./a.tsx"), Some("./a"));
        assert_eq!(strip_retry_extension("./data.json"), Some("./data"));
        assert_eq!(strip_retry_extension("./a.mjs"), None);
        assert_eq!(strip_retry_extension(".ts"), None);
    }

    #[test]
    fn failure_converts_to_ts2307() {
        let failure = ResolutionFailure::not_found("./missing", Path::new("src/index.ts"));
        let diag = failure.to_diagnostic(Span::new(20, 31));
        assert_eq!(diag.code, 2307);
        assert_eq!(diag.file, "src/index.ts");
        assert_eq!(diag.start, 20);
        assert_eq!(diag.length, 11);
        assert_eq!(
            diag.message_text,
            "Cannot find module './missing' or its corresponding type declarations."
        );
    }
}
