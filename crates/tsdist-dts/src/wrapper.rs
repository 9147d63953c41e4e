//! Reversible namespace wrapping of per-file declaration output.
//!
//! Declaration bundlers cannot follow `import * as NS from "./x"` across
//! files. Before bundling, every star-imported declaration file is wrapped
//! into a namespace with a default export and its importers switch to a
//! default import:
//!
//! ```text
//! // util.d.ts                          // util.d.ts (applied)
//! export declare function f(): void;   declare namespace Util {
//!                                       function f(): void;
//!                                       }
//!                                       export default Util;
//!
//! // index.d.ts                         // index.d.ts (applied)
//! import * as Util from "./util";      import Util from "./util";
//! ```
//!
//! [`DeclarationWrapper::scan`] builds a [`WrapPlan`]; [`WrapPlan::apply`]
//! writes it and returns a [`WrapTransaction`] that restores the original
//! bytes on [`WrapTransaction::revert`] or when dropped.

use crate::error::DtsError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, instrument, trace, warn};
use walkdir::WalkDir;

static STAR_IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"import \* as (\S+) from ['"](\.\S*/\S+)['"]"#).expect("valid regex")
});

/// Named export lists and `export default <ident>;` have no meaning inside
/// an ambient namespace.
static EXPORT_ONLY_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^export\s*(\{[^}]*\}|default\s+[\w$]+)\s*;?$").expect("valid regex")
});

const SOURCE_MAP_COMMENT: &str = "//# sourceMappingURL=";

pub struct DeclarationWrapper;

impl DeclarationWrapper {
    /// Find star-imported declaration files below `dir`.
    #[instrument(level = "debug", skip_all, fields(dir = %dir.display()))]
    pub fn scan(dir: &Path) -> Result<WrapPlan, DtsError> {
        let mut plan = WrapPlan::default();
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(dir).to_path_buf();
                DtsError::io(path, err.into())
            })?;
            if !entry.file_type().is_file() || !is_declaration_file_name(entry.path()) {
                continue;
            }
            plan.scan_file(entry.path())?;
        }
        debug!(
            wrapped = plan.wraps.len(),
            users = plan.users.len(),
            "scanned declaration output"
        );
        Ok(plan)
    }
}

/// Files to rewrite, with the bytes they held at scan time.
#[derive(Debug, Default)]
pub struct WrapPlan {
    /// Needs-wrap file to its namespace identifier.
    wraps: BTreeMap<PathBuf, String>,
    /// Files importing a needs-wrap file.
    users: BTreeSet<PathBuf>,
    originals: BTreeMap<PathBuf, Vec<u8>>,
}

impl WrapPlan {
    pub fn is_empty(&self) -> bool {
        self.wraps.is_empty()
    }

    /// Wrapped files with their namespace identifiers.
    pub fn wrapped_files(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.wraps
            .iter()
            .map(|(path, namespace)| (path.as_path(), namespace.as_str()))
    }

    pub fn user_files(&self) -> impl Iterator<Item = &Path> {
        self.users.iter().map(PathBuf::as_path)
    }

    /// Write every rewrite. Either all files are rewritten or none are.
    #[instrument(level = "debug", skip_all, fields(wrapped = self.wraps.len()))]
    pub fn apply(self) -> Result<WrapTransaction, DtsError> {
        let updates = self.rewrites()?;
        let mut written: Vec<(PathBuf, Vec<u8>)> = Vec::with_capacity(updates.len());
        for (path, original, contents) in updates {
            if let Err(source) = std::fs::write(&path, contents) {
                let err = DtsError::io(&path, source);
                if let Err(restore_err) = restore(&written) {
                    warn!(%restore_err, "could not restore declaration files after failed apply");
                }
                return Err(err);
            }
            trace!(path = %path.display(), "rewrote declaration file");
            written.push((path, original));
        }
        debug!(files = written.len(), "applied declaration wrapping");
        Ok(WrapTransaction {
            originals: written,
            finished: false,
        })
    }

    fn scan_file(&mut self, path: &Path) -> Result<(), DtsError> {
        // Importers and wrap targets share one key space.
        let path = normalize_path(path);
        let path = path.as_path();
        let text = self.original_text(path)?;
        let dir = path.parent().unwrap_or(Path::new(""));
        let mut imports_wrapped = false;
        for captures in STAR_IMPORT.captures_iter(&text) {
            let namespace = &captures[1];
            let target = normalize_path(&dir.join(format!("{}.d.ts", &captures[2])));
            imports_wrapped = true;
            if self.wraps.contains_key(&target) {
                continue;
            }
            if !target.is_file() {
                debug!(
                    importer = %path.display(),
                    target = %target.display(),
                    "star import has no declaration file"
                );
                continue;
            }
            self.original_text(&target)?;
            trace!(target = %target.display(), namespace, "needs namespace wrap");
            self.wraps.insert(target, namespace.to_string());
        }
        if imports_wrapped {
            self.users.insert(path.to_path_buf());
        }
        Ok(())
    }

    /// Text of `path`, read once and remembered as the file's original bytes.
    fn original_text(&mut self, path: &Path) -> Result<String, DtsError> {
        if !self.originals.contains_key(path) {
            let bytes = std::fs::read(path).map_err(|source| DtsError::io(path, source))?;
            self.originals.insert(path.to_path_buf(), bytes);
        }
        let bytes = self.originals.get(path).map(Vec::as_slice).unwrap_or_default();
        String::from_utf8(bytes.to_vec()).map_err(|_| DtsError::NonUtf8 {
            path: path.to_path_buf(),
        })
    }

    /// New contents of every touched file, computed before anything is
    /// written.
    fn rewrites(mut self) -> Result<Vec<(PathBuf, Vec<u8>, String)>, DtsError> {
        let user_rewrites = self.user_import_patterns();
        let touched: BTreeSet<PathBuf> = self
            .wraps
            .keys()
            .chain(self.users.iter())
            .cloned()
            .collect();
        let mut updates = Vec::with_capacity(touched.len());
        for path in touched {
            let mut text = self.original_text(&path)?;
            if let Some(namespace) = self.wraps.get(&path) {
                text = wrap_in_namespace(&text, namespace);
            }
            if self.users.contains(&path) {
                for pattern in &user_rewrites {
                    text = pattern
                        .replace_all(&text, "import ${1} from ${2}")
                        .into_owned();
                }
            }
            let original = self.originals.remove(&path).unwrap_or_default();
            if text.as_bytes() == original.as_slice() {
                continue;
            }
            updates.push((path, original, text));
        }
        Ok(updates)
    }

    /// One pattern per wrapped stem, matching star imports whose final path
    /// segment is that stem.
    fn user_import_patterns(&self) -> Vec<Regex> {
        let stems: BTreeSet<&str> = self
            .wraps
            .keys()
            .filter_map(|path| path.file_name()?.to_str()?.strip_suffix(".d.ts"))
            .collect();
        stems
            .into_iter()
            .filter_map(|stem| {
                let pattern = format!(
                    r#"import \* as (\S+) from (['"]\S*/{}['"])"#,
                    regex::escape(stem)
                );
                Regex::new(&pattern).ok()
            })
            .collect()
    }
}

/// Applied rewrites. Reverts on drop unless committed or reverted.
#[derive(Debug)]
pub struct WrapTransaction {
    originals: Vec<(PathBuf, Vec<u8>)>,
    finished: bool,
}

impl WrapTransaction {
    /// Files this transaction rewrote.
    pub fn files(&self) -> impl Iterator<Item = &Path> {
        self.originals.iter().map(|(path, _)| path.as_path())
    }

    /// Restore every rewritten file to its original bytes.
    #[instrument(level = "debug", skip_all, fields(files = self.originals.len()))]
    pub fn revert(mut self) -> Result<(), DtsError> {
        self.finished = true;
        restore(&self.originals)?;
        debug!("reverted declaration wrapping");
        Ok(())
    }

    /// Keep the rewritten files.
    pub fn commit(mut self) {
        self.finished = true;
    }
}

impl Drop for WrapTransaction {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        if let Err(err) = restore(&self.originals) {
            warn!(%err, "failed to revert declaration wrapping");
        }
    }
}

/// Write back every original. Keeps going past failures and returns the
/// first one.
fn restore(originals: &[(PathBuf, Vec<u8>)]) -> Result<(), DtsError> {
    let mut first_error = None;
    for (path, bytes) in originals {
        if let Err(source) = std::fs::write(path, bytes) {
            warn!(path = %path.display(), %source, "failed to restore declaration file");
            first_error.get_or_insert(DtsError::io(path, source));
        }
    }
    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// `<stem>.d.ts` with no other dots.
fn is_declaration_file_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_suffix(".d.ts"))
        .is_some_and(|stem| !stem.is_empty() && !stem.contains('.'))
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push("..");
                }
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Wrap one declaration file's statements in `declare namespace <ns>` with a
/// default export of the namespace.
pub(crate) fn wrap_in_namespace(text: &str, namespace: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let open_at = namespace_start(&lines);
    let mut out: Vec<String> = Vec::with_capacity(lines.len() + 3);
    let mut closed = false;
    for (index, line) in lines.iter().enumerate() {
        if index == open_at {
            out.push(format!("declare namespace {namespace} {{"));
        }
        let trimmed = line.trim();
        if !closed && trimmed.starts_with(SOURCE_MAP_COMMENT) {
            out.push("}".to_string());
            out.push(format!("export default {namespace};"));
            closed = true;
        }
        if EXPORT_ONLY_LINE.is_match(trimmed) {
            continue;
        }
        out.push(strip_modifiers(line));
    }
    if open_at >= lines.len() {
        out.push(format!("declare namespace {namespace} {{"));
    }
    if !closed {
        out.push("}".to_string());
        out.push(format!("export default {namespace};"));
    }
    let mut wrapped = out.join("\n");
    wrapped.push('\n');
    wrapped
}

/// Line that opens the namespace: the first `export `/`declare ` statement,
/// or the doc comment directly above it.
fn namespace_start(lines: &[&str]) -> usize {
    let Some(first) = lines.iter().position(|line| {
        let line = line.trim_start();
        line.starts_with("export ") || line.starts_with("declare ")
    }) else {
        return 0;
    };
    if first > 0 && lines[first - 1].trim_end().ends_with("*/") {
        let comment_start = (0..first).rev().find(|&i| lines[i].contains("/*"));
        if let Some(start) = comment_start
            && lines[start].trim_start().starts_with("/**")
        {
            return start;
        }
    }
    first
}

/// Drop leading `export`, `export default` and `declare` modifiers.
fn strip_modifiers(line: &str) -> String {
    let body = line.trim_start();
    let indent = &line[..line.len() - body.len()];
    let mut rest = body;
    loop {
        if let Some(after) = rest.strip_prefix("export ") {
            rest = after.trim_start();
            if let Some(after) = rest.strip_prefix("default ") {
                rest = after.trim_start();
            }
        } else if let Some(after) = rest.strip_prefix("declare ") {
            rest = after.trim_start();
        } else {
            break;
        }
    }
    format!("{indent}{rest}")
}

#[cfg(test)]
#[path = "tests/wrapper_unit_tests.rs"]
mod tests;
