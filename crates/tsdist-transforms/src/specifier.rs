//! Relative module specifier rewriting.
//!
//! Runs once over code output and once over declaration output:
//!
//! ```text
//! import { a } from "./util"        ->  import { a } from "./util.js"
//! export * from "./lib/index.ts"    ->  export * from "./lib/index.js"
//! import("./dir")                   ->  import("./dir/index.js")
//! import { __awaiter } from "tslib" ->  import { __awaiter } from "../tslib.js"
//! import lodash from "lodash"       ->  (unchanged)
//! ```

use crate::options::TransformOptions;
use crate::resolution::{is_relative, try_file};
use crate::{OutputKind, Transformer};
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use tsdist_ast::visit::{VisitMut, walk_call_expr, walk_import_type};
use tsdist_ast::*;
use tsdist_common::ModuleKind;

/// Module name of the runtime helper library.
pub const RUNTIME_HELPER_MODULE: &str = "tslib";

/// Extensions removed before suffixing, longest first.
const STRIPPED_EXTENSIONS: [&str; 6] = [".d.ts", ".tsx", ".jsx", ".mjs", ".ts", ".js"];

/// Bound on nested directory-to-entry hops.
const MAX_DIRECTORY_DEPTH: usize = 32;

pub struct SpecifierRewriter {
    output: OutputKind,
    /// `None` for declaration output and for `moduleSuffix: none`.
    suffix: Option<&'static str>,
    runtime_helper_local_path: Option<String>,
    rewritten: usize,
}

impl SpecifierRewriter {
    pub fn new(options: &TransformOptions, module_kind: ModuleKind, output: OutputKind) -> Self {
        let suffix = match output {
            OutputKind::Code => options.module_suffix.extension(module_kind),
            OutputKind::Declarations => None,
        };
        SpecifierRewriter {
            output,
            suffix,
            runtime_helper_local_path: options
                .runtime_helper_local_path
                .as_deref()
                .map(posix_path),
            rewritten: 0,
        }
    }

    pub fn output(&self) -> OutputKind {
        self.output
    }

    /// Specifiers changed so far.
    pub fn rewritten_count(&self) -> usize {
        self.rewritten
    }

    /// Rewrite one specifier as written in `containing_file`.
    pub fn rewrite_specifier(&self, specifier: &str, containing_file: &Path) -> String {
        FileScope::new(self, containing_file).rewrite(specifier)
    }
}

impl Transformer for SpecifierRewriter {
    fn transform(&mut self, file: &mut SourceFile) {
        let mut scope = FileScope::new(self, Path::new(&file.file_name));
        scope.visit_source_file(file);
        let changed = scope.changed;
        if changed > 0 {
            debug!(
                file = %file.file_name,
                output = ?self.output,
                changed,
                "rewrote module specifiers"
            );
        }
        self.rewritten += changed;
    }
}

/// Rewrite state for one containing file.
struct FileScope<'r> {
    rewriter: &'r SpecifierRewriter,
    containing_dir: PathBuf,
    /// Directory-style resolutions already performed for this file.
    memo: FxHashMap<String, String>,
    changed: usize,
}

impl<'r> FileScope<'r> {
    fn new(rewriter: &'r SpecifierRewriter, containing_file: &Path) -> Self {
        FileScope {
            rewriter,
            containing_dir: containing_file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            memo: FxHashMap::default(),
            changed: 0,
        }
    }

    fn rewrite(&mut self, specifier: &str) -> String {
        if specifier == RUNTIME_HELPER_MODULE
            && let Some(local) = &self.rewriter.runtime_helper_local_path
        {
            let from = posix_path(&self.containing_dir);
            let relative = relative_specifier(&from, local);
            return self.with_suffix(strip_extension(&relative));
        }
        if !is_relative(specifier) || specifier.ends_with(".json") {
            return specifier.to_string();
        }
        let resolved = self.resolve_directory(specifier, 0);
        self.with_suffix(strip_extension(&resolved))
    }

    fn with_suffix(&self, specifier: &str) -> String {
        match self.rewriter.suffix {
            Some(suffix) => format!("{specifier}{suffix}"),
            None => specifier.to_string(),
        }
    }

    /// Follow `package.json` `main` (or `index`) while the specifier names a
    /// directory. A file of the same name wins, as it does in resolution.
    fn resolve_directory(&mut self, specifier: &str, depth: usize) -> String {
        if depth >= MAX_DIRECTORY_DEPTH {
            return specifier.to_string();
        }
        if let Some(resolved) = self.memo.get(specifier) {
            return resolved.clone();
        }
        let candidate = self.containing_dir.join(specifier);
        let resolved = if candidate.is_dir() && try_file(&candidate).is_none() {
            let entry = read_main_entry(&candidate).unwrap_or_else(|| "index".to_string());
            let next = join_specifier(specifier, &entry);
            trace!(specifier, next = %next, "resolved directory specifier");
            self.resolve_directory(&next, depth + 1)
        } else {
            specifier.to_string()
        };
        self.memo.insert(specifier.to_string(), resolved.clone());
        resolved
    }

    fn rewrite_lit(&mut self, lit: &mut StrLit) {
        let rewritten = self.rewrite(&lit.value);
        if rewritten != lit.value {
            trace!(from = %lit.value, to = %rewritten, "rewrote specifier");
            lit.value = rewritten;
            self.changed += 1;
        }
    }
}

impl VisitMut for FileScope<'_> {
    fn visit_import_decl(&mut self, import: &mut ImportDecl) {
        self.rewrite_lit(&mut import.specifier);
    }

    fn visit_import_equals(&mut self, import: &mut ImportEqualsDecl) {
        if let ModuleReference::External(specifier) = &mut import.reference {
            self.rewrite_lit(specifier);
        }
    }

    fn visit_export_named(&mut self, export: &mut ExportNamed) {
        if let Some(source) = &mut export.source {
            self.rewrite_lit(source);
        }
    }

    fn visit_export_all(&mut self, export: &mut ExportAll) {
        self.rewrite_lit(&mut export.source);
    }

    fn visit_call_expr(&mut self, call: &mut CallExpr) {
        if let Some(specifier) = call.module_specifier_mut() {
            self.rewrite_lit(specifier);
        }
        walk_call_expr(self, call);
    }

    fn visit_import_type(&mut self, import: &mut ImportType) {
        self.rewrite_lit(&mut import.argument);
        walk_import_type(self, import);
    }
}

/// `main` of `<dir>/package.json`, when present and a string.
fn read_main_entry(dir: &Path) -> Option<String> {
    let manifest_path = dir.join("package.json");
    let content = std::fs::read_to_string(&manifest_path).ok()?;
    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(manifest) => manifest
            .get("main")
            .and_then(serde_json::Value::as_str)
            .map(str::to_string),
        Err(err) => {
            debug!(path = %manifest_path.display(), %err, "ignoring unreadable package.json");
            None
        }
    }
}

fn strip_extension(specifier: &str) -> &str {
    STRIPPED_EXTENSIONS
        .iter()
        .find_map(|ext| specifier.strip_suffix(ext))
        .unwrap_or(specifier)
}

fn posix_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Lexically normalize a `/`-separated path. Leading `..` segments of a
/// relative path are kept.
fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|last| *last != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }
    let joined = segments.join("/");
    if absolute { format!("/{joined}") } else { joined }
}

/// Prefix a normalized relative path with `./` unless it climbs with `../`.
fn dot_relative(path: String) -> String {
    if path.is_empty() {
        ".".to_string()
    } else if path == ".." || path.starts_with("../") {
        path
    } else {
        format!("./{path}")
    }
}

/// `join("./lib", "src/entry.ts")` -> `./lib/src/entry.ts`
fn join_specifier(specifier: &str, entry: &str) -> String {
    dot_relative(normalize(&format!("{specifier}/{entry}")))
}

/// Relative specifier from directory `from` to `to`.
fn relative_specifier(from: &str, to: &str) -> String {
    let from = normalize(from);
    let to = normalize(to);
    let from_segments: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_segments: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();
    let common = from_segments
        .iter()
        .zip(&to_segments)
        .take_while(|(a, b)| a == b)
        .count();
    let mut parts: Vec<&str> = vec![".."; from_segments.len() - common];
    parts.extend_from_slice(&to_segments[common..]);
    dot_relative(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_posix_paths() {
        assert_eq!(normalize("./a/./b/../c"), "a/c");
        assert_eq!(normalize("../../x"), "../../x");
        assert_eq!(normalize("/root/../etc"), "/etc");
        assert_eq!(normalize("a/.."), "");
    }

    #[test]
    fn joins_entries_onto_specifiers() {
        assert_eq!(join_specifier(".", "lib/entry.ts"), "./lib/entry.ts");
        assert_eq!(join_specifier("./pkg", "./main.js"), "./pkg/main.js");
        assert_eq!(join_specifier("..", "index"), "../index");
    }

    #[test]
    fn computes_relative_specifiers() {
        assert_eq!(
            relative_specifier("/p/src/util", "/p/src/tslib.ts"),
            "../tslib.ts"
        );
        assert_eq!(relative_specifier("/p/src", "/p/src/tslib.ts"), "./tslib.ts");
        assert_eq!(relative_specifier("src", "vendor/tslib"), "../vendor/tslib");
    }

    #[test]
    fn strips_one_recognized_extension() {
        assert_eq!(strip_extension("./a.d.ts"), "./a");
        assert_eq!(strip_extension("./a.mjs"), "./a");
        assert_eq!(strip_extension("./a.tsx"), "./a");
        assert_eq!(strip_extension("./a.css"), "./a.css");
    }
}
