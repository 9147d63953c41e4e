//! `tsconfig.json` loading: JSONC parsing, `extends` chains, option
//! resolution and source discovery.

use anyhow::{Context, Result, anyhow, bail};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use tsdist_common::ModuleKind;

use crate::discovery::{FileDiscoveryOptions, discover_ts_files};

/// Accepts `"noEmit": "true"` as well as `"noEmit": true`.
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(Some(true)),
            "false" | "0" | "no" | "off" => Ok(Some(false)),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    #[serde(default)]
    pub extends: Option<String>,
    #[serde(default)]
    pub compiler_options: Option<CompilerOptions>,
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub files: Option<Vec<String>>,
}

/// The options the build reads; any other key is accepted and ignored.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub root_dir: Option<String>,
    #[serde(default)]
    pub out_dir: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub declaration: Option<bool>,
    #[serde(default)]
    pub declaration_dir: Option<String>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub no_emit: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub no_emit_on_error: Option<bool>,
}

/// Compiler options with paths made absolute against the config directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCompilerOptions {
    pub module: ModuleKind,
    pub root_dir: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub declaration_dir: Option<PathBuf>,
    pub emit_declarations: bool,
    pub no_emit: bool,
    pub no_emit_on_error: bool,
    /// Extension of emitted code files.
    pub code_extension: &'static str,
}

impl Default for ResolvedCompilerOptions {
    fn default() -> Self {
        ResolvedCompilerOptions {
            module: ModuleKind::CommonJs,
            root_dir: None,
            out_dir: None,
            declaration_dir: None,
            emit_declarations: false,
            no_emit: false,
            no_emit_on_error: false,
            code_extension: ".js",
        }
    }
}

/// What a front end needs to build one program.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommandLine {
    pub config_path: PathBuf,
    pub options: ResolvedCompilerOptions,
    pub file_names: Vec<PathBuf>,
}

impl ParsedCommandLine {
    pub fn config_dir(&self) -> &Path {
        self.config_path.parent().unwrap_or(Path::new("."))
    }
}

pub fn resolve_compiler_options(
    options: Option<&CompilerOptions>,
    base_dir: &Path,
) -> Result<ResolvedCompilerOptions> {
    let mut resolved = ResolvedCompilerOptions::default();
    let Some(options) = options else {
        return Ok(resolved);
    };

    if let Some(module) = options.module.as_deref() {
        resolved.module = module
            .parse::<ModuleKind>()
            .map_err(|message| anyhow!("compilerOptions.module: {message}"))?;
    }

    resolved.root_dir = resolve_dir_option(options.root_dir.as_deref(), base_dir);
    resolved.out_dir = resolve_dir_option(options.out_dir.as_deref(), base_dir);
    resolved.declaration_dir = resolve_dir_option(options.declaration_dir.as_deref(), base_dir);

    if let Some(declaration) = options.declaration {
        resolved.emit_declarations = declaration;
    }
    if resolved.declaration_dir.is_some() && options.declaration.is_none() {
        resolved.emit_declarations = true;
    }

    if let Some(no_emit) = options.no_emit {
        resolved.no_emit = no_emit;
    }

    if let Some(no_emit_on_error) = options.no_emit_on_error {
        resolved.no_emit_on_error = no_emit_on_error;
    }

    Ok(resolved)
}

fn resolve_dir_option(value: Option<&str>, base_dir: &Path) -> Option<PathBuf> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    Some(base_dir.join(value))
}

pub fn parse_tsconfig(source: &str) -> Result<TsConfig> {
    parse_jsonc(source).context("failed to parse tsconfig JSON")
}

/// Parse JSON with comments and trailing commas.
pub fn parse_jsonc<T: DeserializeOwned>(source: &str) -> Result<T> {
    let stripped = strip_jsonc(source);
    let normalized = remove_trailing_commas(&stripped);
    Ok(serde_json::from_str(&normalized)?)
}

pub fn load_tsconfig(path: &Path) -> Result<TsConfig> {
    let mut visited = HashSet::new();
    load_tsconfig_inner(path, &mut visited)
}

fn load_tsconfig_inner(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<TsConfig> {
    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if !visited.insert(canonical.clone()) {
        bail!("tsconfig extends cycle detected at {}", canonical.display());
    }

    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read tsconfig: {}", path.display()))?;
    let mut config = parse_tsconfig(&source)
        .with_context(|| format!("failed to parse tsconfig: {}", path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_path = resolve_extends_path(path, &extends)?;
        trace!(config = %path.display(), base = %base_path.display(), "following extends");
        let base_config = load_tsconfig_inner(&base_path, visited)?;
        config = merge_configs(base_config, config);
    }

    visited.remove(&canonical);
    Ok(config)
}

fn resolve_extends_path(current_path: &Path, extends: &str) -> Result<PathBuf> {
    let base_dir = current_path
        .parent()
        .ok_or_else(|| anyhow!("tsconfig has no parent directory"))?;
    let mut candidate = PathBuf::from(extends);
    if candidate.extension().is_none() {
        candidate.set_extension("json");
    }

    if candidate.is_absolute() {
        Ok(candidate)
    } else {
        Ok(base_dir.join(candidate))
    }
}

fn merge_configs(base: TsConfig, mut child: TsConfig) -> TsConfig {
    let merged_compiler_options = match (base.compiler_options, child.compiler_options.take()) {
        (Some(base_opts), Some(child_opts)) => Some(merge_compiler_options(base_opts, child_opts)),
        (Some(base_opts), None) => Some(base_opts),
        (None, Some(child_opts)) => Some(child_opts),
        (None, None) => None,
    };

    TsConfig {
        extends: None,
        compiler_options: merged_compiler_options,
        include: child.include.or(base.include),
        exclude: child.exclude.or(base.exclude),
        files: child.files.or(base.files),
    }
}

fn merge_compiler_options(base: CompilerOptions, child: CompilerOptions) -> CompilerOptions {
    CompilerOptions {
        module: child.module.or(base.module),
        root_dir: child.root_dir.or(base.root_dir),
        out_dir: child.out_dir.or(base.out_dir),
        declaration: child.declaration.or(base.declaration),
        declaration_dir: child.declaration_dir.or(base.declaration_dir),
        no_emit: child.no_emit.or(base.no_emit),
        no_emit_on_error: child.no_emit_on_error.or(base.no_emit_on_error),
    }
}

/// Load `config_path` with its `extends` chain, resolve its options and
/// discover its source files.
pub fn parse_command_line(config_path: &Path) -> Result<ParsedCommandLine> {
    let config = load_tsconfig(config_path)?;
    let base_dir = config_path
        .parent()
        .ok_or_else(|| anyhow!("tsconfig has no parent directory"))?;
    let options = resolve_compiler_options(config.compiler_options.as_ref(), base_dir)
        .with_context(|| format!("invalid compilerOptions in {}", config_path.display()))?;

    let discovery = FileDiscoveryOptions {
        base_dir: base_dir.to_path_buf(),
        files: config.files.unwrap_or_default(),
        include: config.include,
        exclude: config.exclude,
        out_dir: options.out_dir.clone(),
    };
    let file_names = discover_ts_files(&discovery)?;
    debug!(
        config = %config_path.display(),
        files = file_names.len(),
        "parsed tsconfig"
    );

    Ok(ParsedCommandLine {
        config_path: config_path.to_path_buf(),
        options,
        file_names,
    })
}

/// Nearest `file_name` in `start_dir` or one of its ancestors.
pub fn find_config_file(start_dir: &Path, file_name: &str) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}

fn strip_jsonc(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;
    let mut in_line_comment = false;
    let mut in_block_comment = false;

    while let Some(ch) = chars.next() {
        if in_line_comment {
            if ch == '\n' {
                in_line_comment = false;
                out.push(ch);
            }
            continue;
        }

        if in_block_comment {
            if ch == '*' {
                if let Some('/') = chars.peek().copied() {
                    chars.next();
                    in_block_comment = false;
                }
            } else if ch == '\n' {
                out.push(ch);
            }
            continue;
        }

        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
            out.push(ch);
            continue;
        }

        if ch == '/'
            && let Some(&next) = chars.peek()
        {
            if next == '/' {
                chars.next();
                in_line_comment = true;
                continue;
            }
            if next == '*' {
                chars.next();
                in_block_comment = true;
                continue;
            }
        }

        out.push(ch);
    }

    out
}

fn remove_trailing_commas(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    let mut in_string = false;
    let mut escape = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            if escape {
                escape = false;
            } else if ch == '\\' {
                escape = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        if ch == '"' {
            in_string = true;
            out.push(ch);
            continue;
        }

        if ch == ',' {
            let next = chars.clone().find(|next| !next.is_whitespace());
            if matches!(next, Some('}' | ']')) {
                continue;
            }
        }

        out.push(ch);
    }

    out
}

#[cfg(test)]
#[path = "tests/tsconfig_tests.rs"]
mod tests;
