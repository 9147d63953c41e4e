//! Public export shapes of a merged declaration file.

use crate::error::DtsError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

static DECLARE_KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"declare\s").expect("valid regex"));
static DEFAULT_EXPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"export default (\S+);").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclarationFormat {
    /// Module declarations plus `export as namespace <name>`.
    #[default]
    #[serde(alias = "umd")]
    GlobalUmd,
    /// A namespace assigned with `export = <name>`.
    #[serde(alias = "cjs")]
    CommonjsNamespace,
    /// A bare global namespace.
    #[serde(alias = "iife")]
    PlainGlobal,
}

impl DeclarationFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationFormat::GlobalUmd => "global-umd",
            DeclarationFormat::CommonjsNamespace => "commonjs-namespace",
            DeclarationFormat::PlainGlobal => "plain-global",
        }
    }
}

impl fmt::Display for DeclarationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclarationFormat {
    type Err = DtsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "global-umd" | "umd" => Ok(DeclarationFormat::GlobalUmd),
            "commonjs-namespace" | "cjs" => Ok(DeclarationFormat::CommonjsNamespace),
            "plain-global" | "iife" => Ok(DeclarationFormat::PlainGlobal),
            other => Err(DtsError::InvalidFormat(other.to_string())),
        }
    }
}

/// Render merged declaration text as `format` for a library called `name`.
pub fn render(text: &str, name: &str, format: DeclarationFormat) -> String {
    match format {
        DeclarationFormat::GlobalUmd => format!("{text}\nexport as namespace {name}\n"),
        DeclarationFormat::CommonjsNamespace => {
            format!(
                "declare namespace {name} {{\n{}\n}}\nexport = {name}\n",
                namespace_body(text)
            )
        }
        DeclarationFormat::PlainGlobal => {
            format!("declare namespace {name} {{\n{}\n}}\n", namespace_body(text))
        }
    }
}

/// Rewrite the merged declaration file at `path` in place.
pub fn resolve(path: &Path, name: &str, format: DeclarationFormat) -> Result<(), DtsError> {
    let text = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::InvalidData {
            DtsError::NonUtf8 {
                path: path.to_path_buf(),
            }
        } else {
            DtsError::io(path, source)
        }
    })?;
    let rendered = render(&text, name, format);
    std::fs::write(path, rendered).map_err(|source| DtsError::io(path, source))?;
    debug!(path = %path.display(), name, %format, "resolved declaration format");
    Ok(())
}

fn namespace_body(text: &str) -> String {
    let body = DECLARE_KEYWORD.replace_all(text, "");
    DEFAULT_EXPORT
        .replace_all(&body, "export { ${1} as default }")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_short_aliases() {
        assert_eq!(
            "global-umd".parse::<DeclarationFormat>().unwrap(),
            DeclarationFormat::GlobalUmd
        );
        assert_eq!(
            "cjs".parse::<DeclarationFormat>().unwrap(),
            DeclarationFormat::CommonjsNamespace
        );
        assert_eq!(
            "iife".parse::<DeclarationFormat>().unwrap(),
            DeclarationFormat::PlainGlobal
        );
        assert_eq!(DeclarationFormat::default(), DeclarationFormat::GlobalUmd);
    }

    #[test]
    fn unknown_format_names_accepted_values() {
        let err = "esm".parse::<DeclarationFormat>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'esm'"));
        for accepted in ["global-umd", "commonjs-namespace", "plain-global"] {
            assert!(message.contains(accepted), "{message}");
        }
    }

    #[test]
    fn display_matches_parse() {
        for format in [
            DeclarationFormat::GlobalUmd,
            DeclarationFormat::CommonjsNamespace,
            DeclarationFormat::PlainGlobal,
        ] {
            assert_eq!(format.to_string().parse::<DeclarationFormat>().unwrap(), format);
        }
    }
}
