//! Per-target transform options.
//!
//! ```json
//! {
//!   "moduleSuffix": "node",
//!   "runtimeHelperLocalPath": "src/tslib.ts",
//!   "ignoredDiagnosticCodes": [2307],
//!   "defineTable": {
//!     "__VERSION__": "\"1.0.0\"",
//!     "__DEV__": false,
//!     "__BUILT__": { "kind": "date", "epochMillis": 1700000000000 }
//!   }
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tsdist_ast::factory::{bool_expr, call, ident_expr, new_expr, null_expr, num_expr, str_expr};
use tsdist_ast::{Expr, Lit, RegexLit};
use tsdist_common::ModuleKind;

#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("invalid module suffix '{0}': expected one of default, none, node")]
    InvalidModuleSuffix(String),
    #[error("define key '{0}' is not a valid identifier")]
    InvalidDefineKey(String),
    #[error("failed to parse transform options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Extension policy for rewritten relative specifiers in code output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleSuffix {
    /// Append `.js`.
    #[default]
    Default,
    /// Leave specifiers without an extension.
    None,
    /// Append `.mjs` for ES module targets and `.js` otherwise.
    Node,
}

impl ModuleSuffix {
    /// Extension appended to code output specifiers for `module_kind`.
    pub fn extension(self, module_kind: ModuleKind) -> Option<&'static str> {
        match self {
            ModuleSuffix::None => None,
            ModuleSuffix::Node if module_kind.is_es_module() => Some(".mjs"),
            ModuleSuffix::Node | ModuleSuffix::Default => Some(".js"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModuleSuffix::Default => "default",
            ModuleSuffix::None => "none",
            ModuleSuffix::Node => "node",
        }
    }
}

impl fmt::Display for ModuleSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleSuffix {
    type Err = OptionsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(ModuleSuffix::Default),
            "none" => Ok(ModuleSuffix::None),
            "node" => Ok(ModuleSuffix::Node),
            _ => Err(OptionsError::InvalidModuleSuffix(value.to_string())),
        }
    }
}

/// Value substituted for a define key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "LiteralRepr", into = "LiteralRepr")]
pub enum LiteralValue {
    /// Inserted verbatim as source text: `"2"` folds to `2`, `"\"a\""` to `"a"`.
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
    NaN,
    /// `Symbol("<description>")`
    Symbol(String),
    /// `new Date(<epoch millis>)`
    Date(f64),
    /// `/source/flags`
    Regex(String),
}

impl LiteralValue {
    /// Expression node the value folds to.
    pub fn to_expr(&self) -> Expr {
        match self {
            LiteralValue::String(text) => Expr::Raw(text.clone()),
            LiteralValue::Number(value) => number_expr(*value),
            LiteralValue::Boolean(value) => bool_expr(*value),
            LiteralValue::Null => null_expr(),
            LiteralValue::Undefined => ident_expr("undefined"),
            LiteralValue::NaN => ident_expr("NaN"),
            LiteralValue::Symbol(description) => {
                call(ident_expr("Symbol"), vec![str_expr(description.clone())])
            }
            LiteralValue::Date(epoch_millis) => {
                new_expr(ident_expr("Date"), vec![number_expr(*epoch_millis)])
            }
            LiteralValue::Regex(source) => Expr::Lit(Lit::Regex(parse_regex(source))),
        }
    }
}

fn number_expr(value: f64) -> Expr {
    if value.is_nan() {
        ident_expr("NaN")
    } else if value.is_infinite() {
        if value > 0.0 {
            ident_expr("Infinity")
        } else {
            Expr::Unary(tsdist_ast::UnaryExpr {
                op: tsdist_ast::UnaryOp::Minus,
                arg: Box::new(ident_expr("Infinity")),
            })
        }
    } else {
        num_expr(value)
    }
}

/// Split `/source/flags`; text without delimiters is taken as a bare pattern.
fn parse_regex(text: &str) -> RegexLit {
    if let Some(body) = text.strip_prefix('/')
        && let Some(close) = body.rfind('/')
    {
        return RegexLit {
            pattern: body[..close].to_string(),
            flags: body[close + 1..].to_string(),
        };
    }
    RegexLit {
        pattern: text.to_string(),
        flags: String::new(),
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LiteralRepr {
    Null(()),
    Boolean(bool),
    Number(f64),
    String(String),
    Tagged(TaggedLiteral),
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum TaggedLiteral {
    Undefined,
    Nan,
    Symbol {
        description: String,
    },
    Date {
        #[serde(rename = "epochMillis")]
        epoch_millis: f64,
    },
    Regex {
        source: String,
    },
}

impl From<LiteralRepr> for LiteralValue {
    fn from(repr: LiteralRepr) -> Self {
        match repr {
            LiteralRepr::Null(()) => LiteralValue::Null,
            LiteralRepr::Boolean(value) => LiteralValue::Boolean(value),
            LiteralRepr::Number(value) => LiteralValue::Number(value),
            LiteralRepr::String(text) => LiteralValue::String(text),
            LiteralRepr::Tagged(TaggedLiteral::Undefined) => LiteralValue::Undefined,
            LiteralRepr::Tagged(TaggedLiteral::Nan) => LiteralValue::NaN,
            LiteralRepr::Tagged(TaggedLiteral::Symbol { description }) => {
                LiteralValue::Symbol(description)
            }
            LiteralRepr::Tagged(TaggedLiteral::Date { epoch_millis }) => {
                LiteralValue::Date(epoch_millis)
            }
            LiteralRepr::Tagged(TaggedLiteral::Regex { source }) => LiteralValue::Regex(source),
        }
    }
}

impl From<LiteralValue> for LiteralRepr {
    fn from(value: LiteralValue) -> Self {
        match value {
            LiteralValue::Null => LiteralRepr::Null(()),
            LiteralValue::Boolean(value) => LiteralRepr::Boolean(value),
            LiteralValue::Number(value) => LiteralRepr::Number(value),
            LiteralValue::String(text) => LiteralRepr::String(text),
            LiteralValue::Undefined => LiteralRepr::Tagged(TaggedLiteral::Undefined),
            LiteralValue::NaN => LiteralRepr::Tagged(TaggedLiteral::Nan),
            LiteralValue::Symbol(description) => {
                LiteralRepr::Tagged(TaggedLiteral::Symbol { description })
            }
            LiteralValue::Date(epoch_millis) => {
                LiteralRepr::Tagged(TaggedLiteral::Date { epoch_millis })
            }
            LiteralValue::Regex(source) => LiteralRepr::Tagged(TaggedLiteral::Regex { source }),
        }
    }
}

/// Options a compilation target hands to its transforms. Immutable once a
/// compilation starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransformOptions {
    pub module_suffix: ModuleSuffix,
    /// Local replacement for `tslib` imports.
    pub runtime_helper_local_path: Option<PathBuf>,
    /// Diagnostic codes dropped before reporting and failure evaluation.
    pub ignored_diagnostic_codes: BTreeSet<u32>,
    pub define_table: IndexMap<String, LiteralValue>,
}

impl TransformOptions {
    pub fn from_json(text: &str) -> Result<Self, OptionsError> {
        let options: TransformOptions = serde_json::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    /// Every define key must be an identifier, since only identifier
    /// references are folded.
    pub fn validate(&self) -> Result<(), OptionsError> {
        match self.define_table.keys().find(|key| !is_identifier(key)) {
            Some(key) => Err(OptionsError::InvalidDefineKey(key.clone())),
            None => Ok(()),
        }
    }

    pub fn is_ignored(&self, code: u32) -> bool {
        self.ignored_diagnostic_codes.contains(&code)
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first == '$' || first.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|ch| ch == '_' || ch == '$' || ch.is_alphanumeric())
}

#[cfg(test)]
#[path = "tests/options_tests.rs"]
mod tests;
