use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Module system a compilation target emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModuleKind {
    #[default]
    #[serde(rename = "commonjs", alias = "cjs")]
    CommonJs,
    #[serde(
        rename = "esmodule",
        alias = "esm",
        alias = "es2015",
        alias = "es2020",
        alias = "es2022",
        alias = "esnext"
    )]
    EsModule,
}

impl ModuleKind {
    pub fn is_es_module(self) -> bool {
        matches!(self, ModuleKind::EsModule)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModuleKind::CommonJs => "commonjs",
            ModuleKind::EsModule => "esmodule",
        }
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleKind {
    type Err = String;

    /// Accepts the tsconfig spellings of `module` that map onto the two
    /// kinds tsdist distinguishes.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .chars()
            .filter(|ch| !matches!(ch, '-' | '_') && !ch.is_whitespace())
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "commonjs" | "cjs" => Ok(ModuleKind::CommonJs),
            "esmodule" | "esm" | "es6" | "es2015" | "es2020" | "es2022" | "esnext"
            | "preserve" => Ok(ModuleKind::EsModule),
            _ => Err(format!("unsupported module kind '{value}'")),
        }
    }
}
