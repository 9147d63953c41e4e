//! Build configuration: compilation targets, declaration bundling and
//! project defaults.
//!
//! ```jsonc
//! // tsdist.json
//! {
//!   "targets": [
//!     { "name": "esm", "configPath": "tsconfig.esm.json", "moduleKind": "esmodule",
//!       "outputDirectory": "lib/esm", "modern": true,
//!       "transformOptions": { "moduleSuffix": "node" } },
//!   ],
//!   "declarationBundle": { "inputDir": "lib/esm", "format": "commonjs-namespace" },
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;
use tsdist_common::ModuleKind;
use tsdist_dts::DeclarationFormat;
use tsdist_transforms::TransformOptions;

use crate::tsconfig::{find_config_file, parse_jsonc};

/// Configuration file looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "tsdist.json";

/// One module-format compilation of the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilationTarget {
    pub name: String,
    /// tsconfig of this target, relative to the project root.
    pub config_path: PathBuf,
    pub module_kind: ModuleKind,
    /// Output directory relative to the project root. Overrides `outDir`.
    pub output_directory: PathBuf,
    #[serde(default)]
    pub transform_options: TransformOptions,
    /// Declaration bundling waits on this target.
    #[serde(default)]
    pub modern: bool,
}

impl CompilationTarget {
    pub fn new(
        name: impl Into<String>,
        config_path: impl Into<PathBuf>,
        module_kind: ModuleKind,
        output_directory: impl Into<PathBuf>,
    ) -> Self {
        CompilationTarget {
            name: name.into(),
            config_path: config_path.into(),
            module_kind,
            output_directory: output_directory.into(),
            transform_options: TransformOptions::default(),
            modern: false,
        }
    }

    pub fn modern(mut self) -> Self {
        self.modern = true;
        self
    }

    pub fn with_transform_options(mut self, options: TransformOptions) -> Self {
        self.transform_options = options;
        self
    }

    pub fn default_targets() -> Vec<CompilationTarget> {
        vec![
            CompilationTarget::new("cjs", "tsconfig.cjs.json", ModuleKind::CommonJs, "lib/cjs"),
            CompilationTarget::new(
                "cjs-modern",
                "tsconfig.json",
                ModuleKind::CommonJs,
                "lib/cjs-modern",
            ),
            CompilationTarget::new("esm", "tsconfig.esm.json", ModuleKind::EsModule, "lib/esm"),
            CompilationTarget::new(
                "esm-modern",
                "tsconfig.modern.json",
                ModuleKind::EsModule,
                "lib/esm-modern",
            )
            .modern(),
        ]
    }
}

/// Declaration bundling step run after the modern target succeeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeclarationBundleConfig {
    /// Per-file declaration output the bundler reads.
    pub input_dir: PathBuf,
    /// Entry declaration file, relative to the project root.
    pub entry: PathBuf,
    pub package_json: PathBuf,
    /// Merged declaration file. Defaults to `dist/<library>.d.ts`.
    pub output_path: Option<PathBuf>,
    pub format: DeclarationFormat,
    /// Wrap star-imported declaration files in namespaces while bundling.
    pub namespace_wrapper: bool,
    /// Bundler program and arguments, run in the project root.
    pub command: Vec<String>,
}

impl Default for DeclarationBundleConfig {
    fn default() -> Self {
        DeclarationBundleConfig {
            input_dir: PathBuf::from("lib/esm-modern"),
            entry: PathBuf::from("lib/esm-modern/index.d.ts"),
            package_json: PathBuf::from("package.json"),
            output_path: None,
            format: DeclarationFormat::default(),
            namespace_wrapper: false,
            command: vec![
                "api-extractor".to_string(),
                "run".to_string(),
                "--local".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildConfig {
    /// Project root. Relative roots are taken against the config file.
    pub root: PathBuf,
    pub targets: Vec<CompilationTarget>,
    pub declaration_bundle: Option<DeclarationBundleConfig>,
    /// Hand-written declarations copied next to each target's output.
    pub external_api_declaration_dir: Option<PathBuf>,
    pub library_name: Option<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            root: PathBuf::new(),
            targets: CompilationTarget::default_targets(),
            declaration_bundle: None,
            external_api_declaration_dir: Some(PathBuf::from("api")),
            library_name: None,
        }
    }
}

impl BuildConfig {
    /// Defaults for the project rooted at `root`.
    pub fn for_project(root: impl Into<PathBuf>) -> Self {
        BuildConfig {
            root: root.into(),
            ..BuildConfig::default()
        }
    }

    /// Load a JSONC build configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read build config: {}", path.display()))?;
        let mut config: BuildConfig = parse_jsonc(&source)
            .with_context(|| format!("failed to parse build config: {}", path.display()))?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.root = config_dir.join(&config.root);
        config.validate()?;
        debug!(
            config = %path.display(),
            targets = config.targets.len(),
            "loaded build config"
        );
        Ok(config)
    }

    /// Configuration for the project containing `start_dir`: its
    /// `tsdist.json` when present, defaults otherwise.
    pub fn discover(start_dir: &Path) -> Result<Self> {
        let root = find_project_root(start_dir);
        let config_path = root.join(CONFIG_FILE_NAME);
        if config_path.is_file() {
            Self::load(&config_path)
        } else {
            Ok(Self::for_project(root))
        }
    }

    pub fn validate(&self) -> Result<()> {
        for target in &self.targets {
            target
                .transform_options
                .validate()
                .with_context(|| format!("invalid transformOptions for target '{}'", target.name))?;
        }
        Ok(())
    }

    /// Configured name, else the basename of `package.json` `name`, else
    /// the root directory name.
    pub fn library_name(&self) -> String {
        if let Some(name) = &self.library_name {
            return name.clone();
        }
        if let Some(name) = package_name(&self.root.join("package.json")) {
            return name;
        }
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "index".to_string())
    }

    pub fn modern_target(&self) -> Option<&CompilationTarget> {
        self.targets.iter().find(|target| target.modern)
    }

    pub fn declaration_output_path(&self, bundle: &DeclarationBundleConfig) -> PathBuf {
        match &bundle.output_path {
            Some(path) => self.root.join(path),
            None => self
                .root
                .join("dist")
                .join(format!("{}.d.ts", self.library_name())),
        }
    }
}

/// Nearest ancestor of `start_dir` holding a `package.json`, or `start_dir`.
pub fn find_project_root(start_dir: &Path) -> PathBuf {
    find_config_file(start_dir, "package.json")
        .and_then(|manifest| manifest.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| start_dir.to_path_buf())
}

fn package_name(manifest: &Path) -> Option<String> {
    let source = std::fs::read_to_string(manifest).ok()?;
    let value: serde_json::Value = serde_json::from_str(&source).ok()?;
    let name = value.get("name")?.as_str()?;
    let basename = name.rsplit('/').next().unwrap_or(name);
    (!basename.is_empty()).then(|| basename.to_string())
}
