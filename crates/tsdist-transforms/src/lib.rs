//! Emit-time transforms for tsdist.
//!
//! A front end calls these hooks on its output trees after type checking:
//!
//! - `after`: code output. Rewrites relative specifiers with the target's
//!   suffix and folds define-table identifiers bound to ambient declarations.
//! - `after_declarations`: declaration output. Rewrites relative specifiers
//!   without a suffix.
//!
//! Module resolution goes through [`ResolutionFallback`], which retries
//! failed specifiers with a recognized extension removed.

pub mod classifier;
pub mod define;
pub mod options;
pub mod resolution;
pub mod specifier;

pub use classifier::{CheckerClassifier, SymbolClassifier};
pub use define::ConstantFoldPass;
pub use options::{LiteralValue, ModuleSuffix, OptionsError, TransformOptions};
pub use resolution::{
    ModuleExtension, ModuleResolver, NodeModuleResolver, ResolutionFailure, ResolutionFallback,
    ResolvedModule,
};
pub use specifier::SpecifierRewriter;

use tracing::debug;
use tsdist_ast::{Checker, SourceFile};
use tsdist_common::ModuleKind;

/// Which emitted tree a pass runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Code,
    Declarations,
}

/// An in-place rewrite of one emitted source file.
pub trait Transformer {
    fn transform(&mut self, file: &mut SourceFile);
}

/// Hooks a front end runs after producing each output tree, in order.
#[derive(Default)]
pub struct CustomTransformers<'a> {
    pub after: Vec<Box<dyn Transformer + 'a>>,
    pub after_declarations: Vec<Box<dyn Transformer + 'a>>,
}

impl CustomTransformers<'_> {
    pub fn is_empty(&self) -> bool {
        self.after.is_empty() && self.after_declarations.is_empty()
    }

    pub fn apply(&mut self, output: OutputKind, file: &mut SourceFile) {
        let passes = match output {
            OutputKind::Code => &mut self.after,
            OutputKind::Declarations => &mut self.after_declarations,
        };
        for pass in passes {
            pass.transform(file);
        }
    }
}

/// Transforms for one compilation, classifying define references through
/// `checker`.
pub fn create_transformers<'a>(
    options: &TransformOptions,
    module_kind: ModuleKind,
    checker: &'a dyn Checker,
) -> CustomTransformers<'a> {
    create_transformers_with_classifier(
        options,
        module_kind,
        Box::new(CheckerClassifier::new(checker)),
    )
}

/// Like [`create_transformers`] with a caller-supplied ambient predicate.
pub fn create_transformers_with_classifier<'a>(
    options: &TransformOptions,
    module_kind: ModuleKind,
    classifier: Box<dyn SymbolClassifier + 'a>,
) -> CustomTransformers<'a> {
    debug!(
        module_kind = %module_kind,
        module_suffix = %options.module_suffix,
        defines = options.define_table.len(),
        "creating emit transforms"
    );
    let mut after: Vec<Box<dyn Transformer + 'a>> = vec![Box::new(SpecifierRewriter::new(
        options,
        module_kind,
        OutputKind::Code,
    ))];
    if !options.define_table.is_empty() {
        after.push(Box::new(ConstantFoldPass::new(
            options.define_table.clone(),
            classifier,
        )));
    }
    CustomTransformers {
        after,
        after_declarations: vec![Box::new(SpecifierRewriter::new(
            options,
            module_kind,
            OutputKind::Declarations,
        ))],
    }
}
