//! Constant folding of define-table identifiers in code output.
//!
//! ```typescript
//! declare const __VERSION__: string;   // defineTable: { "__VERSION__": "\"1.2.0\"" }
//! console.log(__VERSION__);            // console.log("1.2.0");
//! const meta = { __VERSION__ };        // const meta = { __VERSION__: "1.2.0" };
//! meta[__VERSION__] = true;           // meta["1.2.0"] = true;
//! function f(__VERSION__) {            // unchanged: parameter binding
//!     return __VERSION__;
//! }
//! ```

use crate::Transformer;
use crate::classifier::SymbolClassifier;
use crate::options::LiteralValue;
use indexmap::IndexMap;
use tracing::{debug, trace};
use tsdist_ast::visit::{VisitMut, walk_expr, walk_prop};
use tsdist_ast::*;

pub struct ConstantFoldPass<'a> {
    define_table: IndexMap<String, LiteralValue>,
    classifier: Box<dyn SymbolClassifier + 'a>,
    folded: usize,
}

impl<'a> ConstantFoldPass<'a> {
    pub fn new(
        define_table: IndexMap<String, LiteralValue>,
        classifier: Box<dyn SymbolClassifier + 'a>,
    ) -> Self {
        ConstantFoldPass {
            define_table,
            classifier,
            folded: 0,
        }
    }

    /// References replaced so far.
    pub fn folded_count(&self) -> usize {
        self.folded
    }

    fn replacement(&self, ident: &Ident) -> Option<Expr> {
        let value = self.define_table.get(&ident.name)?;
        if !self.classifier.is_ambient_eligible(ident) {
            return None;
        }
        trace!(name = %ident.name, ?value, "folding define reference");
        Some(value.to_expr())
    }

    /// Assignment and update targets keep their binding; only the
    /// expressions inside a member target are folded.
    fn visit_assign_target(&mut self, target: &mut Expr) {
        match target {
            Expr::Member(member) => {
                if !matches!(member.object.as_ref(), Expr::Ident(_)) {
                    self.visit_expr(&mut member.object);
                }
                if let MemberProp::Computed(prop) = &mut member.prop {
                    self.visit_expr(prop);
                }
            }
            Expr::Paren(inner) => self.visit_assign_target(inner),
            _ => {}
        }
    }
}

impl Transformer for ConstantFoldPass<'_> {
    fn transform(&mut self, file: &mut SourceFile) {
        if self.define_table.is_empty() {
            return;
        }
        let before = self.folded;
        self.visit_source_file(file);
        if self.folded > before {
            debug!(
                file = %file.file_name,
                folded = self.folded - before,
                "folded define references"
            );
        }
    }
}

impl VisitMut for ConstantFoldPass<'_> {
    fn visit_expr(&mut self, expr: &mut Expr) {
        match expr {
            Expr::Ident(ident) => {
                if let Some(literal) = self.replacement(ident) {
                    *expr = literal;
                    self.folded += 1;
                }
            }
            Expr::Assign(assign) => {
                self.visit_assign_target(&mut assign.left);
                self.visit_expr(&mut assign.right);
            }
            Expr::Update(update) => self.visit_assign_target(&mut update.arg),
            Expr::Member(member) => {
                let folded = match member.object.as_ref() {
                    Expr::Ident(ident) => self.replacement(ident),
                    _ => None,
                };
                match folded {
                    Some(literal) => {
                        *member.object = Expr::Paren(Box::new(literal));
                        self.folded += 1;
                    }
                    None => self.visit_expr(&mut member.object),
                }
                if let MemberProp::Computed(prop) = &mut member.prop {
                    self.visit_expr(prop);
                }
            }
            Expr::TaggedTemplate(tagged) => {
                if !matches!(tagged.tag.as_ref(), Expr::Ident(_)) {
                    self.visit_expr(&mut tagged.tag);
                }
                for expr in &mut tagged.template.exprs {
                    self.visit_expr(expr);
                }
            }
            _ => walk_expr(self, expr),
        }
    }

    fn visit_call_expr(&mut self, call: &mut CallExpr) {
        // A bare callee is never folded; `X.run()` still folds `X`.
        if let Callee::Expr(callee) = &mut call.callee
            && !matches!(callee.as_ref(), Expr::Ident(_))
        {
            self.visit_expr(callee);
        }
        for arg in &mut call.args {
            self.visit_expr(arg);
        }
    }

    fn visit_prop(&mut self, prop: &mut Prop) {
        if let Prop::Shorthand(ident) = prop
            && let Some(value) = self.replacement(ident)
        {
            let key = PropName::Ident(IdentName {
                name: ident.name.clone(),
                span: ident.span,
            });
            *prop = Prop::KeyValue { key, value };
            self.folded += 1;
            return;
        }
        walk_prop(self, prop);
    }
}
