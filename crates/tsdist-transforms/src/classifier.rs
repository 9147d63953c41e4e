//! Ambient-binding predicate gating constant folding.

use tsdist_ast::{Checker, Declaration, DeclarationKind, Ident};

/// Decides whether an identifier reference may be replaced by a define value.
pub trait SymbolClassifier {
    fn is_ambient_eligible(&self, ident: &Ident) -> bool;
}

impl<F> SymbolClassifier for F
where
    F: Fn(&Ident) -> bool,
{
    fn is_ambient_eligible(&self, ident: &Ident) -> bool {
        self(ident)
    }
}

/// Classifier driven by a front end's [`Checker`].
///
/// A reference is eligible when it resolves to a symbol and every
/// declaration merged into that symbol is eligible on its own.
pub struct CheckerClassifier<'a> {
    checker: &'a dyn Checker,
}

impl<'a> CheckerClassifier<'a> {
    pub fn new(checker: &'a dyn Checker) -> Self {
        CheckerClassifier { checker }
    }
}

impl SymbolClassifier for CheckerClassifier<'_> {
    fn is_ambient_eligible(&self, ident: &Ident) -> bool {
        let Some(symbol) = self.checker.symbol_at_location(ident) else {
            return false;
        };
        let declarations = self.checker.declarations_of(symbol);
        !declarations.is_empty() && declarations.iter().all(is_eligible_declaration)
    }
}

fn is_eligible_declaration(declaration: &Declaration) -> bool {
    match declaration.kind {
        DeclarationKind::Interface | DeclarationKind::TypeAlias => true,
        DeclarationKind::Variable
        | DeclarationKind::Function
        | DeclarationKind::Class
        | DeclarationKind::Enum
        | DeclarationKind::Module => declaration.ambient,
        DeclarationKind::Parameter | DeclarationKind::Alias | DeclarationKind::CatchBinding => {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsdist_ast::SymbolId;
    use tsdist_ast::factory::ident;

    struct FixedChecker {
        declarations: Vec<Declaration>,
    }

    impl Checker for FixedChecker {
        fn symbol_at_location(&self, ident: &Ident) -> Option<SymbolId> {
            (ident.name != "unbound").then_some(SymbolId(0))
        }

        fn declarations_of(&self, _symbol: SymbolId) -> &[Declaration] {
            &self.declarations
        }
    }

    fn decl(kind: DeclarationKind, ambient: bool) -> Declaration {
        Declaration {
            kind,
            name: "X".to_string(),
            ambient,
        }
    }

    fn eligible(declarations: Vec<Declaration>) -> bool {
        let checker = FixedChecker { declarations };
        CheckerClassifier::new(&checker).is_ambient_eligible(&ident("X"))
    }

    #[test]
    fn declared_values_are_eligible() {
        assert!(eligible(vec![decl(DeclarationKind::Variable, true)]));
        assert!(eligible(vec![decl(DeclarationKind::Function, true)]));
        assert!(eligible(vec![decl(DeclarationKind::Module, true)]));
        assert!(!eligible(vec![decl(DeclarationKind::Variable, false)]));
        assert!(!eligible(vec![decl(DeclarationKind::Class, false)]));
    }

    #[test]
    fn type_declarations_are_always_eligible() {
        assert!(eligible(vec![decl(DeclarationKind::Interface, false)]));
        assert!(eligible(vec![decl(DeclarationKind::TypeAlias, false)]));
    }

    #[test]
    fn bindings_are_never_eligible() {
        assert!(!eligible(vec![decl(DeclarationKind::Parameter, true)]));
        assert!(!eligible(vec![decl(DeclarationKind::Alias, true)]));
        assert!(!eligible(vec![decl(DeclarationKind::CatchBinding, false)]));
    }

    #[test]
    fn merged_symbol_needs_every_declaration_eligible() {
        assert!(eligible(vec![
            decl(DeclarationKind::Interface, false),
            decl(DeclarationKind::Variable, true),
        ]));
        assert!(!eligible(vec![
            decl(DeclarationKind::Interface, false),
            decl(DeclarationKind::Variable, false),
        ]));
    }

    #[test]
    fn unresolved_reference_is_not_eligible() {
        let checker = FixedChecker {
            declarations: vec![decl(DeclarationKind::Variable, true)],
        };
        assert!(!CheckerClassifier::new(&checker).is_ambient_eligible(&ident("unbound")));
        assert!(!eligible(Vec::new()));
    }

    #[test]
    fn closures_act_as_classifiers() {
        let only_dev = |ident: &Ident| ident.name == "__DEV__";
        assert!(only_dev.is_ambient_eligible(&ident("__DEV__")));
        assert!(!only_dev.is_ambient_eligible(&ident("X")));
    }
}
