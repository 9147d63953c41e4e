//! The symbol oracle a front end hands to emit-time transforms.
//!
//! Transforms never inspect a front end's internal symbol tables. They ask
//! for the symbol an identifier resolves to and for that symbol's
//! declarations, in declaration order.

use crate::ast::Ident;

/// Opaque symbol handle issued by a [`Checker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Variable,
    Parameter,
    Function,
    Class,
    Enum,
    Module,
    Interface,
    TypeAlias,
    /// Import bindings and `import x = ...` aliases.
    Alias,
    CatchBinding,
}

impl DeclarationKind {
    /// Whether a declaration of this kind introduces a runtime value.
    pub fn has_value(self) -> bool {
        !matches!(self, DeclarationKind::Interface | DeclarationKind::TypeAlias)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
    /// True when a `declare` modifier applies to the declaration, its
    /// enclosing statement, or any enclosing declaration, or when it lives in
    /// a declaration file.
    pub ambient: bool,
}

pub trait Checker {
    /// Symbol an identifier reference resolves to, if any.
    fn symbol_at_location(&self, ident: &Ident) -> Option<SymbolId>;

    /// Declarations merged into `symbol`, first declaration first.
    fn declarations_of(&self, symbol: SymbolId) -> &[Declaration];
}
