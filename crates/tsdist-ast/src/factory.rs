//! Node constructors.
//!
//! Synthesized nodes get fresh [`NodeId`]s and dummy spans.

use crate::ast::*;
use tsdist_common::Span;

pub fn ident(name: impl Into<String>) -> Ident {
    Ident {
        id: NodeId::fresh(),
        name: name.into(),
        span: Span::DUMMY,
    }
}

pub fn ident_name(name: impl Into<String>) -> IdentName {
    IdentName {
        name: name.into(),
        span: Span::DUMMY,
    }
}

pub fn str_lit(value: impl Into<String>) -> StrLit {
    StrLit {
        value: value.into(),
        single_quote: false,
        span: Span::DUMMY,
    }
}

pub fn ident_expr(name: impl Into<String>) -> Expr {
    Expr::Ident(ident(name))
}

pub fn str_expr(value: impl Into<String>) -> Expr {
    Expr::Lit(Lit::Str(str_lit(value)))
}

pub fn num_expr(value: f64) -> Expr {
    Expr::Lit(Lit::Num(NumLit { value, raw: None }))
}

pub fn bool_expr(value: bool) -> Expr {
    Expr::Lit(Lit::Bool(value))
}

pub fn null_expr() -> Expr {
    Expr::Lit(Lit::Null)
}

pub fn regex_expr(pattern: impl Into<String>, flags: impl Into<String>) -> Expr {
    Expr::Lit(Lit::Regex(RegexLit {
        pattern: pattern.into(),
        flags: flags.into(),
    }))
}

pub fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call(CallExpr {
        callee: Callee::Expr(Box::new(callee)),
        type_args: Vec::new(),
        args,
        optional: false,
    })
}

pub fn dynamic_import(specifier: impl Into<String>) -> Expr {
    Expr::Call(CallExpr {
        callee: Callee::Import,
        type_args: Vec::new(),
        args: vec![str_expr(specifier)],
        optional: false,
    })
}

pub fn require(specifier: impl Into<String>) -> Expr {
    call(ident_expr("require"), vec![str_expr(specifier)])
}

pub fn new_expr(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::New(NewExpr {
        callee: Box::new(callee),
        type_args: Vec::new(),
        args: Some(args),
    })
}

pub fn member(object: Expr, prop: impl Into<String>) -> Expr {
    Expr::Member(MemberExpr {
        object: Box::new(object),
        prop: MemberProp::Ident(ident_name(prop)),
        optional: false,
    })
}

pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary(BinaryExpr {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn assign(left: Expr, right: Expr) -> Expr {
    Expr::Assign(AssignExpr {
        op: AssignOp::Assign,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn binding(name: impl Into<String>, type_ann: Option<TypeNode>) -> Pat {
    Pat::Ident(BindingIdent {
        ident: ident(name),
        optional: false,
        type_ann,
    })
}

pub fn param(name: impl Into<String>, type_ann: Option<TypeNode>) -> Param {
    Param {
        modifiers: ModifierFlags::empty(),
        pat: binding(name, type_ann),
    }
}

pub fn keyword_type(keyword: KeywordType) -> TypeNode {
    TypeNode::Keyword(keyword)
}

pub fn type_ref(name: impl Into<String>) -> TypeNode {
    TypeNode::Reference(TypeRef {
        name: name.into(),
        type_args: Vec::new(),
    })
}

pub fn var(kind: VarKind, name: impl Into<String>, init: Option<Expr>) -> Stmt {
    Stmt::Var(VarDecl {
        modifiers: ModifierFlags::empty(),
        kind,
        decls: vec![VarDeclarator {
            name: binding(name, None),
            init,
            definite: false,
        }],
    })
}

/// `declare const <name>: <type>;`
pub fn declare_const(name: impl Into<String>, type_ann: TypeNode) -> Stmt {
    Stmt::Var(VarDecl {
        modifiers: ModifierFlags::DECLARE,
        kind: VarKind::Const,
        decls: vec![VarDeclarator {
            name: binding(name, Some(type_ann)),
            init: None,
            definite: false,
        }],
    })
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr(expr)
}

pub fn block(stmts: Vec<Stmt>) -> BlockStmt {
    BlockStmt { stmts }
}

pub fn function_decl(
    modifiers: ModifierFlags,
    name: impl Into<String>,
    params: Vec<Param>,
    body: Option<Vec<Stmt>>,
) -> Stmt {
    Stmt::Function(FnDecl {
        modifiers,
        ident: ident(name),
        function: Function {
            params,
            body: body.map(block),
            ..Function::default()
        },
    })
}

pub fn arrow(params: Vec<Param>, body: Expr) -> Expr {
    Expr::Arrow(ArrowExpr {
        params,
        body: ArrowBody::Expr(Box::new(body)),
        is_async: false,
        type_params: Vec::new(),
        return_type: None,
    })
}

pub fn import_default(local: impl Into<String>, specifier: impl Into<String>) -> Stmt {
    Stmt::Import(ImportDecl {
        type_only: false,
        default: Some(ident(local)),
        namespace: None,
        named: Vec::new(),
        specifier: str_lit(specifier),
    })
}

pub fn import_namespace(local: impl Into<String>, specifier: impl Into<String>) -> Stmt {
    Stmt::Import(ImportDecl {
        type_only: false,
        default: None,
        namespace: Some(ident(local)),
        named: Vec::new(),
        specifier: str_lit(specifier),
    })
}

pub fn import_named(names: &[&str], specifier: impl Into<String>) -> Stmt {
    Stmt::Import(ImportDecl {
        type_only: false,
        default: None,
        namespace: None,
        named: names
            .iter()
            .map(|name| ImportSpecifier {
                imported: None,
                local: ident(*name),
                type_only: false,
            })
            .collect(),
        specifier: str_lit(specifier),
    })
}

pub fn export_all(source: impl Into<String>) -> Stmt {
    Stmt::ExportAll(ExportAll {
        type_only: false,
        alias: None,
        source: str_lit(source),
    })
}

pub fn export_named_from(names: &[&str], source: impl Into<String>) -> Stmt {
    Stmt::ExportNamed(ExportNamed {
        type_only: false,
        specifiers: names
            .iter()
            .map(|name| ExportSpecifier {
                local: ident_name(*name),
                exported: None,
                type_only: false,
            })
            .collect(),
        source: Some(str_lit(source)),
    })
}

pub fn import_equals(local: impl Into<String>, specifier: impl Into<String>) -> Stmt {
    Stmt::ImportEquals(ImportEqualsDecl {
        modifiers: ModifierFlags::empty(),
        type_only: false,
        ident: ident(local),
        reference: ModuleReference::External(str_lit(specifier)),
    })
}

/// `import("<specifier>").<qualifier>`
pub fn import_type(specifier: impl Into<String>, qualifier: Option<&str>) -> TypeNode {
    TypeNode::Import(ImportType {
        is_typeof: false,
        argument: str_lit(specifier),
        qualifier: qualifier.map(str::to_string),
        type_args: Vec::new(),
    })
}
