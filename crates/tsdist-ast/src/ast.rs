//! Node definitions.
//!
//! Identifiers that can be bound by a checker are [`Ident`]s and carry a
//! [`NodeId`]. Names that never participate in binding (property keys,
//! member names, export specifier names) are [`IdentName`]s.

use bitflags::bitflags;
use std::sync::atomic::{AtomicU32, Ordering};
use tsdist_common::Span;

/// Identity of a bindable node, stable across clones of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

static NEXT_NODE_ID: AtomicU32 = AtomicU32::new(1);

impl NodeId {
    pub const DUMMY: NodeId = NodeId(0);

    /// Allocate a process-unique id.
    pub fn fresh() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ModifierFlags: u16 {
        const EXPORT = 1 << 0;
        const DEFAULT = 1 << 1;
        const DECLARE = 1 << 2;
        const ASYNC = 1 << 3;
        const CONST = 1 << 4;
        const ABSTRACT = 1 << 5;
        const READONLY = 1 << 6;
        const STATIC = 1 << 7;
        const PUBLIC = 1 << 8;
        const PRIVATE = 1 << 9;
        const PROTECTED = 1 << 10;
        const OVERRIDE = 1 << 11;
        const ACCESSIBILITY = Self::PUBLIC.bits() | Self::PRIVATE.bits() | Self::PROTECTED.bits();
        /// Modifiers that turn a constructor parameter into a class property.
        const PARAMETER_PROPERTY = Self::ACCESSIBILITY.bits() | Self::READONLY.bits() | Self::OVERRIDE.bits();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub file_name: String,
    pub statements: Vec<Stmt>,
    pub is_declaration_file: bool,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>, statements: Vec<Stmt>) -> Self {
        let file_name = file_name.into();
        let is_declaration_file = file_name.ends_with(".d.ts");
        SourceFile {
            file_name,
            statements,
            is_declaration_file,
        }
    }

    /// A file is an external module when it imports or exports anything.
    pub fn is_external_module(&self) -> bool {
        self.statements.iter().any(|stmt| match stmt {
            Stmt::Import(_)
            | Stmt::ExportNamed(_)
            | Stmt::ExportAll(_)
            | Stmt::ExportDefault(_)
            | Stmt::ExportAssignment(_) => true,
            Stmt::ImportEquals(import) => {
                matches!(import.reference, ModuleReference::External(_))
                    || import.modifiers.contains(ModifierFlags::EXPORT)
            }
            other => other.modifiers().contains(ModifierFlags::EXPORT),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub id: NodeId,
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdentName {
    pub name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrLit {
    pub value: String,
    pub single_quote: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NumLit {
    pub value: f64,
    /// Source spelling (`0x1f`, `1e3`), used verbatim when present.
    pub raw: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegexLit {
    pub pattern: String,
    pub flags: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Str(StrLit),
    Num(NumLit),
    BigInt(String),
    Bool(bool),
    Null,
    Regex(RegexLit),
}

// ---------------------------------------------------------------------------
// Statements
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(BlockStmt),
    Empty,
    Debugger,
    Expr(Expr),
    Var(VarDecl),
    Function(FnDecl),
    Class(ClassDecl),
    Interface(InterfaceDecl),
    TypeAlias(TypeAliasDecl),
    Enum(EnumDecl),
    Module(ModuleDecl),
    Import(ImportDecl),
    ImportEquals(ImportEqualsDecl),
    ExportNamed(ExportNamed),
    ExportAll(ExportAll),
    /// `export default <expr>`
    ExportDefault(Expr),
    /// `export = <expr>`
    ExportAssignment(Expr),
    If(IfStmt),
    For(ForStmt),
    ForIn(ForInStmt),
    ForOf(ForOfStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    Return(Option<Expr>),
    Throw(Expr),
    Try(TryStmt),
    Switch(SwitchStmt),
    Break(Option<String>),
    Continue(Option<String>),
    Labeled(LabeledStmt),
}

impl Stmt {
    /// Modifiers of a declaration statement; empty for everything else.
    pub fn modifiers(&self) -> ModifierFlags {
        match self {
            Stmt::Var(decl) => decl.modifiers,
            Stmt::Function(decl) => decl.modifiers,
            Stmt::Class(decl) => decl.modifiers,
            Stmt::Interface(decl) => decl.modifiers,
            Stmt::TypeAlias(decl) => decl.modifiers,
            Stmt::Enum(decl) => decl.modifiers,
            Stmt::Module(decl) => decl.modifiers,
            Stmt::ImportEquals(decl) => decl.modifiers,
            _ => ModifierFlags::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlockStmt {
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub modifiers: ModifierFlags,
    pub kind: VarKind,
    pub decls: Vec<VarDeclarator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub name: Pat,
    pub init: Option<Expr>,
    pub definite: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub modifiers: ModifierFlags,
    pub ident: Ident,
    pub function: Function,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub modifiers: ModifierFlags,
    pub ident: Ident,
    pub class: Class,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub modifiers: ModifierFlags,
    pub ident: Ident,
    pub type_params: Vec<TypeParam>,
    pub extends: Vec<TypeNode>,
    pub body: Vec<TypeMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub modifiers: ModifierFlags,
    pub ident: Ident,
    pub type_params: Vec<TypeParam>,
    pub type_ann: TypeNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub modifiers: ModifierFlags,
    pub ident: Ident,
    pub members: Vec<EnumMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumMember {
    pub name: PropName,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleDeclKind {
    Namespace,
    Module,
    Global,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModuleName {
    Ident(Ident),
    Str(StrLit),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl {
    pub modifiers: ModifierFlags,
    pub kind: ModuleDeclKind,
    pub name: ModuleName,
    pub body: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub type_only: bool,
    pub default: Option<Ident>,
    pub namespace: Option<Ident>,
    pub named: Vec<ImportSpecifier>,
    pub specifier: StrLit,
}

impl ImportDecl {
    /// `import "./polyfill"`
    pub fn is_side_effect_only(&self) -> bool {
        self.default.is_none() && self.namespace.is_none() && self.named.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpecifier {
    pub imported: Option<IdentName>,
    pub local: Ident,
    pub type_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModuleReference {
    /// `require("./x")`
    External(StrLit),
    /// `A.B.C`
    Entity(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportEqualsDecl {
    pub modifiers: ModifierFlags,
    pub type_only: bool,
    pub ident: Ident,
    pub reference: ModuleReference,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportNamed {
    pub type_only: bool,
    pub specifiers: Vec<ExportSpecifier>,
    pub source: Option<StrLit>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    pub local: IdentName,
    pub exported: Option<IdentName>,
    pub type_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportAll {
    pub type_only: bool,
    pub alias: Option<IdentName>,
    pub source: StrLit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub test: Expr,
    pub cons: Box<Stmt>,
    pub alt: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForHead {
    Var(VarDecl),
    Expr(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<ForHead>,
    pub test: Option<Expr>,
    pub update: Option<Expr>,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForInStmt {
    pub left: ForHead,
    pub right: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForOfStmt {
    pub is_await: bool,
    pub left: ForHead,
    pub right: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub test: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStmt {
    pub body: Box<Stmt>,
    pub test: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    pub block: BlockStmt,
    pub handler: Option<CatchClause>,
    pub finalizer: Option<BlockStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub param: Option<Pat>,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub discriminant: Expr,
    pub cases: Vec<SwitchCase>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// `None` for `default:`
    pub test: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledStmt {
    pub label: String,
    pub body: Box<Stmt>,
}

// ---------------------------------------------------------------------------
// Functions and classes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Function {
    pub params: Vec<Param>,
    pub body: Option<BlockStmt>,
    pub is_async: bool,
    pub is_generator: bool,
    pub type_params: Vec<TypeParam>,
    pub return_type: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub modifiers: ModifierFlags,
    pub pat: Pat,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Class {
    pub type_params: Vec<TypeParam>,
    pub super_class: Option<Box<Expr>>,
    pub super_type_args: Vec<TypeNode>,
    pub implements: Vec<TypeNode>,
    pub members: Vec<ClassMember>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Getter,
    Setter,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Constructor(Constructor),
    Method(ClassMethod),
    Property(ClassProp),
    IndexSignature(IndexSignature),
    StaticBlock(BlockStmt),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constructor {
    pub modifiers: ModifierFlags,
    pub params: Vec<Param>,
    pub body: Option<BlockStmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassMethod {
    pub modifiers: ModifierFlags,
    pub key: PropName,
    pub kind: MethodKind,
    pub optional: bool,
    pub function: Function,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassProp {
    pub modifiers: ModifierFlags,
    pub key: PropName,
    pub optional: bool,
    pub definite: bool,
    pub type_ann: Option<TypeNode>,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexSignature {
    pub readonly: bool,
    pub param_name: String,
    pub param_type: TypeNode,
    pub type_ann: TypeNode,
}

// ---------------------------------------------------------------------------
// Expressions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    This,
    Super,
    Ident(Ident),
    Lit(Lit),
    /// Source text inserted verbatim.
    Raw(String),
    Template(TemplateLit),
    TaggedTemplate(TaggedTemplate),
    Array(Vec<Option<Expr>>),
    Object(Vec<Prop>),
    Function(FnExpr),
    Arrow(ArrowExpr),
    Class(ClassExpr),
    Unary(UnaryExpr),
    Update(UpdateExpr),
    Binary(BinaryExpr),
    Assign(AssignExpr),
    Cond(CondExpr),
    Call(CallExpr),
    New(NewExpr),
    Member(MemberExpr),
    Seq(Vec<Expr>),
    Paren(Box<Expr>),
    Spread(Box<Expr>),
    Await(Box<Expr>),
    Yield(YieldExpr),
    As(AsExpr),
    Satisfies(AsExpr),
    NonNull(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLit {
    /// Raw text of each quasi; always one more than `exprs`.
    pub quasis: Vec<String>,
    pub exprs: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaggedTemplate {
    pub tag: Box<Expr>,
    pub template: TemplateLit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Prop {
    KeyValue { key: PropName, value: Expr },
    Shorthand(Ident),
    Method {
        key: PropName,
        kind: MethodKind,
        function: Function,
    },
    Spread(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropName {
    Ident(IdentName),
    Str(StrLit),
    Num(NumLit),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnExpr {
    pub ident: Option<Ident>,
    pub function: Function,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    Block(BlockStmt),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrowExpr {
    pub params: Vec<Param>,
    pub body: ArrowBody,
    pub is_async: bool,
    pub type_params: Vec<TypeParam>,
    pub return_type: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassExpr {
    pub ident: Option<Ident>,
    pub class: Class,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Minus,
    Plus,
    Bang,
    Tilde,
    TypeOf,
    Void,
    Delete,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Minus => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Bang => "!",
            UnaryOp::Tilde => "~",
            UnaryOp::TypeOf => "typeof",
            UnaryOp::Void => "void",
            UnaryOp::Delete => "delete",
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(self, UnaryOp::TypeOf | UnaryOp::Void | UnaryOp::Delete)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub arg: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpr {
    pub op: UpdateOp,
    pub prefix: bool,
    pub arg: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    EqEq,
    NotEq,
    EqEqEq,
    NotEqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    LShift,
    RShift,
    ZeroFillRShift,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Exp,
    BitOr,
    BitXor,
    BitAnd,
    LogicalOr,
    LogicalAnd,
    NullishCoalescing,
    In,
    InstanceOf,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::EqEq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::EqEqEq => "===",
            BinaryOp::NotEqEq => "!==",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::LShift => "<<",
            BinaryOp::RShift => ">>",
            BinaryOp::ZeroFillRShift => ">>>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Exp => "**",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::LogicalOr => "||",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::NullishCoalescing => "??",
            BinaryOp::In => "in",
            BinaryOp::InstanceOf => "instanceof",
        }
    }

    /// Binding power; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::NullishCoalescing => 4,
            BinaryOp::LogicalOr => 5,
            BinaryOp::LogicalAnd => 6,
            BinaryOp::BitOr => 7,
            BinaryOp::BitXor => 8,
            BinaryOp::BitAnd => 9,
            BinaryOp::EqEq | BinaryOp::NotEq | BinaryOp::EqEqEq | BinaryOp::NotEqEq => 10,
            BinaryOp::Lt
            | BinaryOp::LtEq
            | BinaryOp::Gt
            | BinaryOp::GtEq
            | BinaryOp::In
            | BinaryOp::InstanceOf => 11,
            BinaryOp::LShift | BinaryOp::RShift | BinaryOp::ZeroFillRShift => 12,
            BinaryOp::Add | BinaryOp::Sub => 13,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 14,
            BinaryOp::Exp => 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    ExpAssign,
    LShiftAssign,
    RShiftAssign,
    ZeroFillRShiftAssign,
    BitOrAssign,
    BitXorAssign,
    BitAndAssign,
    AndAssign,
    OrAssign,
    NullishAssign,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
            AssignOp::ModAssign => "%=",
            AssignOp::ExpAssign => "**=",
            AssignOp::LShiftAssign => "<<=",
            AssignOp::RShiftAssign => ">>=",
            AssignOp::ZeroFillRShiftAssign => ">>>=",
            AssignOp::BitOrAssign => "|=",
            AssignOp::BitXorAssign => "^=",
            AssignOp::BitAndAssign => "&=",
            AssignOp::AndAssign => "&&=",
            AssignOp::OrAssign => "||=",
            AssignOp::NullishAssign => "??=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub op: AssignOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CondExpr {
    pub test: Box<Expr>,
    pub cons: Box<Expr>,
    pub alt: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    Expr(Box<Expr>),
    /// `import(...)`
    Import,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Callee,
    pub type_args: Vec<TypeNode>,
    pub args: Vec<Expr>,
    pub optional: bool,
}

impl CallExpr {
    /// `import("x")` or `require("x")`: the string-literal first argument.
    pub fn module_specifier_mut(&mut self) -> Option<&mut StrLit> {
        let is_module_call = match &self.callee {
            Callee::Import => true,
            Callee::Expr(callee) => {
                matches!(callee.as_ref(), Expr::Ident(ident) if ident.name == "require")
                    && self.args.len() == 1
            }
        };
        if !is_module_call {
            return None;
        }
        match self.args.first_mut() {
            Some(Expr::Lit(Lit::Str(specifier))) => Some(specifier),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    pub callee: Box<Expr>,
    pub type_args: Vec<TypeNode>,
    pub args: Option<Vec<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemberProp {
    Ident(IdentName),
    PrivateName(String),
    Computed(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub prop: MemberProp,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YieldExpr {
    pub arg: Option<Box<Expr>>,
    pub delegate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AsExpr {
    pub expr: Box<Expr>,
    pub type_ann: TypeNode,
}

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Pat {
    Ident(BindingIdent),
    Array(ArrayPat),
    Object(ObjectPat),
    Rest(RestPat),
    Assign(AssignPat),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BindingIdent {
    pub ident: Ident,
    pub optional: bool,
    pub type_ann: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayPat {
    pub elems: Vec<Option<Pat>>,
    pub type_ann: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPat {
    pub props: Vec<ObjectPatProp>,
    pub type_ann: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPatProp {
    KeyValue { key: PropName, value: Pat },
    /// `{ a }` or `{ a = 1 }`
    Shorthand { ident: Ident, default: Option<Expr> },
    Rest(RestPat),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RestPat {
    pub arg: Box<Pat>,
    pub type_ann: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignPat {
    pub left: Box<Pat>,
    pub right: Box<Expr>,
}

impl Pat {
    /// Every identifier bound by this pattern, in source order.
    pub fn binding_idents(&self) -> Vec<&Ident> {
        let mut out = Vec::new();
        collect_binding_idents(self, &mut out);
        out
    }

    pub fn type_ann(&self) -> Option<&TypeNode> {
        match self {
            Pat::Ident(binding) => binding.type_ann.as_ref(),
            Pat::Array(array) => array.type_ann.as_ref(),
            Pat::Object(object) => object.type_ann.as_ref(),
            Pat::Rest(rest) => rest.type_ann.as_ref(),
            Pat::Assign(assign) => assign.left.type_ann(),
        }
    }
}

fn collect_binding_idents<'a>(pat: &'a Pat, out: &mut Vec<&'a Ident>) {
    match pat {
        Pat::Ident(binding) => out.push(&binding.ident),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                collect_binding_idents(elem, out);
            }
        }
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    ObjectPatProp::KeyValue { value, .. } => collect_binding_idents(value, out),
                    ObjectPatProp::Shorthand { ident, .. } => out.push(ident),
                    ObjectPatProp::Rest(rest) => collect_binding_idents(&rest.arg, out),
                }
            }
        }
        Pat::Rest(rest) => collect_binding_idents(&rest.arg, out),
        Pat::Assign(assign) => collect_binding_idents(&assign.left, out),
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordType {
    Any,
    Unknown,
    Number,
    String,
    Boolean,
    BigInt,
    Symbol,
    Object,
    Void,
    Undefined,
    Null,
    Never,
    This,
}

impl KeywordType {
    pub fn as_str(self) -> &'static str {
        match self {
            KeywordType::Any => "any",
            KeywordType::Unknown => "unknown",
            KeywordType::Number => "number",
            KeywordType::String => "string",
            KeywordType::Boolean => "boolean",
            KeywordType::BigInt => "bigint",
            KeywordType::Symbol => "symbol",
            KeywordType::Object => "object",
            KeywordType::Void => "void",
            KeywordType::Undefined => "undefined",
            KeywordType::Null => "null",
            KeywordType::Never => "never",
            KeywordType::This => "this",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeOperatorKind {
    KeyOf,
    Unique,
    Readonly,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Keyword(KeywordType),
    Reference(TypeRef),
    Literal(Lit),
    Array(Box<TypeNode>),
    Tuple(Vec<TypeNode>),
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    Paren(Box<TypeNode>),
    Function(FnType),
    TypeLiteral(Vec<TypeMember>),
    /// `typeof a.b`
    Query(String),
    Operator(TypeOperatorKind, Box<TypeNode>),
    IndexedAccess {
        object: Box<TypeNode>,
        index: Box<TypeNode>,
    },
    Conditional {
        check: Box<TypeNode>,
        extends: Box<TypeNode>,
        true_type: Box<TypeNode>,
        false_type: Box<TypeNode>,
    },
    Import(ImportType),
    /// Type syntax the front end forwards verbatim.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    /// Possibly dotted: `ns.Foo`
    pub name: String,
    pub type_args: Vec<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnType {
    pub is_constructor: bool,
    pub type_params: Vec<TypeParam>,
    pub params: Vec<Param>,
    pub return_type: Box<TypeNode>,
}

/// `import("./mod").Qualifier<Args>`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportType {
    pub is_typeof: bool,
    pub argument: StrLit,
    pub qualifier: Option<String>,
    pub type_args: Vec<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub name: IdentName,
    pub constraint: Option<TypeNode>,
    pub default: Option<TypeNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeMember {
    Property {
        readonly: bool,
        key: PropName,
        optional: bool,
        type_ann: Option<TypeNode>,
    },
    Method {
        key: PropName,
        optional: bool,
        type_params: Vec<TypeParam>,
        params: Vec<Param>,
        return_type: Option<TypeNode>,
    },
    Call {
        type_params: Vec<TypeParam>,
        params: Vec<Param>,
        return_type: Option<TypeNode>,
    },
    Construct {
        type_params: Vec<TypeParam>,
        params: Vec<Param>,
        return_type: Option<TypeNode>,
    },
    Index(IndexSignature),
}
