//! Lexical binder for tsdist source trees.
//!
//! Builds symbol tables over a set of [`SourceFile`]s and answers the
//! [`Checker`] queries emit-time transforms make:
//!
//! - `var` is function scoped, `let`/`const`/`class`/`function` in blocks are
//!   block scoped, parameters and catch bindings live in their own scopes
//! - script files (no imports or exports) and `declare global` blocks
//!   contribute to one global scope shared by every file
//! - same-named declarations in one scope merge into one symbol
//! - value references only resolve to symbols with a value declaration

use rustc_hash::FxHashMap;
use tracing::debug;
use tsdist_ast::*;

#[derive(Debug, Clone)]
struct SymbolData {
    name: String,
    declarations: Vec<Declaration>,
}

/// Result of binding: symbols plus the identifier-to-symbol map.
#[derive(Debug, Clone, Default)]
pub struct BoundProgram {
    symbols: Vec<SymbolData>,
    references: FxHashMap<NodeId, SymbolId>,
}

impl BoundProgram {
    pub fn symbol_name(&self, symbol: SymbolId) -> Option<&str> {
        self.symbols
            .get(symbol.0 as usize)
            .map(|data| data.name.as_str())
    }

    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    fn alloc_symbol(&mut self, name: &str) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(SymbolData {
            name: name.to_string(),
            declarations: Vec::new(),
        });
        id
    }
}

impl Checker for BoundProgram {
    fn symbol_at_location(&self, ident: &Ident) -> Option<SymbolId> {
        self.references.get(&ident.id).copied()
    }

    fn declarations_of(&self, symbol: SymbolId) -> &[Declaration] {
        self.symbols
            .get(symbol.0 as usize)
            .map(|data| data.declarations.as_slice())
            .unwrap_or(&[])
    }
}

/// Bind every file of a program against one shared global scope.
pub fn bind_program(files: &[SourceFile]) -> BoundProgram {
    let mut binder = Binder::new();
    for file in files {
        binder.declare_globals(file);
    }
    for file in files {
        binder.bind_file(file);
    }
    let program = binder.program;
    debug!(
        files = files.len(),
        symbols = program.symbols.len(),
        references = program.references.len(),
        "bound program"
    );
    program
}

pub fn bind_file(file: &SourceFile) -> BoundProgram {
    bind_program(std::slice::from_ref(file))
}

#[derive(Debug, Default)]
struct Scope {
    names: FxHashMap<String, SymbolId>,
}

struct Binder {
    program: BoundProgram,
    /// `scopes[0]` is the global scope and outlives every file.
    scopes: Vec<Scope>,
    ambient_depth: u32,
    in_declaration_file: bool,
}

impl Binder {
    fn new() -> Self {
        Binder {
            program: BoundProgram::default(),
            scopes: vec![Scope::default()],
            ambient_depth: 0,
            in_declaration_file: false,
        }
    }

    fn declare_globals(&mut self, file: &SourceFile) {
        self.in_declaration_file = file.is_declaration_file;
        if file.is_external_module() {
            for stmt in &file.statements {
                if let Stmt::Module(decl) = stmt
                    && decl.kind == ModuleDeclKind::Global
                    && let Some(body) = &decl.body
                {
                    self.ambient_depth += 1;
                    self.hoist_function_scope(body);
                    self.ambient_depth -= 1;
                }
            }
        } else {
            self.hoist_function_scope(&file.statements);
        }
    }

    fn bind_file(&mut self, file: &SourceFile) {
        self.in_declaration_file = file.is_declaration_file;
        if file.is_external_module() {
            self.with_scope(|this| {
                this.hoist_function_scope(&file.statements);
                this.bind_stmts(&file.statements);
            });
        } else {
            // Top-level names were declared into the global scope already.
            self.bind_stmts(&file.statements);
        }
    }

    fn with_scope<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.scopes.push(Scope::default());
        let result = f(self);
        self.scopes.pop();
        result
    }

    fn declare(&mut self, ident: &Ident, kind: DeclarationKind, declare_modifier: bool) {
        let ambient = declare_modifier || self.ambient_depth > 0 || self.in_declaration_file;
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        let symbol = match scope.names.get(&ident.name) {
            Some(&symbol) => symbol,
            None => {
                let symbol = self.program.alloc_symbol(&ident.name);
                scope.names.insert(ident.name.clone(), symbol);
                symbol
            }
        };
        if let Some(data) = self.program.symbols.get_mut(symbol.0 as usize) {
            data.declarations.push(Declaration {
                kind,
                name: ident.name.clone(),
                ambient,
            });
        }
        self.program.references.insert(ident.id, symbol);
    }

    fn declare_pat(&mut self, pat: &Pat, kind: DeclarationKind, declare_modifier: bool) {
        for ident in pat.binding_idents() {
            self.declare(ident, kind, declare_modifier);
        }
    }

    fn resolve(&mut self, ident: &Ident) {
        for scope in self.scopes.iter().rev() {
            let Some(&symbol) = scope.names.get(&ident.name) else {
                continue;
            };
            let has_value = self
                .program
                .symbols
                .get(symbol.0 as usize)
                .is_some_and(|data| data.declarations.iter().any(|d| d.kind.has_value()));
            if has_value {
                self.program.references.insert(ident.id, symbol);
                return;
            }
        }
    }

    // -----------------------------------------------------------------------
    // Hoisting
    // -----------------------------------------------------------------------

    fn hoist_function_scope(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.hoist_vars(stmt);
        }
        self.hoist_block_scope(stmts);
    }

    fn hoist_vars(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Var(var) if var.kind == VarKind::Var => self.declare_var_decl(var),
            Stmt::Block(block) => self.hoist_vars_in(&block.stmts),
            Stmt::If(if_stmt) => {
                self.hoist_vars(&if_stmt.cons);
                if let Some(alt) = &if_stmt.alt {
                    self.hoist_vars(alt);
                }
            }
            Stmt::For(for_stmt) => {
                if let Some(ForHead::Var(var)) = &for_stmt.init
                    && var.kind == VarKind::Var
                {
                    self.declare_var_decl(var);
                }
                self.hoist_vars(&for_stmt.body);
            }
            Stmt::ForIn(ForInStmt { left, body, .. }) | Stmt::ForOf(ForOfStmt { left, body, .. }) => {
                if let ForHead::Var(var) = left
                    && var.kind == VarKind::Var
                {
                    self.declare_var_decl(var);
                }
                self.hoist_vars(body);
            }
            Stmt::While(WhileStmt { body, .. }) | Stmt::DoWhile(DoWhileStmt { body, .. }) => {
                self.hoist_vars(body)
            }
            Stmt::Labeled(labeled) => self.hoist_vars(&labeled.body),
            Stmt::Try(try_stmt) => {
                self.hoist_vars_in(&try_stmt.block.stmts);
                if let Some(handler) = &try_stmt.handler {
                    self.hoist_vars_in(&handler.body.stmts);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.hoist_vars_in(&finalizer.stmts);
                }
            }
            Stmt::Switch(switch) => {
                for case in &switch.cases {
                    self.hoist_vars_in(&case.body);
                }
            }
            _ => {}
        }
    }

    fn hoist_vars_in(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.hoist_vars(stmt);
        }
    }

    fn declare_var_decl(&mut self, var: &VarDecl) {
        let declare_modifier = var.modifiers.contains(ModifierFlags::DECLARE);
        for decl in &var.decls {
            self.declare_pat(&decl.name, DeclarationKind::Variable, declare_modifier);
        }
    }

    fn hoist_block_scope(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.hoist_lexical(stmt);
        }
    }

    fn hoist_lexical(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Var(var) if var.kind != VarKind::Var => self.declare_var_decl(var),
            Stmt::Function(decl) => self.declare(
                &decl.ident,
                DeclarationKind::Function,
                decl.modifiers.contains(ModifierFlags::DECLARE),
            ),
            Stmt::Class(decl) => self.declare(
                &decl.ident,
                DeclarationKind::Class,
                decl.modifiers.contains(ModifierFlags::DECLARE),
            ),
            Stmt::Enum(decl) => self.declare(
                &decl.ident,
                DeclarationKind::Enum,
                decl.modifiers.contains(ModifierFlags::DECLARE),
            ),
            Stmt::Interface(decl) => self.declare(
                &decl.ident,
                DeclarationKind::Interface,
                decl.modifiers.contains(ModifierFlags::DECLARE),
            ),
            Stmt::TypeAlias(decl) => self.declare(
                &decl.ident,
                DeclarationKind::TypeAlias,
                decl.modifiers.contains(ModifierFlags::DECLARE),
            ),
            Stmt::Module(decl) => {
                if let ModuleName::Ident(ident) = &decl.name
                    && decl.kind != ModuleDeclKind::Global
                {
                    self.declare(
                        ident,
                        DeclarationKind::Module,
                        decl.modifiers.contains(ModifierFlags::DECLARE),
                    );
                }
            }
            Stmt::Import(import) => {
                for local in import
                    .default
                    .iter()
                    .chain(import.namespace.iter())
                    .chain(import.named.iter().map(|spec| &spec.local))
                {
                    self.declare(local, DeclarationKind::Alias, false);
                }
            }
            Stmt::ImportEquals(import) => {
                self.declare(&import.ident, DeclarationKind::Alias, false)
            }
            Stmt::ExportDefault(Expr::Function(FnExpr {
                ident: Some(ident), ..
            })) => self.declare(ident, DeclarationKind::Function, false),
            Stmt::ExportDefault(Expr::Class(ClassExpr {
                ident: Some(ident), ..
            })) => self.declare(ident, DeclarationKind::Class, false),
            _ => {}
        }
    }

    // -----------------------------------------------------------------------
    // Reference resolution
    // -----------------------------------------------------------------------

    fn bind_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.bind_stmt(stmt);
        }
    }

    fn bind_block(&mut self, block: &BlockStmt) {
        self.with_scope(|this| {
            this.hoist_block_scope(&block.stmts);
            this.bind_stmts(&block.stmts);
        });
    }

    fn bind_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.bind_block(block),
            Stmt::Empty | Stmt::Debugger | Stmt::Break(_) | Stmt::Continue(_) => {}
            Stmt::Expr(expr)
            | Stmt::Throw(expr)
            | Stmt::ExportAssignment(expr)
            | Stmt::Return(Some(expr)) => self.bind_expr(expr),
            Stmt::Return(None) => {}
            Stmt::ExportDefault(expr) => match expr {
                Expr::Function(fn_expr) => self.bind_function(&fn_expr.function),
                Expr::Class(class_expr) => self.bind_class(&class_expr.class),
                other => self.bind_expr(other),
            },
            Stmt::Var(var) => self.bind_var_decl(var),
            Stmt::Function(decl) => self.bind_function(&decl.function),
            Stmt::Class(decl) => self.bind_class(&decl.class),
            Stmt::Enum(decl) => {
                for member in &decl.members {
                    if let Some(init) = &member.init {
                        self.bind_expr(init);
                    }
                }
            }
            Stmt::Module(decl) => self.bind_module(decl),
            Stmt::Interface(_)
            | Stmt::TypeAlias(_)
            | Stmt::Import(_)
            | Stmt::ImportEquals(_)
            | Stmt::ExportNamed(_)
            | Stmt::ExportAll(_) => {}
            Stmt::If(if_stmt) => {
                self.bind_expr(&if_stmt.test);
                self.bind_stmt(&if_stmt.cons);
                if let Some(alt) = &if_stmt.alt {
                    self.bind_stmt(alt);
                }
            }
            Stmt::For(for_stmt) => self.with_scope(|this| {
                if let Some(init) = &for_stmt.init {
                    this.bind_for_head(init);
                }
                if let Some(test) = &for_stmt.test {
                    this.bind_expr(test);
                }
                if let Some(update) = &for_stmt.update {
                    this.bind_expr(update);
                }
                this.bind_stmt(&for_stmt.body);
            }),
            Stmt::ForIn(ForInStmt { left, right, body })
            | Stmt::ForOf(ForOfStmt {
                left, right, body, ..
            }) => self.with_scope(|this| {
                this.bind_expr(right);
                this.bind_for_head(left);
                this.bind_stmt(body);
            }),
            Stmt::While(while_stmt) => {
                self.bind_expr(&while_stmt.test);
                self.bind_stmt(&while_stmt.body);
            }
            Stmt::DoWhile(do_while) => {
                self.bind_stmt(&do_while.body);
                self.bind_expr(&do_while.test);
            }
            Stmt::Try(try_stmt) => {
                self.bind_block(&try_stmt.block);
                if let Some(handler) = &try_stmt.handler {
                    self.with_scope(|this| {
                        if let Some(param) = &handler.param {
                            this.declare_pat(param, DeclarationKind::CatchBinding, false);
                            this.bind_pat_defaults(param);
                        }
                        this.hoist_block_scope(&handler.body.stmts);
                        this.bind_stmts(&handler.body.stmts);
                    });
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.bind_block(finalizer);
                }
            }
            Stmt::Switch(switch) => {
                self.bind_expr(&switch.discriminant);
                self.with_scope(|this| {
                    for case in &switch.cases {
                        this.hoist_block_scope(&case.body);
                    }
                    for case in &switch.cases {
                        if let Some(test) = &case.test {
                            this.bind_expr(test);
                        }
                        this.bind_stmts(&case.body);
                    }
                });
            }
            Stmt::Labeled(labeled) => self.bind_stmt(&labeled.body),
        }
    }

    fn bind_for_head(&mut self, head: &ForHead) {
        match head {
            ForHead::Var(var) => {
                if var.kind != VarKind::Var {
                    self.declare_var_decl(var);
                }
                self.bind_var_decl(var);
            }
            ForHead::Expr(expr) => self.bind_expr(expr),
        }
    }

    fn bind_var_decl(&mut self, var: &VarDecl) {
        for decl in &var.decls {
            self.bind_pat_defaults(&decl.name);
            if let Some(init) = &decl.init {
                self.bind_expr(init);
            }
        }
    }

    fn bind_module(&mut self, decl: &ModuleDecl) {
        if decl.kind == ModuleDeclKind::Global {
            return;
        }
        let Some(body) = &decl.body else {
            return;
        };
        let ambient = decl.modifiers.contains(ModifierFlags::DECLARE);
        if ambient {
            self.ambient_depth += 1;
        }
        self.with_scope(|this| {
            this.hoist_function_scope(body);
            this.bind_stmts(body);
        });
        if ambient {
            self.ambient_depth -= 1;
        }
    }

    fn bind_params(&mut self, params: &[Param]) {
        for param in params {
            self.declare_pat(&param.pat, DeclarationKind::Parameter, false);
        }
        for param in params {
            self.bind_pat_defaults(&param.pat);
        }
    }

    fn bind_function(&mut self, function: &Function) {
        self.with_scope(|this| {
            this.bind_params(&function.params);
            if let Some(body) = &function.body {
                this.hoist_function_scope(&body.stmts);
                this.bind_stmts(&body.stmts);
            }
        });
    }

    /// Named function and class expressions see their own name.
    fn bind_named_expr(&mut self, ident: &Ident, kind: DeclarationKind, bind: impl FnOnce(&mut Self)) {
        self.with_scope(|this| {
            this.declare(ident, kind, false);
            bind(this);
        });
    }

    fn bind_class(&mut self, class: &Class) {
        if let Some(super_class) = &class.super_class {
            self.bind_expr(super_class);
        }
        for member in &class.members {
            match member {
                ClassMember::Constructor(ctor) => self.with_scope(|this| {
                    this.bind_params(&ctor.params);
                    if let Some(body) = &ctor.body {
                        this.hoist_function_scope(&body.stmts);
                        this.bind_stmts(&body.stmts);
                    }
                }),
                ClassMember::Method(method) => {
                    self.bind_prop_name(&method.key);
                    self.bind_function(&method.function);
                }
                ClassMember::Property(prop) => {
                    self.bind_prop_name(&prop.key);
                    if let Some(value) = &prop.value {
                        self.bind_expr(value);
                    }
                }
                ClassMember::IndexSignature(_) => {}
                ClassMember::StaticBlock(block) => self.with_scope(|this| {
                    this.hoist_function_scope(&block.stmts);
                    this.bind_stmts(&block.stmts);
                }),
            }
        }
    }

    fn bind_prop_name(&mut self, name: &PropName) {
        if let PropName::Computed(expr) = name {
            self.bind_expr(expr);
        }
    }

    fn bind_pat_defaults(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(_) => {}
            Pat::Array(array) => {
                for elem in array.elems.iter().flatten() {
                    self.bind_pat_defaults(elem);
                }
            }
            Pat::Object(object) => {
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::KeyValue { key, value } => {
                            self.bind_prop_name(key);
                            self.bind_pat_defaults(value);
                        }
                        ObjectPatProp::Shorthand { default, .. } => {
                            if let Some(default) = default {
                                self.bind_expr(default);
                            }
                        }
                        ObjectPatProp::Rest(rest) => self.bind_pat_defaults(&rest.arg),
                    }
                }
            }
            Pat::Rest(rest) => self.bind_pat_defaults(&rest.arg),
            Pat::Assign(assign) => {
                self.bind_pat_defaults(&assign.left);
                self.bind_expr(&assign.right);
            }
        }
    }

    fn bind_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::This | Expr::Super | Expr::Lit(_) | Expr::Raw(_) => {}
            Expr::Ident(ident) => self.resolve(ident),
            Expr::Template(template) => self.bind_exprs(&template.exprs),
            Expr::TaggedTemplate(tagged) => {
                self.bind_expr(&tagged.tag);
                self.bind_exprs(&tagged.template.exprs);
            }
            Expr::Array(elems) => {
                for elem in elems.iter().flatten() {
                    self.bind_expr(elem);
                }
            }
            Expr::Object(props) => {
                for prop in props {
                    match prop {
                        Prop::KeyValue { key, value } => {
                            self.bind_prop_name(key);
                            self.bind_expr(value);
                        }
                        Prop::Shorthand(ident) => self.resolve(ident),
                        Prop::Method { key, function, .. } => {
                            self.bind_prop_name(key);
                            self.bind_function(function);
                        }
                        Prop::Spread(expr) => self.bind_expr(expr),
                    }
                }
            }
            Expr::Function(fn_expr) => match &fn_expr.ident {
                Some(ident) => self.bind_named_expr(ident, DeclarationKind::Function, |this| {
                    this.bind_function(&fn_expr.function)
                }),
                None => self.bind_function(&fn_expr.function),
            },
            Expr::Arrow(arrow) => self.with_scope(|this| {
                this.bind_params(&arrow.params);
                match &arrow.body {
                    ArrowBody::Block(block) => {
                        this.hoist_function_scope(&block.stmts);
                        this.bind_stmts(&block.stmts);
                    }
                    ArrowBody::Expr(body) => this.bind_expr(body),
                }
            }),
            Expr::Class(class_expr) => match &class_expr.ident {
                Some(ident) => self.bind_named_expr(ident, DeclarationKind::Class, |this| {
                    this.bind_class(&class_expr.class)
                }),
                None => self.bind_class(&class_expr.class),
            },
            Expr::Unary(unary) => self.bind_expr(&unary.arg),
            Expr::Update(update) => self.bind_expr(&update.arg),
            Expr::Binary(binary) => {
                self.bind_expr(&binary.left);
                self.bind_expr(&binary.right);
            }
            Expr::Assign(assign) => {
                self.bind_expr(&assign.left);
                self.bind_expr(&assign.right);
            }
            Expr::Cond(cond) => {
                self.bind_expr(&cond.test);
                self.bind_expr(&cond.cons);
                self.bind_expr(&cond.alt);
            }
            Expr::Call(call) => {
                if let Callee::Expr(callee) = &call.callee {
                    self.bind_expr(callee);
                }
                self.bind_exprs(&call.args);
            }
            Expr::New(new_expr) => {
                self.bind_expr(&new_expr.callee);
                if let Some(args) = &new_expr.args {
                    self.bind_exprs(args);
                }
            }
            Expr::Member(member) => {
                self.bind_expr(&member.object);
                if let MemberProp::Computed(prop) = &member.prop {
                    self.bind_expr(prop);
                }
            }
            Expr::Seq(exprs) => self.bind_exprs(exprs),
            Expr::Paren(inner) | Expr::Spread(inner) | Expr::Await(inner) | Expr::NonNull(inner) => {
                self.bind_expr(inner)
            }
            Expr::Yield(yield_expr) => {
                if let Some(arg) = &yield_expr.arg {
                    self.bind_expr(arg);
                }
            }
            Expr::As(as_expr) | Expr::Satisfies(as_expr) => self.bind_expr(&as_expr.expr),
        }
    }

    fn bind_exprs(&mut self, exprs: &[Expr]) {
        for expr in exprs {
            self.bind_expr(expr);
        }
    }
}
