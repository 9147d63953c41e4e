//! JavaScript statement printing.
//!
//! Type-only statements are dropped, `declare` statements and overload
//! signatures are erased, enums and instantiated namespaces are lowered to
//! the usual IIFE form, and `export =` becomes `module.exports =`.

use crate::Printer;
use crate::expressions::{PREC_ASSIGN, PREC_MEMBER, needs_statement_parens};
use tsdist_ast::*;

/// Whether `stmt` produces no JavaScript.
pub(crate) fn is_erased_in_code(stmt: &Stmt, in_namespace: bool) -> bool {
    if stmt.modifiers().contains(ModifierFlags::DECLARE) {
        return true;
    }
    match stmt {
        Stmt::Interface(_) | Stmt::TypeAlias(_) => true,
        Stmt::Function(decl) => decl.function.body.is_none(),
        Stmt::Enum(decl) => decl.modifiers.contains(ModifierFlags::CONST),
        Stmt::Module(decl) => match (&decl.name, &decl.body) {
            (ModuleName::Ident(_), Some(body)) if decl.kind != ModuleDeclKind::Global => {
                !is_instantiated(body)
            }
            _ => true,
        },
        Stmt::Import(import) => {
            import.type_only
                || (!import.is_side_effect_only()
                    && import.default.is_none()
                    && import.namespace.is_none()
                    && import.named.iter().all(|spec| spec.type_only))
        }
        Stmt::ImportEquals(import) => import.type_only,
        Stmt::ExportNamed(export) => {
            export.type_only
                || (!export.specifiers.is_empty()
                    && export.specifiers.iter().all(|spec| spec.type_only))
        }
        Stmt::ExportAll(export) => export.type_only,
        Stmt::Var(var) if in_namespace && var.modifiers.contains(ModifierFlags::EXPORT) => var
            .decls
            .iter()
            .all(|decl| matches!(decl.name, Pat::Ident(_)) && decl.init.is_none()),
        _ => false,
    }
}

fn is_instantiated(body: &[Stmt]) -> bool {
    body.iter().any(|stmt| !is_erased_in_code(stmt, true))
}

fn enum_member_key(name: &PropName) -> String {
    match name {
        PropName::Ident(ident) => ident.name.clone(),
        PropName::Str(str_lit) => str_lit.value.clone(),
        PropName::Num(num) => crate::format_number(num.value),
        PropName::Computed(_) => String::new(),
    }
}

/// Value of a numeric-literal enum initializer.
pub(crate) fn const_number(expr: &Expr) -> Option<f64> {
    match expr {
        Expr::Lit(Lit::Num(num)) => Some(num.value),
        Expr::Unary(UnaryExpr {
            op: UnaryOp::Minus,
            arg,
        }) => const_number(arg).map(|value| -value),
        Expr::Paren(inner) => const_number(inner),
        _ => None,
    }
}

fn is_super_call(stmt: &Stmt) -> bool {
    matches!(
        stmt,
        Stmt::Expr(Expr::Call(CallExpr { callee: Callee::Expr(callee), .. }))
            if matches!(callee.as_ref(), Expr::Super)
    )
}

impl Printer {
    fn in_namespace(&self) -> bool {
        !self.namespaces.is_empty()
    }

    pub(crate) fn emit_code_statements(&mut self, stmts: &[Stmt]) {
        let in_namespace = self.in_namespace();
        for stmt in stmts {
            if is_erased_in_code(stmt, in_namespace) {
                continue;
            }
            self.write_indent();
            self.emit_code_stmt(stmt);
            self.write_line();
        }
    }

    pub(crate) fn emit_block(&mut self, block: &BlockStmt) {
        let in_namespace = self.in_namespace();
        if block
            .stmts
            .iter()
            .all(|stmt| is_erased_in_code(stmt, in_namespace))
        {
            self.write("{ }");
            return;
        }
        self.write("{");
        self.write_line();
        self.increase_indent();
        self.emit_code_statements(&block.stmts);
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    /// A statement in the body position of `if`/`for`/`while`.
    fn emit_embedded(&mut self, stmt: &Stmt) {
        if let Stmt::Block(block) = stmt {
            self.write(" ");
            self.emit_block(block);
            return;
        }
        self.write_line();
        self.increase_indent();
        self.write_indent();
        if is_erased_in_code(stmt, self.in_namespace()) {
            self.write(";");
        } else {
            self.emit_code_stmt(stmt);
        }
        self.decrease_indent();
    }

    /// After an embedded statement: continue on the same line after a block,
    /// on a fresh line otherwise.
    fn continue_after_embedded(&mut self, embedded: &Stmt) {
        if matches!(embedded, Stmt::Block(_)) {
            self.write(" ");
        } else {
            self.write_line();
            self.write_indent();
        }
    }

    fn write_export_prefix(&mut self, modifiers: ModifierFlags) {
        if self.in_namespace() {
            return;
        }
        if modifiers.contains(ModifierFlags::EXPORT) {
            self.write("export ");
            if modifiers.contains(ModifierFlags::DEFAULT) {
                self.write("default ");
            }
        }
    }

    /// `NS.name = name;` after an exported declaration inside a namespace.
    fn write_namespace_export(&mut self, modifiers: ModifierFlags, name: &str) {
        if !modifiers.contains(ModifierFlags::EXPORT) {
            return;
        }
        let Some(namespace) = self.namespaces.last().cloned() else {
            return;
        };
        self.write_line();
        self.write_indent();
        self.write(&format!("{namespace}.{name} = {name};"));
    }

    fn emit_code_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(block) => self.emit_block(block),
            Stmt::Empty => self.write(";"),
            Stmt::Debugger => self.write("debugger;"),
            Stmt::Expr(expr) => {
                if needs_statement_parens(expr) {
                    self.write("(");
                    self.emit_expr(expr);
                    self.write(")");
                } else {
                    self.emit_expr(expr);
                }
                self.write(";");
            }
            Stmt::Var(var) => self.emit_var_stmt(var),
            Stmt::Function(decl) => {
                self.write_export_prefix(decl.modifiers);
                self.emit_function_js(Some(&decl.ident.name), &decl.function);
                self.write_namespace_export(decl.modifiers, &decl.ident.name);
            }
            Stmt::Class(decl) => {
                self.write_export_prefix(decl.modifiers);
                self.emit_class_js(Some(&decl.ident.name), &decl.class);
                self.write_namespace_export(decl.modifiers, &decl.ident.name);
            }
            Stmt::Enum(decl) => self.emit_enum_js(decl),
            Stmt::Module(decl) => self.emit_namespace_js(decl),
            Stmt::Interface(_) | Stmt::TypeAlias(_) => {}
            Stmt::Import(import) => self.emit_import_js(import),
            Stmt::ImportEquals(import) => {
                self.write_export_prefix(import.modifiers);
                match &import.reference {
                    ModuleReference::External(specifier) => {
                        self.write("const ");
                        self.write(&import.ident.name);
                        self.write(" = require(");
                        self.write_string_literal(&specifier.value, specifier.single_quote);
                        self.write(");");
                    }
                    ModuleReference::Entity(entity) => {
                        self.write("var ");
                        self.write(&import.ident.name);
                        self.write(" = ");
                        self.write(entity);
                        self.write(";");
                    }
                }
                self.write_namespace_export(import.modifiers, &import.ident.name);
            }
            Stmt::ExportNamed(export) => {
                let specifiers: Vec<&ExportSpecifier> =
                    export.specifiers.iter().filter(|spec| !spec.type_only).collect();
                self.write("export {");
                if !specifiers.is_empty() {
                    self.write(" ");
                    self.write_comma_list(&specifiers, |this, spec| {
                        this.write(&spec.local.name);
                        if let Some(exported) = &spec.exported {
                            this.write(" as ");
                            this.write(&exported.name);
                        }
                    });
                    self.write(" ");
                }
                self.write("}");
                if let Some(source) = &export.source {
                    self.write(" from ");
                    self.write_string_literal(&source.value, source.single_quote);
                }
                self.write(";");
            }
            Stmt::ExportAll(export) => {
                self.write("export * ");
                if let Some(alias) = &export.alias {
                    self.write("as ");
                    self.write(&alias.name);
                    self.write(" ");
                }
                self.write("from ");
                self.write_string_literal(&export.source.value, export.source.single_quote);
                self.write(";");
            }
            Stmt::ExportDefault(expr) => {
                self.write("export default ");
                match expr {
                    Expr::Function(fn_expr) => self.emit_function_js(
                        fn_expr.ident.as_ref().map(|ident| ident.name.as_str()),
                        &fn_expr.function,
                    ),
                    Expr::Class(class_expr) => self.emit_class_js(
                        class_expr.ident.as_ref().map(|ident| ident.name.as_str()),
                        &class_expr.class,
                    ),
                    other => {
                        self.emit_expr_prec(other, PREC_ASSIGN);
                        self.write(";");
                    }
                }
            }
            Stmt::ExportAssignment(expr) => {
                self.write("module.exports = ");
                self.emit_expr_prec(expr, PREC_ASSIGN);
                self.write(";");
            }
            Stmt::If(if_stmt) => {
                self.write("if (");
                self.emit_expr(&if_stmt.test);
                self.write(")");
                self.emit_embedded(&if_stmt.cons);
                if let Some(alt) = &if_stmt.alt {
                    self.continue_after_embedded(&if_stmt.cons);
                    self.write("else");
                    if let Stmt::If(_) = alt.as_ref() {
                        self.write(" ");
                        self.emit_code_stmt(alt);
                    } else {
                        self.emit_embedded(alt);
                    }
                }
            }
            Stmt::For(for_stmt) => {
                self.write("for (");
                if let Some(init) = &for_stmt.init {
                    self.emit_for_head(init);
                }
                self.write(";");
                if let Some(test) = &for_stmt.test {
                    self.write(" ");
                    self.emit_expr(test);
                }
                self.write(";");
                if let Some(update) = &for_stmt.update {
                    self.write(" ");
                    self.emit_expr(update);
                }
                self.write(")");
                self.emit_embedded(&for_stmt.body);
            }
            Stmt::ForIn(for_in) => {
                self.write("for (");
                self.emit_for_head(&for_in.left);
                self.write(" in ");
                self.emit_expr(&for_in.right);
                self.write(")");
                self.emit_embedded(&for_in.body);
            }
            Stmt::ForOf(for_of) => {
                self.write(if for_of.is_await { "for await (" } else { "for (" });
                self.emit_for_head(&for_of.left);
                self.write(" of ");
                self.emit_expr_prec(&for_of.right, PREC_ASSIGN);
                self.write(")");
                self.emit_embedded(&for_of.body);
            }
            Stmt::While(while_stmt) => {
                self.write("while (");
                self.emit_expr(&while_stmt.test);
                self.write(")");
                self.emit_embedded(&while_stmt.body);
            }
            Stmt::DoWhile(do_while) => {
                self.write("do");
                self.emit_embedded(&do_while.body);
                self.continue_after_embedded(&do_while.body);
                self.write("while (");
                self.emit_expr(&do_while.test);
                self.write(");");
            }
            Stmt::Return(arg) => {
                self.write("return");
                if let Some(arg) = arg {
                    self.write(" ");
                    self.emit_expr(arg);
                }
                self.write(";");
            }
            Stmt::Throw(arg) => {
                self.write("throw ");
                self.emit_expr(arg);
                self.write(";");
            }
            Stmt::Try(try_stmt) => {
                self.write("try ");
                self.emit_block(&try_stmt.block);
                if let Some(handler) = &try_stmt.handler {
                    self.write(" catch ");
                    if let Some(param) = &handler.param {
                        self.write("(");
                        self.emit_pat_js(param);
                        self.write(") ");
                    }
                    self.emit_block(&handler.body);
                }
                if let Some(finalizer) = &try_stmt.finalizer {
                    self.write(" finally ");
                    self.emit_block(finalizer);
                }
            }
            Stmt::Switch(switch) => {
                self.write("switch (");
                self.emit_expr(&switch.discriminant);
                self.write(") {");
                self.write_line();
                self.increase_indent();
                for case in &switch.cases {
                    self.write_indent();
                    match &case.test {
                        Some(test) => {
                            self.write("case ");
                            self.emit_expr(test);
                            self.write(":");
                        }
                        None => self.write("default:"),
                    }
                    self.write_line();
                    self.increase_indent();
                    self.emit_code_statements(&case.body);
                    self.decrease_indent();
                }
                self.decrease_indent();
                self.write_indent();
                self.write("}");
            }
            Stmt::Break(label) | Stmt::Continue(label) => {
                self.write(if matches!(stmt, Stmt::Break(_)) { "break" } else { "continue" });
                if let Some(label) = label {
                    self.write(" ");
                    self.write(label);
                }
                self.write(";");
            }
            Stmt::Labeled(labeled) => {
                self.write(&labeled.label);
                self.write(": ");
                self.emit_code_stmt(&labeled.body);
            }
        }
    }

    fn emit_for_head(&mut self, head: &ForHead) {
        match head {
            ForHead::Var(var) => self.emit_var_decl_js(var),
            ForHead::Expr(expr) => self.emit_expr(expr),
        }
    }

    /// `const a = 1, b` without the trailing semicolon.
    fn emit_var_decl_js(&mut self, var: &VarDecl) {
        self.write(var.kind.as_str());
        self.write(" ");
        self.write_comma_list(&var.decls, |this, decl| {
            this.emit_pat_js(&decl.name);
            if let Some(init) = &decl.init {
                this.write(" = ");
                this.emit_expr_prec(init, PREC_ASSIGN);
            }
        });
    }

    fn emit_var_stmt(&mut self, var: &VarDecl) {
        let exported = var.modifiers.contains(ModifierFlags::EXPORT);
        let Some(namespace) = self.namespaces.last().cloned().filter(|_| exported) else {
            self.write_export_prefix(var.modifiers);
            self.emit_var_decl_js(var);
            self.write(";");
            return;
        };
        // Exported namespace members live on the namespace object.
        let mut first = true;
        for decl in &var.decls {
            match &decl.name {
                Pat::Ident(binding) => {
                    let Some(init) = &decl.init else {
                        continue;
                    };
                    if !first {
                        self.write_line();
                        self.write_indent();
                    }
                    self.write(&format!("{namespace}.{} = ", binding.ident.name));
                    self.emit_expr_prec(init, PREC_ASSIGN);
                    self.write(";");
                }
                pattern => {
                    if !first {
                        self.write_line();
                        self.write_indent();
                    }
                    self.write(var.kind.as_str());
                    self.write(" ");
                    self.emit_pat_js(pattern);
                    if let Some(init) = &decl.init {
                        self.write(" = ");
                        self.emit_expr_prec(init, PREC_ASSIGN);
                    }
                    self.write(";");
                    for ident in pattern.binding_idents() {
                        self.write_line();
                        self.write_indent();
                        self.write(&format!("{namespace}.{0} = {0};", ident.name));
                    }
                }
            }
            first = false;
        }
    }

    fn emit_import_js(&mut self, import: &ImportDecl) {
        self.write("import ");
        if import.is_side_effect_only() {
            self.write_string_literal(&import.specifier.value, import.specifier.single_quote);
            self.write(";");
            return;
        }
        let named: Vec<&ImportSpecifier> = import.named.iter().filter(|spec| !spec.type_only).collect();
        let mut wrote_clause = false;
        if let Some(default) = &import.default {
            self.write(&default.name);
            wrote_clause = true;
        }
        if let Some(namespace) = &import.namespace {
            if wrote_clause {
                self.write(", ");
            }
            self.write("* as ");
            self.write(&namespace.name);
            wrote_clause = true;
        }
        if !named.is_empty() {
            if wrote_clause {
                self.write(", ");
            }
            self.write("{ ");
            self.write_comma_list(&named, |this, spec| {
                if let Some(imported) = &spec.imported {
                    this.write(&imported.name);
                    this.write(" as ");
                }
                this.write(&spec.local.name);
            });
            self.write(" }");
        }
        self.write(" from ");
        self.write_string_literal(&import.specifier.value, import.specifier.single_quote);
        self.write(";");
    }

    // -----------------------------------------------------------------------
    // Classes
    // -----------------------------------------------------------------------

    pub(crate) fn emit_class_js(&mut self, name: Option<&str>, class: &Class) {
        self.write("class");
        if let Some(name) = name {
            self.write(" ");
            self.write(name);
        }
        if let Some(super_class) = &class.super_class {
            self.write(" extends ");
            self.emit_expr_prec(super_class, PREC_MEMBER);
        }
        self.write(" {");
        self.write_line();
        self.increase_indent();
        for member in &class.members {
            if is_erased_member(member) {
                continue;
            }
            self.write_indent();
            self.emit_class_member_js(member);
            self.write_line();
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    fn emit_class_member_js(&mut self, member: &ClassMember) {
        match member {
            ClassMember::Constructor(ctor) => self.emit_constructor_js(ctor),
            ClassMember::Method(method) => {
                self.emit_method_js(method.modifiers, &method.key, method.kind, &method.function)
            }
            ClassMember::Property(prop) => {
                if prop.modifiers.contains(ModifierFlags::STATIC) {
                    self.write("static ");
                }
                self.emit_prop_name(&prop.key);
                if let Some(value) = &prop.value {
                    self.write(" = ");
                    self.emit_expr_prec(value, PREC_ASSIGN);
                }
                self.write(";");
            }
            ClassMember::StaticBlock(block) => {
                self.write("static ");
                self.emit_block(block);
            }
            ClassMember::IndexSignature(_) => {}
        }
    }

    fn emit_constructor_js(&mut self, ctor: &Constructor) {
        self.write("constructor");
        self.emit_params_js(&ctor.params);
        self.write(" ");
        let Some(body) = &ctor.body else {
            self.write("{ }");
            return;
        };
        let properties: Vec<&str> = ctor
            .params
            .iter()
            .filter(|param| param.modifiers.intersects(ModifierFlags::PARAMETER_PROPERTY))
            .filter_map(|param| match &param.pat {
                Pat::Ident(binding) => Some(binding.ident.name.as_str()),
                Pat::Assign(assign) => match assign.left.as_ref() {
                    Pat::Ident(binding) => Some(binding.ident.name.as_str()),
                    _ => None,
                },
                _ => None,
            })
            .collect();
        if properties.is_empty() {
            self.emit_block(body);
            return;
        }
        // Parameter properties are assigned right after `super(...)`.
        let split = body
            .stmts
            .iter()
            .position(is_super_call)
            .map_or(0, |index| index + 1);
        self.write("{");
        self.write_line();
        self.increase_indent();
        self.emit_code_statements(&body.stmts[..split]);
        for name in properties {
            self.write_indent();
            self.write(&format!("this.{name} = {name};"));
            self.write_line();
        }
        self.emit_code_statements(&body.stmts[split..]);
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    // -----------------------------------------------------------------------
    // Enums and namespaces
    // -----------------------------------------------------------------------

    /// `var X; (function (X) { ... })(X || (X = {}));`
    fn emit_iife_container(
        &mut self,
        modifiers: ModifierFlags,
        name: &str,
        emit_body: impl FnOnce(&mut Self),
    ) {
        let exported = modifiers.contains(ModifierFlags::EXPORT);
        let parent = self.namespaces.last().cloned();
        match parent {
            Some(_) => self.write("let "),
            None if exported => self.write("export var "),
            None => self.write("var "),
        }
        self.write(name);
        self.write(";");
        self.write_line();
        self.write_indent();
        self.write(&format!("(function ({name}) {{"));
        self.write_line();
        self.increase_indent();
        emit_body(self);
        self.decrease_indent();
        self.write_indent();
        match parent {
            Some(parent) if exported => self.write(&format!(
                "}})({name} = {parent}.{name} || ({parent}.{name} = {{}}));"
            )),
            _ => self.write(&format!("}})({name} || ({name} = {{}}));")),
        }
    }

    fn emit_enum_js(&mut self, decl: &EnumDecl) {
        let name = decl.ident.name.clone();
        self.emit_iife_container(decl.modifiers, &decl.ident.name, |this| {
            let mut next = Some(0.0);
            let mut previous: Option<String> = None;
            for member in &decl.members {
                let key = enum_member_key(&member.name);
                this.write_indent();
                match &member.init {
                    Some(Expr::Lit(Lit::Str(value))) => {
                        this.write(&name);
                        this.write("[");
                        this.write_string_literal(&key, false);
                        this.write("] = ");
                        this.write_string_literal(&value.value, value.single_quote);
                        this.write(";");
                        next = None;
                    }
                    init => {
                        this.write(&format!("{name}[{name}["));
                        this.write_string_literal(&key, false);
                        this.write("] = ");
                        match (init, next, &previous) {
                            (Some(init), _, _) => {
                                this.emit_expr_prec(init, PREC_ASSIGN);
                                next = const_number(init).map(|value| value + 1.0);
                            }
                            (None, Some(value), _) => {
                                this.write(&crate::format_number(value));
                                next = Some(value + 1.0);
                            }
                            (None, None, Some(previous)) => {
                                this.write(&format!("{name}["));
                                this.write_string_literal(previous, false);
                                this.write("] + 1");
                            }
                            (None, None, None) => this.write("0"),
                        }
                        this.write("] = ");
                        this.write_string_literal(&key, false);
                        this.write(";");
                    }
                }
                this.write_line();
                previous = Some(key);
            }
        });
    }

    fn emit_namespace_js(&mut self, decl: &ModuleDecl) {
        let (ModuleName::Ident(ident), Some(body)) = (&decl.name, &decl.body) else {
            return;
        };
        let name = ident.name.clone();
        self.emit_iife_container(decl.modifiers, &ident.name, |this| {
            this.namespaces.push(name);
            this.emit_code_statements(body);
            this.namespaces.pop();
        });
    }
}

fn is_erased_member(member: &ClassMember) -> bool {
    match member {
        ClassMember::Constructor(ctor) => ctor.body.is_none(),
        ClassMember::Method(method) => {
            method.function.body.is_none() || method.modifiers.contains(ModifierFlags::ABSTRACT)
        }
        ClassMember::Property(prop) => {
            prop.value.is_none()
                || prop
                    .modifiers
                    .intersects(ModifierFlags::DECLARE | ModifierFlags::ABSTRACT)
        }
        ClassMember::IndexSignature(_) => true,
        ClassMember::StaticBlock(_) => false,
    }
}
