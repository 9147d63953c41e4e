//! Declaration (`.d.ts`) statement printing.

use crate::Printer;
use crate::code::const_number;
use tsdist_ast::factory::keyword_type;
use tsdist_ast::*;

/// Declared type of an unannotated initializer: literal types for `const`,
/// widened primitives otherwise.
pub(crate) fn infer_type(init: &Expr, is_const: bool) -> Option<TypeNode> {
    let literal_or = |lit: Lit, widened: KeywordType| {
        Some(if is_const {
            TypeNode::Literal(lit)
        } else {
            keyword_type(widened)
        })
    };
    match init {
        Expr::Lit(Lit::Str(value)) => literal_or(Lit::Str(value.clone()), KeywordType::String),
        Expr::Lit(Lit::Num(num)) => literal_or(Lit::Num(num.clone()), KeywordType::Number),
        Expr::Lit(Lit::Bool(value)) => literal_or(Lit::Bool(*value), KeywordType::Boolean),
        Expr::Unary(UnaryExpr {
            op: UnaryOp::Minus,
            arg,
        }) => match const_number(arg) {
            Some(value) => literal_or(
                Lit::Num(NumLit {
                    value: -value,
                    raw: None,
                }),
                KeywordType::Number,
            ),
            None => Some(keyword_type(KeywordType::Number)),
        },
        Expr::Lit(Lit::BigInt(_)) => Some(keyword_type(KeywordType::BigInt)),
        Expr::Lit(Lit::Null) => Some(keyword_type(KeywordType::Null)),
        Expr::Lit(Lit::Regex(_)) => Some(factory::type_ref("RegExp")),
        Expr::Template(_) => Some(keyword_type(KeywordType::String)),
        Expr::Ident(ident) if ident.name == "undefined" => Some(keyword_type(KeywordType::Undefined)),
        Expr::New(new_expr) => match new_expr.callee.as_ref() {
            Expr::Ident(ident) => Some(factory::type_ref(ident.name.clone())),
            _ => None,
        },
        Expr::Array(_) => Some(TypeNode::Array(Box::new(keyword_type(KeywordType::Any)))),
        Expr::Arrow(arrow) => Some(TypeNode::Function(FnType {
            is_constructor: false,
            type_params: arrow.type_params.clone(),
            params: arrow.params.clone(),
            return_type: Box::new(arrow.return_type.clone().unwrap_or_else(|| {
                keyword_type(match &arrow.body {
                    ArrowBody::Expr(_) => KeywordType::Any,
                    ArrowBody::Block(block) if returns_value(&block.stmts) => KeywordType::Any,
                    ArrowBody::Block(_) => KeywordType::Void,
                })
            })),
        })),
        Expr::Function(fn_expr) => Some(TypeNode::Function(FnType {
            is_constructor: false,
            type_params: fn_expr.function.type_params.clone(),
            params: fn_expr.function.params.clone(),
            return_type: Box::new(inferred_return_type(&fn_expr.function)),
        })),
        Expr::As(as_expr) | Expr::Satisfies(as_expr) => match &as_expr.type_ann {
            TypeNode::Reference(reference) if reference.name == "const" => {
                infer_type(&as_expr.expr, true)
            }
            ty => Some(ty.clone()),
        },
        Expr::Paren(inner) | Expr::NonNull(inner) => infer_type(inner, is_const),
        _ => None,
    }
}

fn returns_value(stmts: &[Stmt]) -> bool {
    stmts.iter().any(stmt_returns_value)
}

fn stmt_returns_value(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Return(arg) => arg.is_some(),
        Stmt::Block(block) => returns_value(&block.stmts),
        Stmt::If(if_stmt) => {
            stmt_returns_value(&if_stmt.cons)
                || if_stmt.alt.as_deref().is_some_and(stmt_returns_value)
        }
        Stmt::For(ForStmt { body, .. })
        | Stmt::ForIn(ForInStmt { body, .. })
        | Stmt::ForOf(ForOfStmt { body, .. })
        | Stmt::While(WhileStmt { body, .. })
        | Stmt::DoWhile(DoWhileStmt { body, .. }) => stmt_returns_value(body),
        Stmt::Labeled(labeled) => stmt_returns_value(&labeled.body),
        Stmt::Try(try_stmt) => {
            returns_value(&try_stmt.block.stmts)
                || try_stmt
                    .handler
                    .as_ref()
                    .is_some_and(|handler| returns_value(&handler.body.stmts))
                || try_stmt
                    .finalizer
                    .as_ref()
                    .is_some_and(|block| returns_value(&block.stmts))
        }
        Stmt::Switch(switch) => switch.cases.iter().any(|case| returns_value(&case.body)),
        _ => false,
    }
}

fn inferred_return_type(function: &Function) -> TypeNode {
    if let Some(ty) = &function.return_type {
        return ty.clone();
    }
    // Overload signatures without an annotation return `any`.
    let value = function
        .body
        .as_ref()
        .is_none_or(|body| returns_value(&body.stmts));
    let inner = keyword_type(if value {
        KeywordType::Any
    } else {
        KeywordType::Void
    });
    if function.is_generator {
        return keyword_type(KeywordType::Any);
    }
    if function.is_async {
        return TypeNode::Reference(TypeRef {
            name: "Promise".to_string(),
            type_args: vec![inner],
        });
    }
    inner
}

fn same_key(a: &PropName, b: &PropName) -> bool {
    match (a, b) {
        (PropName::Ident(a), PropName::Ident(b)) => a.name == b.name,
        (PropName::Str(a), PropName::Str(b)) => a.value == b.value,
        (PropName::Num(a), PropName::Num(b)) => a.value == b.value,
        _ => false,
    }
}

/// An implementation that follows its own overload signatures.
fn is_overload_implementation(stmt: &Stmt, previous: Option<&Stmt>) -> bool {
    match (stmt, previous) {
        (Stmt::Function(decl), Some(Stmt::Function(prev))) => {
            decl.function.body.is_some()
                && prev.function.body.is_none()
                && prev.ident.name == decl.ident.name
        }
        _ => false,
    }
}

fn is_erased_in_declarations(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Var(_)
        | Stmt::Function(_)
        | Stmt::Class(_)
        | Stmt::Interface(_)
        | Stmt::TypeAlias(_)
        | Stmt::Enum(_)
        | Stmt::Module(_)
        | Stmt::Import(_)
        | Stmt::ImportEquals(_)
        | Stmt::ExportNamed(_)
        | Stmt::ExportAll(_)
        | Stmt::ExportDefault(_)
        | Stmt::ExportAssignment(_) => false,
        _ => true,
    }
}

impl Printer {
    pub(crate) fn emit_declaration_file(&mut self, file: &SourceFile) {
        self.emit_declaration_statements(&file.statements);
    }

    fn emit_declaration_statements(&mut self, stmts: &[Stmt]) {
        let mut previous: Option<&Stmt> = None;
        for stmt in stmts {
            let skip = is_erased_in_declarations(stmt) || is_overload_implementation(stmt, previous);
            previous = Some(stmt);
            if skip {
                continue;
            }
            self.write_indent();
            self.emit_declaration_stmt(stmt);
            self.write_line();
        }
    }

    /// `export `, `export default `, `declare ` as the context requires.
    fn write_declaration_prefix(&mut self, modifiers: ModifierFlags, needs_declare: bool) {
        if modifiers.contains(ModifierFlags::EXPORT) {
            self.write("export ");
            if modifiers.contains(ModifierFlags::DEFAULT) {
                self.write("default ");
                return;
            }
        }
        if needs_declare && !self.in_ambient_context {
            self.write("declare ");
        }
    }

    fn emit_declaration_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Var(var) => {
                self.write_declaration_prefix(var.modifiers, true);
                self.write(var.kind.as_str());
                self.write(" ");
                let is_const = var.kind == VarKind::Const;
                let bindings: Vec<(&Ident, Option<TypeNode>)> = var
                    .decls
                    .iter()
                    .flat_map(|decl| {
                        let declared = decl.name.type_ann().cloned().or_else(|| {
                            decl.init.as_ref().and_then(|init| infer_type(init, is_const))
                        });
                        let single = matches!(decl.name, Pat::Ident(_));
                        decl.name.binding_idents().into_iter().map(move |ident| {
                            (ident, if single { declared.clone() } else { None })
                        })
                    })
                    .collect();
                self.write_comma_list(&bindings, |this, (ident, ty)| {
                    this.write(&ident.name);
                    this.write(": ");
                    match ty {
                        Some(ty) => this.emit_type(ty),
                        None => this.write("any"),
                    }
                });
                self.write(";");
            }
            Stmt::Function(decl) => {
                self.write_declaration_prefix(decl.modifiers, true);
                self.emit_function_signature(Some(&decl.ident.name), &decl.function);
            }
            Stmt::Class(decl) => {
                self.write_declaration_prefix(decl.modifiers, true);
                if decl.modifiers.contains(ModifierFlags::ABSTRACT) {
                    self.write("abstract ");
                }
                self.emit_class_declaration(Some(&decl.ident.name), &decl.class);
            }
            Stmt::Interface(decl) => {
                self.write_declaration_prefix(decl.modifiers, false);
                self.write("interface ");
                self.write(&decl.ident.name);
                self.emit_type_params(&decl.type_params);
                if !decl.extends.is_empty() {
                    self.write(" extends ");
                    self.write_comma_list(&decl.extends, |this, ty| this.emit_type(ty));
                }
                self.write(" ");
                self.emit_type_members(&decl.body);
            }
            Stmt::TypeAlias(decl) => {
                self.write_declaration_prefix(decl.modifiers, false);
                self.write("type ");
                self.write(&decl.ident.name);
                self.emit_type_params(&decl.type_params);
                self.write(" = ");
                self.emit_type(&decl.type_ann);
                self.write(";");
            }
            Stmt::Enum(decl) => self.emit_enum_declaration(decl),
            Stmt::Module(decl) => self.emit_module_declaration(decl),
            Stmt::Import(import) => self.emit_import_declaration(import),
            Stmt::ImportEquals(import) => {
                if import.modifiers.contains(ModifierFlags::EXPORT) {
                    self.write("export ");
                }
                self.write("import ");
                if import.type_only {
                    self.write("type ");
                }
                self.write(&import.ident.name);
                self.write(" = ");
                match &import.reference {
                    ModuleReference::External(specifier) => {
                        self.write("require(");
                        self.write_string_literal(&specifier.value, specifier.single_quote);
                        self.write(")");
                    }
                    ModuleReference::Entity(entity) => self.write(entity),
                }
                self.write(";");
            }
            Stmt::ExportNamed(export) => {
                self.write(if export.type_only { "export type {" } else { "export {" });
                if !export.specifiers.is_empty() {
                    self.write(" ");
                    self.write_comma_list(&export.specifiers, |this, spec| {
                        if spec.type_only {
                            this.write("type ");
                        }
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
                self.write(if export.type_only { "export type * " } else { "export * " });
                if let Some(alias) = &export.alias {
                    self.write("as ");
                    self.write(&alias.name);
                    self.write(" ");
                }
                self.write("from ");
                self.write_string_literal(&export.source.value, export.source.single_quote);
                self.write(";");
            }
            Stmt::ExportDefault(expr) => self.emit_export_default_declaration(expr),
            Stmt::ExportAssignment(expr) => {
                self.write("export = ");
                self.emit_value_in_declaration(expr);
                self.write(";");
            }
            _ => {}
        }
    }

    fn emit_function_signature(&mut self, name: Option<&str>, function: &Function) {
        self.write("function");
        if let Some(name) = name {
            self.write(" ");
            self.write(name);
        }
        let return_type = inferred_return_type(function);
        self.emit_signature(&function.type_params, &function.params, Some(&return_type));
        self.write(";");
    }

    fn emit_export_default_declaration(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => {
                self.write("export default ");
                self.write(&ident.name);
                self.write(";");
            }
            Expr::Function(fn_expr) => {
                self.write("export default ");
                self.emit_function_signature(
                    fn_expr.ident.as_ref().map(|ident| ident.name.as_str()),
                    &fn_expr.function,
                );
            }
            Expr::Class(class_expr) => {
                self.write("export default ");
                self.emit_class_declaration(
                    class_expr.ident.as_ref().map(|ident| ident.name.as_str()),
                    &class_expr.class,
                );
            }
            other => {
                let declare = if self.in_ambient_context { "" } else { "declare " };
                self.write(&format!("{declare}const _default: "));
                match infer_type(other, true) {
                    Some(ty) => self.emit_type(&ty),
                    None => self.write("any"),
                }
                self.write(";");
                self.write_line();
                self.write_indent();
                self.write("export default _default;");
            }
        }
    }

    fn emit_import_declaration(&mut self, import: &ImportDecl) {
        self.write(if import.type_only { "import type " } else { "import " });
        if import.is_side_effect_only() {
            self.write_string_literal(&import.specifier.value, import.specifier.single_quote);
            self.write(";");
            return;
        }
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
        if !import.named.is_empty() {
            if wrote_clause {
                self.write(", ");
            }
            self.write("{ ");
            self.write_comma_list(&import.named, |this, spec| {
                if spec.type_only {
                    this.write("type ");
                }
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

    fn emit_class_declaration(&mut self, name: Option<&str>, class: &Class) {
        self.write("class");
        if let Some(name) = name {
            self.write(" ");
            self.write(name);
        }
        self.emit_type_params(&class.type_params);
        if let Some(super_class) = &class.super_class {
            self.write(" extends ");
            self.emit_value_in_declaration(super_class);
            self.emit_type_args(&class.super_type_args);
        }
        if !class.implements.is_empty() {
            self.write(" implements ");
            self.write_comma_list(&class.implements, |this, ty| this.emit_type(ty));
        }
        self.write(" {");
        self.write_line();
        self.increase_indent();

        let has_ctor_overloads = class.members.iter().any(|member| {
            matches!(member, ClassMember::Constructor(ctor) if ctor.body.is_none())
        });
        let mut previous: Option<&ClassMember> = None;
        for member in &class.members {
            let skip = match member {
                ClassMember::Constructor(ctor) => has_ctor_overloads && ctor.body.is_some(),
                ClassMember::Method(method) => matches!(
                    previous,
                    Some(ClassMember::Method(prev))
                        if prev.function.body.is_none()
                            && method.function.body.is_some()
                            && same_key(&prev.key, &method.key)
                ),
                ClassMember::StaticBlock(_) => true,
                _ => false,
            };
            previous = Some(member);
            if skip {
                continue;
            }
            self.emit_class_member_declaration(member);
        }

        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    fn emit_class_member_declaration(&mut self, member: &ClassMember) {
        match member {
            ClassMember::Constructor(ctor) => {
                // Parameter properties surface as property declarations.
                for param in &ctor.params {
                    if !param.modifiers.intersects(ModifierFlags::PARAMETER_PROPERTY) {
                        continue;
                    }
                    let (binding, ty) = match &param.pat {
                        Pat::Ident(binding) => (binding, binding.type_ann.clone()),
                        Pat::Assign(assign) => match assign.left.as_ref() {
                            Pat::Ident(binding) => (
                                binding,
                                binding
                                    .type_ann
                                    .clone()
                                    .or_else(|| infer_type(&assign.right, false)),
                            ),
                            _ => continue,
                        },
                        _ => continue,
                    };
                    self.write_indent();
                    self.write_member_modifiers(param.modifiers);
                    self.write(&binding.ident.name);
                    if binding.optional || matches!(param.pat, Pat::Assign(_)) {
                        self.write("?");
                    }
                    if !param.modifiers.contains(ModifierFlags::PRIVATE) {
                        self.emit_type_annotation(ty.as_ref());
                    }
                    self.write(";");
                    self.write_line();
                }
                self.write_indent();
                if ctor.modifiers.intersects(ModifierFlags::ACCESSIBILITY) {
                    self.write_member_modifiers(ctor.modifiers & ModifierFlags::ACCESSIBILITY);
                }
                self.write("constructor");
                let params: Vec<Param> = ctor
                    .params
                    .iter()
                    .map(|param| Param {
                        modifiers: ModifierFlags::empty(),
                        pat: param.pat.clone(),
                    })
                    .collect();
                self.emit_params_typed(&params);
                self.write(";");
                self.write_line();
            }
            ClassMember::Method(method) => {
                self.write_indent();
                self.write_member_modifiers(method.modifiers);
                let private = method.modifiers.contains(ModifierFlags::PRIVATE);
                match method.kind {
                    MethodKind::Getter => self.write("get "),
                    MethodKind::Setter => self.write("set "),
                    MethodKind::Method => {}
                }
                self.emit_prop_name(&method.key);
                if method.optional {
                    self.write("?");
                }
                // Private members expose no signature.
                if !private {
                    match method.kind {
                        MethodKind::Setter => self.emit_params_typed(&method.function.params),
                        _ => {
                            let return_type = inferred_return_type(&method.function);
                            self.emit_signature(
                                &method.function.type_params,
                                &method.function.params,
                                Some(&return_type),
                            );
                        }
                    }
                }
                self.write(";");
                self.write_line();
            }
            ClassMember::Property(prop) => {
                self.write_indent();
                self.write_member_modifiers(prop.modifiers);
                self.emit_prop_name(&prop.key);
                if prop.optional {
                    self.write("?");
                }
                if !prop.modifiers.contains(ModifierFlags::PRIVATE) {
                    let is_const = prop.modifiers.contains(ModifierFlags::READONLY);
                    let ty = prop
                        .type_ann
                        .clone()
                        .or_else(|| prop.value.as_ref().and_then(|value| infer_type(value, is_const)));
                    self.write(": ");
                    match ty {
                        Some(ty) => self.emit_type(&ty),
                        None => self.write("any"),
                    }
                }
                self.write(";");
                self.write_line();
            }
            ClassMember::IndexSignature(index) => {
                self.write_indent();
                self.emit_index_signature(index);
                self.write(";");
                self.write_line();
            }
            ClassMember::StaticBlock(_) => {}
        }
    }

    fn write_member_modifiers(&mut self, modifiers: ModifierFlags) {
        for (flag, text) in [
            (ModifierFlags::PRIVATE, "private "),
            (ModifierFlags::PROTECTED, "protected "),
            (ModifierFlags::STATIC, "static "),
            (ModifierFlags::ABSTRACT, "abstract "),
            (ModifierFlags::READONLY, "readonly "),
        ] {
            if modifiers.contains(flag) {
                self.write(text);
            }
        }
    }

    fn emit_enum_declaration(&mut self, decl: &EnumDecl) {
        self.write_declaration_prefix(decl.modifiers, true);
        if decl.modifiers.contains(ModifierFlags::CONST) {
            self.write("const ");
        }
        self.write("enum ");
        self.write(&decl.ident.name);
        self.write(" {");
        self.write_line();
        self.increase_indent();
        let mut next = Some(0.0);
        for (i, member) in decl.members.iter().enumerate() {
            self.write_indent();
            self.emit_prop_name(&member.name);
            match &member.init {
                Some(init) => {
                    self.write(" = ");
                    self.emit_value_in_declaration(init);
                    next = const_number(init).map(|value| value + 1.0);
                }
                None => {
                    if let Some(value) = next {
                        self.write(" = ");
                        self.write(&crate::format_number(value));
                        next = Some(value + 1.0);
                    }
                }
            }
            if i + 1 < decl.members.len() {
                self.write(",");
            }
            self.write_line();
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    fn emit_module_declaration(&mut self, decl: &ModuleDecl) {
        match decl.kind {
            ModuleDeclKind::Global => self.write("declare global"),
            ModuleDeclKind::Namespace | ModuleDeclKind::Module => {
                self.write_declaration_prefix(decl.modifiers, true);
                match &decl.name {
                    ModuleName::Ident(ident) => {
                        self.write("namespace ");
                        self.write(&ident.name);
                    }
                    ModuleName::Str(name) => {
                        self.write("module ");
                        self.write_string_literal(&name.value, name.single_quote);
                    }
                }
            }
        }
        let Some(body) = &decl.body else {
            self.write(";");
            return;
        };
        self.write(" {");
        self.write_line();
        self.increase_indent();
        let outer = std::mem::replace(&mut self.in_ambient_context, true);
        self.emit_declaration_statements(body);
        self.in_ambient_context = outer;
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }
}
