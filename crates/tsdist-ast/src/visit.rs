//! Mutable tree traversal.
//!
//! Every `visit_*` method defaults to the matching `walk_*` function, which
//! visits all children. An override that wants children visited calls the
//! `walk_*` function itself.

use crate::ast::*;

pub trait VisitMut {
    fn visit_source_file(&mut self, file: &mut SourceFile) {
        walk_source_file(self, file);
    }

    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr(self, expr);
    }

    fn visit_pat(&mut self, pat: &mut Pat) {
        walk_pat(self, pat);
    }

    fn visit_type(&mut self, ty: &mut TypeNode) {
        walk_type(self, ty);
    }

    fn visit_import_decl(&mut self, _import: &mut ImportDecl) {}

    fn visit_import_equals(&mut self, _import: &mut ImportEqualsDecl) {}

    fn visit_export_named(&mut self, _export: &mut ExportNamed) {}

    fn visit_export_all(&mut self, _export: &mut ExportAll) {}

    fn visit_call_expr(&mut self, call: &mut CallExpr) {
        walk_call_expr(self, call);
    }

    fn visit_import_type(&mut self, import: &mut ImportType) {
        walk_import_type(self, import);
    }

    fn visit_prop(&mut self, prop: &mut Prop) {
        walk_prop(self, prop);
    }

    fn visit_function(&mut self, function: &mut Function) {
        walk_function(self, function);
    }

    fn visit_class(&mut self, class: &mut Class) {
        walk_class(self, class);
    }

    fn visit_type_member(&mut self, member: &mut TypeMember) {
        walk_type_member(self, member);
    }
}

pub fn walk_source_file<V: VisitMut + ?Sized>(v: &mut V, file: &mut SourceFile) {
    walk_stmts(v, &mut file.statements);
}

pub fn walk_stmts<V: VisitMut + ?Sized>(v: &mut V, stmts: &mut [Stmt]) {
    for stmt in stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_block<V: VisitMut + ?Sized>(v: &mut V, block: &mut BlockStmt) {
    walk_stmts(v, &mut block.stmts);
}

pub fn walk_stmt<V: VisitMut + ?Sized>(v: &mut V, stmt: &mut Stmt) {
    match stmt {
        Stmt::Block(block) => walk_block(v, block),
        Stmt::Empty | Stmt::Debugger | Stmt::Break(_) | Stmt::Continue(_) => {}
        Stmt::Expr(expr) | Stmt::Throw(expr) => v.visit_expr(expr),
        Stmt::ExportDefault(expr) | Stmt::ExportAssignment(expr) => v.visit_expr(expr),
        Stmt::Return(arg) => {
            if let Some(arg) = arg {
                v.visit_expr(arg);
            }
        }
        Stmt::Var(var) => walk_var_decl(v, var),
        Stmt::Function(decl) => v.visit_function(&mut decl.function),
        Stmt::Class(decl) => v.visit_class(&mut decl.class),
        Stmt::Interface(decl) => {
            walk_type_params(v, &mut decl.type_params);
            for ty in &mut decl.extends {
                v.visit_type(ty);
            }
            for member in &mut decl.body {
                v.visit_type_member(member);
            }
        }
        Stmt::TypeAlias(decl) => {
            walk_type_params(v, &mut decl.type_params);
            v.visit_type(&mut decl.type_ann);
        }
        Stmt::Enum(decl) => {
            for member in &mut decl.members {
                walk_prop_name(v, &mut member.name);
                if let Some(init) = &mut member.init {
                    v.visit_expr(init);
                }
            }
        }
        Stmt::Module(decl) => {
            if let Some(body) = &mut decl.body {
                walk_stmts(v, body);
            }
        }
        Stmt::Import(import) => v.visit_import_decl(import),
        Stmt::ImportEquals(import) => v.visit_import_equals(import),
        Stmt::ExportNamed(export) => v.visit_export_named(export),
        Stmt::ExportAll(export) => v.visit_export_all(export),
        Stmt::If(if_stmt) => {
            v.visit_expr(&mut if_stmt.test);
            v.visit_stmt(&mut if_stmt.cons);
            if let Some(alt) = &mut if_stmt.alt {
                v.visit_stmt(alt);
            }
        }
        Stmt::For(for_stmt) => {
            if let Some(init) = &mut for_stmt.init {
                walk_for_head(v, init);
            }
            if let Some(test) = &mut for_stmt.test {
                v.visit_expr(test);
            }
            if let Some(update) = &mut for_stmt.update {
                v.visit_expr(update);
            }
            v.visit_stmt(&mut for_stmt.body);
        }
        Stmt::ForIn(for_in) => {
            walk_for_head(v, &mut for_in.left);
            v.visit_expr(&mut for_in.right);
            v.visit_stmt(&mut for_in.body);
        }
        Stmt::ForOf(for_of) => {
            walk_for_head(v, &mut for_of.left);
            v.visit_expr(&mut for_of.right);
            v.visit_stmt(&mut for_of.body);
        }
        Stmt::While(while_stmt) => {
            v.visit_expr(&mut while_stmt.test);
            v.visit_stmt(&mut while_stmt.body);
        }
        Stmt::DoWhile(do_while) => {
            v.visit_stmt(&mut do_while.body);
            v.visit_expr(&mut do_while.test);
        }
        Stmt::Try(try_stmt) => {
            walk_block(v, &mut try_stmt.block);
            if let Some(handler) = &mut try_stmt.handler {
                if let Some(param) = &mut handler.param {
                    v.visit_pat(param);
                }
                walk_block(v, &mut handler.body);
            }
            if let Some(finalizer) = &mut try_stmt.finalizer {
                walk_block(v, finalizer);
            }
        }
        Stmt::Switch(switch) => {
            v.visit_expr(&mut switch.discriminant);
            for case in &mut switch.cases {
                if let Some(test) = &mut case.test {
                    v.visit_expr(test);
                }
                walk_stmts(v, &mut case.body);
            }
        }
        Stmt::Labeled(labeled) => v.visit_stmt(&mut labeled.body),
    }
}

pub fn walk_var_decl<V: VisitMut + ?Sized>(v: &mut V, var: &mut VarDecl) {
    for decl in &mut var.decls {
        v.visit_pat(&mut decl.name);
        if let Some(init) = &mut decl.init {
            v.visit_expr(init);
        }
    }
}

fn walk_for_head<V: VisitMut + ?Sized>(v: &mut V, head: &mut ForHead) {
    match head {
        ForHead::Var(var) => walk_var_decl(v, var),
        ForHead::Expr(expr) => v.visit_expr(expr),
    }
}

pub fn walk_expr<V: VisitMut + ?Sized>(v: &mut V, expr: &mut Expr) {
    match expr {
        Expr::This | Expr::Super | Expr::Ident(_) | Expr::Lit(_) | Expr::Raw(_) => {}
        Expr::Template(template) => walk_template(v, template),
        Expr::TaggedTemplate(tagged) => {
            v.visit_expr(&mut tagged.tag);
            walk_template(v, &mut tagged.template);
        }
        Expr::Array(elems) => {
            for elem in elems.iter_mut().flatten() {
                v.visit_expr(elem);
            }
        }
        Expr::Object(props) => {
            for prop in props {
                v.visit_prop(prop);
            }
        }
        Expr::Function(fn_expr) => v.visit_function(&mut fn_expr.function),
        Expr::Arrow(arrow) => {
            walk_type_params(v, &mut arrow.type_params);
            walk_params(v, &mut arrow.params);
            if let Some(return_type) = &mut arrow.return_type {
                v.visit_type(return_type);
            }
            match &mut arrow.body {
                ArrowBody::Block(block) => walk_block(v, block),
                ArrowBody::Expr(body) => v.visit_expr(body),
            }
        }
        Expr::Class(class_expr) => v.visit_class(&mut class_expr.class),
        Expr::Unary(unary) => v.visit_expr(&mut unary.arg),
        Expr::Update(update) => v.visit_expr(&mut update.arg),
        Expr::Binary(binary) => {
            v.visit_expr(&mut binary.left);
            v.visit_expr(&mut binary.right);
        }
        Expr::Assign(assign) => {
            v.visit_expr(&mut assign.left);
            v.visit_expr(&mut assign.right);
        }
        Expr::Cond(cond) => {
            v.visit_expr(&mut cond.test);
            v.visit_expr(&mut cond.cons);
            v.visit_expr(&mut cond.alt);
        }
        Expr::Call(call) => v.visit_call_expr(call),
        Expr::New(new_expr) => {
            v.visit_expr(&mut new_expr.callee);
            for ty in &mut new_expr.type_args {
                v.visit_type(ty);
            }
            if let Some(args) = &mut new_expr.args {
                for arg in args {
                    v.visit_expr(arg);
                }
            }
        }
        Expr::Member(member) => {
            v.visit_expr(&mut member.object);
            if let MemberProp::Computed(prop) = &mut member.prop {
                v.visit_expr(prop);
            }
        }
        Expr::Seq(exprs) => {
            for expr in exprs {
                v.visit_expr(expr);
            }
        }
        Expr::Paren(inner) | Expr::Spread(inner) | Expr::Await(inner) | Expr::NonNull(inner) => {
            v.visit_expr(inner)
        }
        Expr::Yield(yield_expr) => {
            if let Some(arg) = &mut yield_expr.arg {
                v.visit_expr(arg);
            }
        }
        Expr::As(as_expr) | Expr::Satisfies(as_expr) => {
            v.visit_expr(&mut as_expr.expr);
            v.visit_type(&mut as_expr.type_ann);
        }
    }
}

fn walk_template<V: VisitMut + ?Sized>(v: &mut V, template: &mut TemplateLit) {
    for expr in &mut template.exprs {
        v.visit_expr(expr);
    }
}

pub fn walk_call_expr<V: VisitMut + ?Sized>(v: &mut V, call: &mut CallExpr) {
    if let Callee::Expr(callee) = &mut call.callee {
        v.visit_expr(callee);
    }
    for ty in &mut call.type_args {
        v.visit_type(ty);
    }
    for arg in &mut call.args {
        v.visit_expr(arg);
    }
}

pub fn walk_prop<V: VisitMut + ?Sized>(v: &mut V, prop: &mut Prop) {
    match prop {
        Prop::KeyValue { key, value } => {
            walk_prop_name(v, key);
            v.visit_expr(value);
        }
        Prop::Shorthand(_) => {}
        Prop::Method { key, function, .. } => {
            walk_prop_name(v, key);
            v.visit_function(function);
        }
        Prop::Spread(expr) => v.visit_expr(expr),
    }
}

pub fn walk_prop_name<V: VisitMut + ?Sized>(v: &mut V, name: &mut PropName) {
    if let PropName::Computed(expr) = name {
        v.visit_expr(expr);
    }
}

pub fn walk_function<V: VisitMut + ?Sized>(v: &mut V, function: &mut Function) {
    walk_type_params(v, &mut function.type_params);
    walk_params(v, &mut function.params);
    if let Some(return_type) = &mut function.return_type {
        v.visit_type(return_type);
    }
    if let Some(body) = &mut function.body {
        walk_block(v, body);
    }
}

pub fn walk_params<V: VisitMut + ?Sized>(v: &mut V, params: &mut [Param]) {
    for param in params {
        v.visit_pat(&mut param.pat);
    }
}

pub fn walk_class<V: VisitMut + ?Sized>(v: &mut V, class: &mut Class) {
    walk_type_params(v, &mut class.type_params);
    if let Some(super_class) = &mut class.super_class {
        v.visit_expr(super_class);
    }
    for ty in class.super_type_args.iter_mut().chain(class.implements.iter_mut()) {
        v.visit_type(ty);
    }
    for member in &mut class.members {
        match member {
            ClassMember::Constructor(ctor) => {
                walk_params(v, &mut ctor.params);
                if let Some(body) = &mut ctor.body {
                    walk_block(v, body);
                }
            }
            ClassMember::Method(method) => {
                walk_prop_name(v, &mut method.key);
                v.visit_function(&mut method.function);
            }
            ClassMember::Property(prop) => {
                walk_prop_name(v, &mut prop.key);
                if let Some(type_ann) = &mut prop.type_ann {
                    v.visit_type(type_ann);
                }
                if let Some(value) = &mut prop.value {
                    v.visit_expr(value);
                }
            }
            ClassMember::IndexSignature(index) => walk_index_signature(v, index),
            ClassMember::StaticBlock(block) => walk_block(v, block),
        }
    }
}

pub fn walk_pat<V: VisitMut + ?Sized>(v: &mut V, pat: &mut Pat) {
    match pat {
        Pat::Ident(binding) => {
            if let Some(type_ann) = &mut binding.type_ann {
                v.visit_type(type_ann);
            }
        }
        Pat::Array(array) => {
            for elem in array.elems.iter_mut().flatten() {
                v.visit_pat(elem);
            }
            if let Some(type_ann) = &mut array.type_ann {
                v.visit_type(type_ann);
            }
        }
        Pat::Object(object) => {
            for prop in &mut object.props {
                match prop {
                    ObjectPatProp::KeyValue { key, value } => {
                        walk_prop_name(v, key);
                        v.visit_pat(value);
                    }
                    ObjectPatProp::Shorthand { default, .. } => {
                        if let Some(default) = default {
                            v.visit_expr(default);
                        }
                    }
                    ObjectPatProp::Rest(rest) => v.visit_pat(&mut rest.arg),
                }
            }
            if let Some(type_ann) = &mut object.type_ann {
                v.visit_type(type_ann);
            }
        }
        Pat::Rest(rest) => {
            v.visit_pat(&mut rest.arg);
            if let Some(type_ann) = &mut rest.type_ann {
                v.visit_type(type_ann);
            }
        }
        Pat::Assign(assign) => {
            v.visit_pat(&mut assign.left);
            v.visit_expr(&mut assign.right);
        }
    }
}

pub fn walk_type<V: VisitMut + ?Sized>(v: &mut V, ty: &mut TypeNode) {
    match ty {
        TypeNode::Keyword(_) | TypeNode::Literal(_) | TypeNode::Query(_) | TypeNode::Raw(_) => {}
        TypeNode::Reference(reference) => {
            for arg in &mut reference.type_args {
                v.visit_type(arg);
            }
        }
        TypeNode::Array(elem) | TypeNode::Paren(elem) | TypeNode::Operator(_, elem) => {
            v.visit_type(elem)
        }
        TypeNode::Tuple(types) | TypeNode::Union(types) | TypeNode::Intersection(types) => {
            for ty in types {
                v.visit_type(ty);
            }
        }
        TypeNode::Function(fn_type) => {
            walk_type_params(v, &mut fn_type.type_params);
            walk_params(v, &mut fn_type.params);
            v.visit_type(&mut fn_type.return_type);
        }
        TypeNode::TypeLiteral(members) => {
            for member in members {
                v.visit_type_member(member);
            }
        }
        TypeNode::IndexedAccess { object, index } => {
            v.visit_type(object);
            v.visit_type(index);
        }
        TypeNode::Conditional {
            check,
            extends,
            true_type,
            false_type,
        } => {
            v.visit_type(check);
            v.visit_type(extends);
            v.visit_type(true_type);
            v.visit_type(false_type);
        }
        TypeNode::Import(import) => v.visit_import_type(import),
    }
}

pub fn walk_import_type<V: VisitMut + ?Sized>(v: &mut V, import: &mut ImportType) {
    for arg in &mut import.type_args {
        v.visit_type(arg);
    }
}

pub fn walk_type_member<V: VisitMut + ?Sized>(v: &mut V, member: &mut TypeMember) {
    match member {
        TypeMember::Property { key, type_ann, .. } => {
            walk_prop_name(v, key);
            if let Some(type_ann) = type_ann {
                v.visit_type(type_ann);
            }
        }
        TypeMember::Method {
            key,
            type_params,
            params,
            return_type,
            ..
        } => {
            walk_prop_name(v, key);
            walk_signature(v, type_params, params, return_type);
        }
        TypeMember::Call {
            type_params,
            params,
            return_type,
        }
        | TypeMember::Construct {
            type_params,
            params,
            return_type,
        } => walk_signature(v, type_params, params, return_type),
        TypeMember::Index(index) => walk_index_signature(v, index),
    }
}

fn walk_signature<V: VisitMut + ?Sized>(
    v: &mut V,
    type_params: &mut [TypeParam],
    params: &mut [Param],
    return_type: &mut Option<TypeNode>,
) {
    walk_type_params(v, type_params);
    walk_params(v, params);
    if let Some(return_type) = return_type {
        v.visit_type(return_type);
    }
}

fn walk_index_signature<V: VisitMut + ?Sized>(v: &mut V, index: &mut IndexSignature) {
    v.visit_type(&mut index.param_type);
    v.visit_type(&mut index.type_ann);
}

pub fn walk_type_params<V: VisitMut + ?Sized>(v: &mut V, params: &mut [TypeParam]) {
    for param in params {
        if let Some(constraint) = &mut param.constraint {
            v.visit_type(constraint);
        }
        if let Some(default) = &mut param.default {
            v.visit_type(default);
        }
    }
}
