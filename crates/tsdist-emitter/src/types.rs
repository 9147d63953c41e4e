//! Type syntax printing for declaration output.

use crate::Printer;
use crate::expressions::PREC_ASSIGN;
use tsdist_ast::*;

/// Types that need parentheses as an array element, indexed-access object
/// or union/intersection member.
fn needs_postfix_parens(ty: &TypeNode) -> bool {
    matches!(
        ty,
        TypeNode::Union(_)
            | TypeNode::Intersection(_)
            | TypeNode::Function(_)
            | TypeNode::Conditional { .. }
            | TypeNode::Operator(..)
    )
}

impl Printer {
    pub(crate) fn emit_type(&mut self, ty: &TypeNode) {
        match ty {
            TypeNode::Keyword(keyword) => self.write(keyword.as_str()),
            TypeNode::Reference(reference) => {
                self.write(&reference.name);
                self.emit_type_args(&reference.type_args);
            }
            TypeNode::Literal(lit) => self.emit_lit(lit),
            TypeNode::Array(elem) => {
                self.emit_type_wrapped(elem, needs_postfix_parens(elem));
                self.write("[]");
            }
            TypeNode::Tuple(elems) => {
                self.write("[");
                self.write_comma_list(elems, |this, elem| this.emit_type(elem));
                self.write("]");
            }
            TypeNode::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        self.write(" | ");
                    }
                    self.emit_type_wrapped(
                        member,
                        matches!(member, TypeNode::Function(_) | TypeNode::Conditional { .. }),
                    );
                }
            }
            TypeNode::Intersection(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        self.write(" & ");
                    }
                    self.emit_type_wrapped(
                        member,
                        matches!(
                            member,
                            TypeNode::Union(_) | TypeNode::Function(_) | TypeNode::Conditional { .. }
                        ),
                    );
                }
            }
            TypeNode::Paren(inner) => self.emit_type_wrapped(inner, true),
            TypeNode::Function(fn_type) => {
                if fn_type.is_constructor {
                    self.write("new ");
                }
                self.emit_type_params(&fn_type.type_params);
                self.emit_params_typed(&fn_type.params);
                self.write(" => ");
                self.emit_type(&fn_type.return_type);
            }
            TypeNode::TypeLiteral(members) => self.emit_type_members(members),
            TypeNode::Query(name) => {
                self.write("typeof ");
                self.write(name);
            }
            TypeNode::Operator(op, inner) => {
                self.write(match op {
                    TypeOperatorKind::KeyOf => "keyof ",
                    TypeOperatorKind::Unique => "unique ",
                    TypeOperatorKind::Readonly => "readonly ",
                });
                self.emit_type_wrapped(
                    inner,
                    matches!(
                        inner.as_ref(),
                        TypeNode::Union(_) | TypeNode::Intersection(_) | TypeNode::Function(_)
                    ),
                );
            }
            TypeNode::IndexedAccess { object, index } => {
                self.emit_type_wrapped(object, needs_postfix_parens(object));
                self.write("[");
                self.emit_type(index);
                self.write("]");
            }
            TypeNode::Conditional {
                check,
                extends,
                true_type,
                false_type,
            } => {
                self.emit_type_wrapped(
                    check,
                    matches!(
                        check.as_ref(),
                        TypeNode::Function(_) | TypeNode::Conditional { .. }
                    ),
                );
                self.write(" extends ");
                self.emit_type_wrapped(
                    extends,
                    matches!(extends.as_ref(), TypeNode::Conditional { .. }),
                );
                self.write(" ? ");
                self.emit_type(true_type);
                self.write(" : ");
                self.emit_type(false_type);
            }
            TypeNode::Import(import) => {
                if import.is_typeof {
                    self.write("typeof ");
                }
                self.write("import(");
                self.write_string_literal(&import.argument.value, import.argument.single_quote);
                self.write(")");
                if let Some(qualifier) = &import.qualifier {
                    self.write(".");
                    self.write(qualifier);
                }
                self.emit_type_args(&import.type_args);
            }
            TypeNode::Raw(text) => self.write(text),
        }
    }

    fn emit_type_wrapped(&mut self, ty: &TypeNode, parens: bool) {
        if parens {
            self.write("(");
        }
        match ty {
            TypeNode::Paren(inner) => self.emit_type(inner),
            other => self.emit_type(other),
        }
        if parens {
            self.write(")");
        }
    }

    pub(crate) fn emit_type_args(&mut self, args: &[TypeNode]) {
        if args.is_empty() {
            return;
        }
        self.write("<");
        self.write_comma_list(args, |this, arg| this.emit_type(arg));
        self.write(">");
    }

    pub(crate) fn emit_type_params(&mut self, params: &[TypeParam]) {
        if params.is_empty() {
            return;
        }
        self.write("<");
        self.write_comma_list(params, |this, param| {
            this.write(&param.name.name);
            if let Some(constraint) = &param.constraint {
                this.write(" extends ");
                this.emit_type(constraint);
            }
            if let Some(default) = &param.default {
                this.write(" = ");
                this.emit_type(default);
            }
        });
        self.write(">");
    }

    pub(crate) fn emit_type_annotation(&mut self, ty: Option<&TypeNode>) {
        if let Some(ty) = ty {
            self.write(": ");
            self.emit_type(ty);
        }
    }

    /// `(a: string, b?: number, ...rest: T[])`
    pub(crate) fn emit_params_typed(&mut self, params: &[Param]) {
        self.write("(");
        self.write_comma_list(params, |this, param| this.emit_param_typed(&param.pat));
        self.write(")");
    }

    fn emit_param_typed(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(binding) => {
                self.write(&binding.ident.name);
                if binding.optional {
                    self.write("?");
                }
                self.emit_type_annotation(binding.type_ann.as_ref());
            }
            Pat::Assign(assign) => {
                // A parameter with a default is optional in the signature.
                match assign.left.as_ref() {
                    Pat::Ident(binding) => self.write(&binding.ident.name),
                    other => self.emit_binding_pattern(other),
                }
                self.write("?");
                let ty = assign
                    .left
                    .type_ann()
                    .cloned()
                    .or_else(|| crate::declarations::infer_type(&assign.right, false));
                self.emit_type_annotation(ty.as_ref());
            }
            Pat::Rest(rest) => {
                self.write("...");
                self.emit_binding_pattern(&rest.arg);
                self.emit_type_annotation(rest.type_ann.as_ref().or(rest.arg.type_ann()));
            }
            Pat::Array(_) | Pat::Object(_) => {
                self.emit_binding_pattern(pat);
                self.emit_type_annotation(pat.type_ann());
            }
        }
    }

    /// Destructuring pattern as it appears in a signature: names only.
    fn emit_binding_pattern(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(binding) => self.write(&binding.ident.name),
            Pat::Array(array) => {
                self.write("[");
                for (i, elem) in array.elems.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(elem) = elem {
                        self.emit_binding_pattern(elem);
                    }
                }
                self.write("]");
            }
            Pat::Object(object) => {
                self.write("{ ");
                self.write_comma_list(&object.props, |this, prop| match prop {
                    ObjectPatProp::KeyValue { key, value } => {
                        this.emit_prop_name(key);
                        this.write(": ");
                        this.emit_binding_pattern(value);
                    }
                    ObjectPatProp::Shorthand { ident, .. } => this.write(&ident.name),
                    ObjectPatProp::Rest(rest) => {
                        this.write("...");
                        this.emit_binding_pattern(&rest.arg);
                    }
                });
                self.write(" }");
            }
            Pat::Rest(rest) => {
                self.write("...");
                self.emit_binding_pattern(&rest.arg);
            }
            Pat::Assign(assign) => self.emit_binding_pattern(&assign.left),
        }
    }

    /// `{ ... }` body of an interface or type literal.
    pub(crate) fn emit_type_members(&mut self, members: &[TypeMember]) {
        if members.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.write_line();
        self.increase_indent();
        for member in members {
            self.write_indent();
            self.emit_type_member(member);
            self.write_line();
        }
        self.decrease_indent();
        self.write_indent();
        self.write("}");
    }

    fn emit_type_member(&mut self, member: &TypeMember) {
        match member {
            TypeMember::Property {
                readonly,
                key,
                optional,
                type_ann,
            } => {
                if *readonly {
                    self.write("readonly ");
                }
                self.emit_prop_name(key);
                if *optional {
                    self.write("?");
                }
                self.write(": ");
                match type_ann {
                    Some(ty) => self.emit_type(ty),
                    None => self.write("any"),
                }
            }
            TypeMember::Method {
                key,
                optional,
                type_params,
                params,
                return_type,
            } => {
                self.emit_prop_name(key);
                if *optional {
                    self.write("?");
                }
                self.emit_signature(type_params, params, return_type.as_ref());
            }
            TypeMember::Call {
                type_params,
                params,
                return_type,
            } => self.emit_signature(type_params, params, return_type.as_ref()),
            TypeMember::Construct {
                type_params,
                params,
                return_type,
            } => {
                self.write("new ");
                self.emit_signature(type_params, params, return_type.as_ref());
            }
            TypeMember::Index(index) => self.emit_index_signature(index),
        }
        self.write(";");
    }

    /// `<T>(params): R` with `any` for a missing return type.
    pub(crate) fn emit_signature(
        &mut self,
        type_params: &[TypeParam],
        params: &[Param],
        return_type: Option<&TypeNode>,
    ) {
        self.emit_type_params(type_params);
        self.emit_params_typed(params);
        self.write(": ");
        match return_type {
            Some(ty) => self.emit_type(ty),
            None => self.write("any"),
        }
    }

    pub(crate) fn emit_index_signature(&mut self, index: &IndexSignature) {
        if index.readonly {
            self.write("readonly ");
        }
        self.write("[");
        self.write(&index.param_name);
        self.write(": ");
        self.emit_type(&index.param_type);
        self.write("]: ");
        self.emit_type(&index.type_ann);
    }

    /// Enum initializers and other value positions inside declarations.
    pub(crate) fn emit_value_in_declaration(&mut self, expr: &Expr) {
        self.emit_expr_prec(expr, PREC_ASSIGN);
    }
}
