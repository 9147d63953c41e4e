//! Expression, pattern and function printing.
//!
//! Type syntax inside expressions (`as`, `satisfies`, `!`, type arguments,
//! parameter annotations) is never printed here; declaration output prints
//! signatures through `types.rs` instead.

use crate::{Printer, format_number};
use tsdist_ast::*;

pub(crate) const PREC_LOWEST: u8 = 0;
pub(crate) const PREC_COMMA: u8 = 1;
pub(crate) const PREC_ASSIGN: u8 = 2;
pub(crate) const PREC_CONDITIONAL: u8 = 3;
pub(crate) const PREC_COALESCE: u8 = 4;
pub(crate) const PREC_UNARY: u8 = 16;
pub(crate) const PREC_POSTFIX: u8 = 17;
pub(crate) const PREC_NEW_NO_ARGS: u8 = 18;
pub(crate) const PREC_MEMBER: u8 = 19;
pub(crate) const PREC_PRIMARY: u8 = 20;

pub(crate) fn expr_precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Seq(_) => PREC_COMMA,
        Expr::Arrow(_) | Expr::Yield(_) | Expr::Assign(_) | Expr::Spread(_) => PREC_ASSIGN,
        Expr::Cond(_) => PREC_CONDITIONAL,
        Expr::Binary(binary) => binary.op.precedence(),
        Expr::Unary(_) | Expr::Await(_) => PREC_UNARY,
        Expr::Update(update) if update.prefix => PREC_UNARY,
        Expr::Update(_) => PREC_POSTFIX,
        Expr::New(NewExpr { args: None, .. }) => PREC_NEW_NO_ARGS,
        Expr::Call(_) | Expr::New(_) | Expr::Member(_) | Expr::TaggedTemplate(_) => PREC_MEMBER,
        Expr::As(as_expr) | Expr::Satisfies(as_expr) => expr_precedence(&as_expr.expr),
        Expr::NonNull(inner) => expr_precedence(inner),
        Expr::Lit(Lit::Num(num)) if is_negative_number(num) => PREC_UNARY,
        _ => PREC_PRIMARY,
    }
}

fn is_negative_number(num: &NumLit) -> bool {
    match &num.raw {
        Some(raw) => raw.starts_with('-'),
        None => num.value.is_sign_negative() && num.value != 0.0,
    }
}

/// Leftmost primary of an expression, looking through operators that
/// print their left operand first.
pub(crate) fn leftmost(expr: &Expr) -> &Expr {
    match expr {
        Expr::Binary(binary) => leftmost(&binary.left),
        Expr::Assign(assign) => leftmost(&assign.left),
        Expr::Cond(cond) => leftmost(&cond.test),
        Expr::Seq(exprs) => exprs.first().map_or(expr, leftmost),
        Expr::Call(CallExpr {
            callee: Callee::Expr(callee),
            ..
        }) => leftmost(callee),
        Expr::Member(member) => leftmost(&member.object),
        Expr::TaggedTemplate(tagged) => leftmost(&tagged.tag),
        Expr::Update(update) if !update.prefix => leftmost(&update.arg),
        Expr::As(as_expr) | Expr::Satisfies(as_expr) => leftmost(&as_expr.expr),
        Expr::NonNull(inner) => leftmost(inner),
        _ => expr,
    }
}

/// Expression statements cannot begin with `{`, `function` or `class`.
pub(crate) fn needs_statement_parens(expr: &Expr) -> bool {
    matches!(
        leftmost(expr),
        Expr::Object(_) | Expr::Function(_) | Expr::Class(_)
    )
}

impl Printer {
    pub(crate) fn emit_expr(&mut self, expr: &Expr) {
        self.emit_expr_prec(expr, PREC_LOWEST);
    }

    pub(crate) fn emit_expr_prec(&mut self, expr: &Expr, min_prec: u8) {
        match expr {
            Expr::As(as_expr) | Expr::Satisfies(as_expr) => {
                return self.emit_expr_prec(&as_expr.expr, min_prec);
            }
            Expr::NonNull(inner) => return self.emit_expr_prec(inner, min_prec),
            _ => {}
        }
        if expr_precedence(expr) < min_prec {
            self.write("(");
            self.emit_expr_inner(expr);
            self.write(")");
        } else {
            self.emit_expr_inner(expr);
        }
    }

    fn emit_expr_inner(&mut self, expr: &Expr) {
        match expr {
            Expr::This => self.write("this"),
            Expr::Super => self.write("super"),
            Expr::Ident(ident) => self.write(&ident.name),
            Expr::Lit(lit) => self.emit_lit(lit),
            Expr::Raw(text) => self.write(text),
            Expr::Template(template) => self.emit_template(template),
            Expr::TaggedTemplate(tagged) => {
                self.emit_expr_prec(&tagged.tag, PREC_MEMBER);
                self.emit_template(&tagged.template);
            }
            Expr::Array(elems) => {
                self.write("[");
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(elem) = elem {
                        self.emit_expr_prec(elem, PREC_ASSIGN);
                    }
                }
                if matches!(elems.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            Expr::Object(props) => self.emit_object(props),
            Expr::Function(fn_expr) => {
                self.emit_function_js(fn_expr.ident.as_ref().map(|i| i.name.as_str()), &fn_expr.function)
            }
            Expr::Arrow(arrow) => self.emit_arrow(arrow),
            Expr::Class(class_expr) => self.emit_class_js(
                class_expr.ident.as_ref().map(|i| i.name.as_str()),
                &class_expr.class,
            ),
            Expr::Unary(unary) => {
                self.write(unary.op.as_str());
                if unary.op.is_keyword() || unary_needs_space(unary) {
                    self.write(" ");
                }
                self.emit_expr_prec(&unary.arg, PREC_UNARY);
            }
            Expr::Update(update) => {
                let op = match update.op {
                    UpdateOp::Increment => "++",
                    UpdateOp::Decrement => "--",
                };
                if update.prefix {
                    self.write(op);
                    self.emit_expr_prec(&update.arg, PREC_UNARY);
                } else {
                    self.emit_expr_prec(&update.arg, PREC_MEMBER);
                    self.write(op);
                }
            }
            Expr::Binary(binary) => self.emit_binary(binary),
            Expr::Assign(assign) => {
                self.emit_expr_prec(&assign.left, PREC_POSTFIX);
                self.write(" ");
                self.write(assign.op.as_str());
                self.write(" ");
                self.emit_expr_prec(&assign.right, PREC_ASSIGN);
            }
            Expr::Cond(cond) => {
                self.emit_expr_prec(&cond.test, PREC_COALESCE);
                self.write(" ? ");
                self.emit_expr_prec(&cond.cons, PREC_ASSIGN);
                self.write(" : ");
                self.emit_expr_prec(&cond.alt, PREC_ASSIGN);
            }
            Expr::Call(call) => {
                match &call.callee {
                    Callee::Import => self.write("import"),
                    Callee::Expr(callee) => self.emit_expr_prec(callee, PREC_MEMBER),
                }
                if call.optional {
                    self.write("?.");
                }
                self.emit_args(&call.args);
            }
            Expr::New(new_expr) => {
                self.write("new ");
                if contains_call(&new_expr.callee) {
                    self.write("(");
                    self.emit_expr(&new_expr.callee);
                    self.write(")");
                } else {
                    self.emit_expr_prec(&new_expr.callee, PREC_MEMBER);
                }
                if let Some(args) = &new_expr.args {
                    self.emit_args(args);
                }
            }
            Expr::Member(member) => {
                if is_bare_integer(&member.object) {
                    self.write("(");
                    self.emit_expr(&member.object);
                    self.write(")");
                } else {
                    self.emit_expr_prec(&member.object, PREC_MEMBER);
                }
                match &member.prop {
                    MemberProp::Ident(name) => {
                        self.write(if member.optional { "?." } else { "." });
                        self.write(&name.name);
                    }
                    MemberProp::PrivateName(name) => {
                        self.write(if member.optional { "?.#" } else { ".#" });
                        self.write(name);
                    }
                    MemberProp::Computed(prop) => {
                        if member.optional {
                            self.write("?.");
                        }
                        self.write("[");
                        self.emit_expr(prop);
                        self.write("]");
                    }
                }
            }
            Expr::Seq(exprs) => {
                self.write_comma_list(exprs, |this, expr| this.emit_expr_prec(expr, PREC_ASSIGN))
            }
            Expr::Paren(inner) => {
                self.write("(");
                self.emit_expr(inner);
                self.write(")");
            }
            Expr::Spread(inner) => {
                self.write("...");
                self.emit_expr_prec(inner, PREC_ASSIGN);
            }
            Expr::Await(inner) => {
                self.write("await ");
                self.emit_expr_prec(inner, PREC_UNARY);
            }
            Expr::Yield(yield_expr) => {
                self.write(if yield_expr.delegate { "yield*" } else { "yield" });
                if let Some(arg) = &yield_expr.arg {
                    self.write(" ");
                    self.emit_expr_prec(arg, PREC_ASSIGN);
                }
            }
            Expr::As(as_expr) | Expr::Satisfies(as_expr) => self.emit_expr_inner(&as_expr.expr),
            Expr::NonNull(inner) => self.emit_expr_inner(inner),
        }
    }

    fn emit_binary(&mut self, binary: &BinaryExpr) {
        let prec = binary.op.precedence();
        let (left_min, right_min) = if binary.op == BinaryOp::Exp {
            (PREC_POSTFIX, prec)
        } else {
            (prec, prec + 1)
        };
        self.emit_binary_operand(binary.op, &binary.left, left_min);
        self.write(" ");
        self.write(binary.op.as_str());
        self.write(" ");
        self.emit_binary_operand(binary.op, &binary.right, right_min);
    }

    fn emit_binary_operand(&mut self, parent: BinaryOp, operand: &Expr, min_prec: u8) {
        // `??` cannot be mixed with `||`/`&&` without parentheses.
        let mixes_coalesce = match operand {
            Expr::Binary(child) => {
                let is_logical = |op| matches!(op, BinaryOp::LogicalOr | BinaryOp::LogicalAnd);
                (parent == BinaryOp::NullishCoalescing && is_logical(child.op))
                    || (is_logical(parent) && child.op == BinaryOp::NullishCoalescing)
            }
            _ => false,
        };
        if mixes_coalesce {
            self.write("(");
            self.emit_expr(operand);
            self.write(")");
        } else {
            self.emit_expr_prec(operand, min_prec);
        }
    }

    fn emit_args(&mut self, args: &[Expr]) {
        self.write("(");
        self.write_comma_list(args, |this, arg| this.emit_expr_prec(arg, PREC_ASSIGN));
        self.write(")");
    }

    pub(crate) fn emit_lit(&mut self, lit: &Lit) {
        match lit {
            Lit::Str(str_lit) => self.write_string_literal(&str_lit.value, str_lit.single_quote),
            Lit::Num(num) => match &num.raw {
                Some(raw) => self.write(raw),
                None => self.write(&format_number(num.value)),
            },
            Lit::BigInt(digits) => {
                self.write(digits);
                self.write("n");
            }
            Lit::Bool(value) => self.write(if *value { "true" } else { "false" }),
            Lit::Null => self.write("null"),
            Lit::Regex(regex) => {
                self.write("/");
                self.write(&regex.pattern);
                self.write("/");
                self.write(&regex.flags);
            }
        }
    }

    fn emit_template(&mut self, template: &TemplateLit) {
        self.write("`");
        for (i, quasi) in template.quasis.iter().enumerate() {
            self.write(quasi);
            if let Some(expr) = template.exprs.get(i) {
                self.write("${");
                self.emit_expr(expr);
                self.write("}");
            }
        }
        self.write("`");
    }

    fn emit_object(&mut self, props: &[Prop]) {
        if props.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{ ");
        self.write_comma_list(props, |this, prop| match prop {
            Prop::KeyValue { key, value } => {
                this.emit_prop_name(key);
                this.write(": ");
                this.emit_expr_prec(value, PREC_ASSIGN);
            }
            Prop::Shorthand(ident) => this.write(&ident.name),
            Prop::Method {
                key,
                kind,
                function,
            } => this.emit_method_js(ModifierFlags::empty(), key, *kind, function),
            Prop::Spread(expr) => {
                this.write("...");
                this.emit_expr_prec(expr, PREC_ASSIGN);
            }
        });
        self.write(" }");
    }

    pub(crate) fn emit_prop_name(&mut self, name: &PropName) {
        match name {
            PropName::Ident(ident) => self.write(&ident.name),
            PropName::Str(str_lit) => self.write_string_literal(&str_lit.value, str_lit.single_quote),
            PropName::Num(num) => self.emit_lit(&Lit::Num(num.clone())),
            PropName::Computed(expr) => {
                self.write("[");
                self.emit_expr_prec(expr, PREC_ASSIGN);
                self.write("]");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Functions
    // -----------------------------------------------------------------------

    pub(crate) fn emit_function_js(&mut self, name: Option<&str>, function: &Function) {
        if function.is_async {
            self.write("async ");
        }
        self.write("function");
        if function.is_generator {
            self.write("*");
        }
        if let Some(name) = name {
            self.write(" ");
            self.write(name);
        }
        self.emit_params_js(&function.params);
        self.write(" ");
        match &function.body {
            Some(body) => self.emit_block(body),
            None => self.write("{ }"),
        }
    }

    /// Object-literal and class method: `async *key(params) { ... }`
    pub(crate) fn emit_method_js(
        &mut self,
        modifiers: ModifierFlags,
        key: &PropName,
        kind: MethodKind,
        function: &Function,
    ) {
        if modifiers.contains(ModifierFlags::STATIC) {
            self.write("static ");
        }
        match kind {
            MethodKind::Getter => self.write("get "),
            MethodKind::Setter => self.write("set "),
            MethodKind::Method => {}
        }
        if function.is_async {
            self.write("async ");
        }
        if function.is_generator {
            self.write("*");
        }
        self.emit_prop_name(key);
        self.emit_params_js(&function.params);
        self.write(" ");
        match &function.body {
            Some(body) => self.emit_block(body),
            None => self.write("{ }"),
        }
    }

    fn emit_arrow(&mut self, arrow: &ArrowExpr) {
        if arrow.is_async {
            self.write("async ");
        }
        self.emit_params_js(&arrow.params);
        self.write(" => ");
        match &arrow.body {
            ArrowBody::Block(block) => self.emit_block(block),
            ArrowBody::Expr(body) => {
                if matches!(leftmost(body), Expr::Object(_)) {
                    self.write("(");
                    self.emit_expr(body);
                    self.write(")");
                } else {
                    self.emit_expr_prec(body, PREC_ASSIGN);
                }
            }
        }
    }

    /// Parameter list without annotations, accessibility modifiers or a
    /// `this` parameter.
    pub(crate) fn emit_params_js(&mut self, params: &[Param]) {
        let params: Vec<&Param> = params.iter().filter(|p| !is_this_param(p)).collect();
        self.write("(");
        self.write_comma_list(&params, |this, param| this.emit_pat_js(&param.pat));
        self.write(")");
    }

    pub(crate) fn emit_pat_js(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(binding) => self.write(&binding.ident.name),
            Pat::Array(array) => {
                self.write("[");
                for (i, elem) in array.elems.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    if let Some(elem) = elem {
                        self.emit_pat_js(elem);
                    }
                }
                if matches!(array.elems.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            Pat::Object(object) => {
                if object.props.is_empty() {
                    self.write("{}");
                    return;
                }
                self.write("{ ");
                self.write_comma_list(&object.props, |this, prop| match prop {
                    ObjectPatProp::KeyValue { key, value } => {
                        this.emit_prop_name(key);
                        this.write(": ");
                        this.emit_pat_js(value);
                    }
                    ObjectPatProp::Shorthand { ident, default } => {
                        this.write(&ident.name);
                        if let Some(default) = default {
                            this.write(" = ");
                            this.emit_expr_prec(default, PREC_ASSIGN);
                        }
                    }
                    ObjectPatProp::Rest(rest) => {
                        this.write("...");
                        this.emit_pat_js(&rest.arg);
                    }
                });
                self.write(" }");
            }
            Pat::Rest(rest) => {
                self.write("...");
                self.emit_pat_js(&rest.arg);
            }
            Pat::Assign(assign) => {
                self.emit_pat_js(&assign.left);
                self.write(" = ");
                self.emit_expr_prec(&assign.right, PREC_ASSIGN);
            }
        }
    }
}

pub(crate) fn is_this_param(param: &Param) -> bool {
    matches!(&param.pat, Pat::Ident(binding) if binding.ident.name == "this")
}

fn unary_needs_space(unary: &UnaryExpr) -> bool {
    let sign = match unary.op {
        UnaryOp::Minus => '-',
        UnaryOp::Plus => '+',
        _ => return false,
    };
    match unary.arg.as_ref() {
        Expr::Unary(inner) => inner.op.as_str().starts_with(sign),
        Expr::Update(inner) => {
            inner.prefix
                && matches!(
                    (sign, inner.op),
                    ('-', UpdateOp::Decrement) | ('+', UpdateOp::Increment)
                )
        }
        Expr::Lit(Lit::Num(num)) => sign == '-' && is_negative_number(num),
        _ => false,
    }
}

fn contains_call(expr: &Expr) -> bool {
    match expr {
        Expr::Call(_) => true,
        Expr::Member(member) => contains_call(&member.object),
        Expr::TaggedTemplate(tagged) => contains_call(&tagged.tag),
        _ => false,
    }
}

/// `1.toString()` is a syntax error; `(1).toString()` is not.
fn is_bare_integer(expr: &Expr) -> bool {
    match expr {
        Expr::Lit(Lit::Num(num)) => {
            let text = num.raw.clone().unwrap_or_else(|| format_number(num.value));
            !text.contains(['.', 'e', 'E', 'x', 'X', 'o', 'O', 'b', 'B'])
                && !matches!(text.as_str(), "NaN" | "Infinity" | "-Infinity")
        }
        _ => false,
    }
}
