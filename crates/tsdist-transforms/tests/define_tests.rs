use indexmap::IndexMap;
use tsdist_ast::factory::*;
use tsdist_ast::*;
use tsdist_binder::bind_program;
use tsdist_common::ModuleKind;
use tsdist_emitter::print_code;
use tsdist_transforms::{
    LiteralValue, OutputKind, TransformOptions, create_transformers,
    create_transformers_with_classifier,
};

fn options(defines: &[(&str, LiteralValue)]) -> TransformOptions {
    TransformOptions {
        define_table: defines
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect::<IndexMap<_, _>>(),
        ..TransformOptions::default()
    }
}

/// Bind `source`, run the code-output hooks on a copy and print it.
fn fold(source: &SourceFile, options: &TransformOptions) -> String {
    let program = bind_program(std::slice::from_ref(source));
    let mut transformers = create_transformers(options, ModuleKind::EsModule, &program);
    let mut output = source.clone();
    transformers.apply(OutputKind::Code, &mut output);
    print_code(&output)
}

fn log(arg: Expr) -> Stmt {
    expr_stmt(call(member(ident_expr("console"), "log"), vec![arg]))
}

#[test]
fn folds_free_references_to_ambient_declarations() {
    let source = SourceFile::new(
        "src/index.ts",
        vec![
            declare_const("__VERSION__", keyword_type(KeywordType::String)),
            log(ident_expr("__VERSION__")),
            function_decl(
                ModifierFlags::empty(),
                "local",
                Vec::new(),
                Some(vec![
                    var(VarKind::Const, "__VERSION__", Some(str_expr("dev"))),
                    Stmt::Return(Some(ident_expr("__VERSION__"))),
                ]),
            ),
            function_decl(
                ModifierFlags::empty(),
                "withParam",
                vec![param("__VERSION__", None)],
                Some(vec![Stmt::Return(Some(ident_expr("__VERSION__")))]),
            ),
            Stmt::ExportDefault(ident_expr("__VERSION__")),
        ],
    );

    let printed = fold(
        &source,
        &options(&[("__VERSION__", LiteralValue::String("2".into()))]),
    );

    assert!(printed.contains("console.log(2);"), "{printed}");
    assert!(printed.contains("export default 2;"), "{printed}");
    assert!(printed.contains("const __VERSION__ = \"dev\";"), "{printed}");
    assert_eq!(printed.matches("return __VERSION__;").count(), 2, "{printed}");
}

#[test]
fn locally_declared_keys_are_never_folded() {
    let source = SourceFile::new(
        "src/index.ts",
        vec![
            var(VarKind::Const, "__DEV__", Some(bool_expr(false))),
            log(ident_expr("__DEV__")),
        ],
    );

    let printed = fold(&source, &options(&[("__DEV__", LiteralValue::Boolean(true))]));

    assert_eq!(printed, "const __DEV__ = false;\nconsole.log(__DEV__);\n");
}

#[test]
fn unresolved_references_are_not_folded() {
    let source = SourceFile::new("src/index.ts", vec![log(ident_expr("__DEV__"))]);

    let printed = fold(&source, &options(&[("__DEV__", LiteralValue::Boolean(true))]));

    assert_eq!(printed, "console.log(__DEV__);\n");
}

#[test]
fn shorthand_properties_expand_and_targets_stay() {
    let source = SourceFile::new(
        "src/index.ts",
        vec![
            declare_const("__NAME__", keyword_type(KeywordType::String)),
            function_decl(ModifierFlags::DECLARE, "__CHECK__", Vec::new(), None),
            var(
                VarKind::Const,
                "meta",
                Some(Expr::Object(vec![Prop::Shorthand(ident("__NAME__"))])),
            ),
            expr_stmt(assign(ident_expr("__NAME__"), str_expr("x"))),
            log(member(ident_expr("__NAME__"), "length")),
            expr_stmt(call(ident_expr("__CHECK__"), vec![ident_expr("__CHECK__")])),
        ],
    );

    let printed = fold(
        &source,
        &options(&[
            ("__NAME__", LiteralValue::String("\"lib\"".into())),
            ("__CHECK__", LiteralValue::Boolean(true)),
        ]),
    );

    assert!(printed.contains("const meta = { __NAME__: \"lib\" };"), "{printed}");
    assert!(printed.contains("__NAME__ = \"x\";"), "{printed}");
    assert!(printed.contains("console.log((\"lib\").length);"), "{printed}");
    assert!(printed.contains("__CHECK__(true);"), "{printed}");
}

fn computed(object: Expr, prop: Expr) -> Expr {
    Expr::Member(MemberExpr {
        object: Box::new(object),
        prop: MemberProp::Computed(Box::new(prop)),
        optional: false,
    })
}

#[test]
fn computed_keys_in_assignment_targets_fold() {
    let source = SourceFile::new(
        "src/index.ts",
        vec![
            declare_const("__KEY__", keyword_type(KeywordType::String)),
            var(VarKind::Const, "registry", Some(Expr::Object(Vec::new()))),
            expr_stmt(assign(
                computed(ident_expr("registry"), ident_expr("__KEY__")),
                ident_expr("__KEY__"),
            )),
            expr_stmt(Expr::Update(UpdateExpr {
                op: UpdateOp::Increment,
                prefix: false,
                arg: Box::new(computed(ident_expr("registry"), ident_expr("__KEY__"))),
            })),
            expr_stmt(assign(ident_expr("__KEY__"), str_expr("x"))),
            expr_stmt(assign(member(ident_expr("__KEY__"), "length"), num_expr(0.0))),
        ],
    );

    let printed = fold(
        &source,
        &options(&[("__KEY__", LiteralValue::String("\"k\"".into()))]),
    );

    assert!(printed.contains("registry[\"k\"] = \"k\";"), "{printed}");
    assert!(printed.contains("registry[\"k\"]++;"), "{printed}");
    assert!(printed.contains("__KEY__ = \"x\";"), "{printed}");
    assert!(printed.contains("__KEY__.length = 0;"), "{printed}");
}

#[test]
fn every_literal_kind_prints_as_source() {
    let names = ["S", "N", "B", "Z", "U", "NAN", "SYM", "D", "R"];
    let source = SourceFile::new(
        "src/index.ts",
        vec![expr_stmt(call(
            ident_expr("use"),
            names.iter().map(|name| ident_expr(*name)).collect(),
        ))],
    );
    let options = options(&[
        ("S", LiteralValue::String("\"a\"".into())),
        ("N", LiteralValue::Number(1.5)),
        ("B", LiteralValue::Boolean(true)),
        ("Z", LiteralValue::Null),
        ("U", LiteralValue::Undefined),
        ("NAN", LiteralValue::NaN),
        ("SYM", LiteralValue::Symbol("tok".into())),
        ("D", LiteralValue::Date(0.0)),
        ("R", LiteralValue::Regex("/x+/g".into())),
    ]);

    let always = |_: &Ident| true;
    let mut transformers =
        create_transformers_with_classifier(&options, ModuleKind::CommonJs, Box::new(always));
    let mut output = source.clone();
    transformers.apply(OutputKind::Code, &mut output);

    assert_eq!(
        print_code(&output),
        "use(\"a\", 1.5, true, null, undefined, NaN, Symbol(\"tok\"), new Date(0), /x+/g);\n"
    );
}

#[test]
fn declaration_hooks_do_not_fold() {
    let options = options(&[("__DEV__", LiteralValue::Boolean(true))]);
    let always = |_: &Ident| true;
    let mut transformers =
        create_transformers_with_classifier(&options, ModuleKind::CommonJs, Box::new(always));
    assert_eq!(transformers.after.len(), 2);
    assert_eq!(transformers.after_declarations.len(), 1);

    let mut declarations = SourceFile::new(
        "src/index.d.ts",
        vec![Stmt::ExportDefault(ident_expr("__DEV__"))],
    );
    transformers.apply(OutputKind::Declarations, &mut declarations);
    assert!(matches!(
        &declarations.statements[0],
        Stmt::ExportDefault(Expr::Ident(ident)) if ident.name == "__DEV__"
    ));
}

#[test]
fn empty_define_table_adds_no_fold_pass() {
    let program = bind_program(&[]);
    let transformers =
        create_transformers(&TransformOptions::default(), ModuleKind::CommonJs, &program);
    assert_eq!(transformers.after.len(), 1);
}
