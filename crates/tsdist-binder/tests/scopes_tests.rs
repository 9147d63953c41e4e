use tsdist_ast::factory::*;
use tsdist_ast::*;
use tsdist_binder::{bind_file, bind_program};

fn declaration_of<'a>(checker: &'a dyn Checker, ident: &Ident) -> Option<&'a Declaration> {
    let symbol = checker.symbol_at_location(ident)?;
    checker.declarations_of(symbol).first()
}

fn return_ident(stmt: &Stmt) -> &Ident {
    let Stmt::Function(decl) = stmt else {
        panic!("expected function declaration");
    };
    let body = decl.function.body.as_ref().expect("function body");
    match body.stmts.last() {
        Some(Stmt::Return(Some(Expr::Ident(ident)))) => ident,
        other => panic!("expected `return <ident>`, got {other:?}"),
    }
}

fn expr_ident(stmt: &Stmt) -> &Ident {
    match stmt {
        Stmt::Expr(Expr::Ident(ident)) => ident,
        other => panic!("expected identifier statement, got {other:?}"),
    }
}

#[test]
fn ambient_const_reference_resolves_to_declared_symbol() {
    let file = SourceFile::new(
        "src/index.ts",
        vec![
            declare_const("__VERSION__", keyword_type(KeywordType::String)),
            expr_stmt(ident_expr("__VERSION__")),
            Stmt::ExportDefault(num_expr(1.0)),
        ],
    );
    let program = bind_file(&file);

    let decl = declaration_of(&program, expr_ident(&file.statements[1])).expect("resolved");
    assert_eq!(decl.kind, DeclarationKind::Variable);
    assert!(decl.ambient);
}

#[test]
fn local_const_shadows_outer_ambient() {
    let file = SourceFile::new(
        "src/index.ts",
        vec![
            declare_const("__VERSION__", keyword_type(KeywordType::String)),
            function_decl(
                ModifierFlags::EXPORT,
                "f",
                Vec::new(),
                Some(vec![
                    var(VarKind::Const, "__VERSION__", Some(num_expr(1.0))),
                    Stmt::Return(Some(ident_expr("__VERSION__"))),
                ]),
            ),
        ],
    );
    let program = bind_file(&file);

    let decl = declaration_of(&program, return_ident(&file.statements[1])).expect("resolved");
    assert_eq!(decl.kind, DeclarationKind::Variable);
    assert!(!decl.ambient);
}

#[test]
fn var_in_nested_block_is_function_scoped() {
    let file = SourceFile::new(
        "src/index.ts",
        vec![function_decl(
            ModifierFlags::EXPORT,
            "f",
            Vec::new(),
            Some(vec![
                Stmt::Block(block(vec![var(VarKind::Var, "hoisted", None)])),
                Stmt::Return(Some(ident_expr("hoisted"))),
            ]),
        )],
    );
    let program = bind_file(&file);

    let decl = declaration_of(&program, return_ident(&file.statements[0])).expect("resolved");
    assert_eq!(decl.kind, DeclarationKind::Variable);
}

#[test]
fn let_in_nested_block_does_not_leak() {
    let file = SourceFile::new(
        "src/index.ts",
        vec![function_decl(
            ModifierFlags::EXPORT,
            "f",
            Vec::new(),
            Some(vec![
                Stmt::Block(block(vec![var(VarKind::Let, "scoped", None)])),
                Stmt::Return(Some(ident_expr("scoped"))),
            ]),
        )],
    );
    let program = bind_file(&file);

    assert!(program
        .symbol_at_location(return_ident(&file.statements[0]))
        .is_none());
}

#[test]
fn parameters_bind_as_parameters() {
    let file = SourceFile::new(
        "src/index.ts",
        vec![
            declare_const("DEBUG", keyword_type(KeywordType::Boolean)),
            function_decl(
                ModifierFlags::EXPORT,
                "f",
                vec![param("DEBUG", None)],
                Some(vec![Stmt::Return(Some(ident_expr("DEBUG")))]),
            ),
        ],
    );
    let program = bind_file(&file);

    let decl = declaration_of(&program, return_ident(&file.statements[1])).expect("resolved");
    assert_eq!(decl.kind, DeclarationKind::Parameter);
}

#[test]
fn unresolved_global_has_no_symbol() {
    let file = SourceFile::new("src/index.ts", vec![expr_stmt(ident_expr("process"))]);
    let program = bind_file(&file);
    assert!(program
        .symbol_at_location(expr_ident(&file.statements[0]))
        .is_none());
}

#[test]
fn script_declaration_file_contributes_globals() {
    let globals = SourceFile::new(
        "src/globals.d.ts",
        vec![Stmt::Var(VarDecl {
            modifiers: ModifierFlags::empty(),
            kind: VarKind::Const,
            decls: vec![VarDeclarator {
                name: binding("__DEV__", Some(keyword_type(KeywordType::Boolean))),
                init: None,
                definite: false,
            }],
        })],
    );
    let index = SourceFile::new(
        "src/index.ts",
        vec![
            expr_stmt(ident_expr("__DEV__")),
            Stmt::ExportDefault(num_expr(0.0)),
        ],
    );
    assert!(!globals.is_external_module());
    assert!(index.is_external_module());

    let files = vec![index, globals];
    let program = bind_program(&files);

    let decl = declaration_of(&program, expr_ident(&files[0].statements[0])).expect("resolved");
    assert!(decl.ambient, "declarations in .d.ts files are ambient");
}

#[test]
fn members_of_declare_namespace_are_ambient() {
    let namespace = Stmt::Module(ModuleDecl {
        modifiers: ModifierFlags::DECLARE,
        kind: ModuleDeclKind::Namespace,
        name: ModuleName::Ident(ident("Build")),
        body: Some(vec![
            function_decl(ModifierFlags::EXPORT, "stamp", Vec::new(), None),
            expr_stmt(ident_expr("stamp")),
        ]),
    });
    let file = SourceFile::new("src/index.ts", vec![namespace]);
    let program = bind_file(&file);

    let Stmt::Module(decl) = &file.statements[0] else {
        unreachable!()
    };
    let body = decl.body.as_ref().expect("namespace body");
    let decl = declaration_of(&program, expr_ident(&body[1])).expect("resolved");
    assert_eq!(decl.kind, DeclarationKind::Function);
    assert!(decl.ambient);
}

#[test]
fn interface_and_declared_var_merge_into_one_symbol() {
    let file = SourceFile::new(
        "src/index.ts",
        vec![
            Stmt::Interface(InterfaceDecl {
                modifiers: ModifierFlags::empty(),
                ident: ident("Env"),
                type_params: Vec::new(),
                extends: Vec::new(),
                body: Vec::new(),
            }),
            declare_const("Env", type_ref("Env")),
            expr_stmt(ident_expr("Env")),
            Stmt::ExportDefault(num_expr(0.0)),
        ],
    );
    let program = bind_file(&file);

    let symbol = program
        .symbol_at_location(expr_ident(&file.statements[2]))
        .expect("resolved");
    let kinds: Vec<DeclarationKind> = program
        .declarations_of(symbol)
        .iter()
        .map(|decl| decl.kind)
        .collect();
    assert_eq!(kinds, vec![DeclarationKind::Interface, DeclarationKind::Variable]);
    assert_eq!(program.symbol_name(symbol), Some("Env"));
}

#[test]
fn type_only_symbols_do_not_capture_value_references() {
    let file = SourceFile::new(
        "src/index.ts",
        vec![
            Stmt::TypeAlias(TypeAliasDecl {
                modifiers: ModifierFlags::empty(),
                ident: ident("Mode"),
                type_params: Vec::new(),
                type_ann: keyword_type(KeywordType::String),
            }),
            expr_stmt(ident_expr("Mode")),
        ],
    );
    let program = bind_file(&file);
    assert!(program
        .symbol_at_location(expr_ident(&file.statements[1]))
        .is_none());
}

#[test]
fn catch_binding_shadows_outer_name() {
    let file = SourceFile::new(
        "src/index.ts",
        vec![
            declare_const("err", keyword_type(KeywordType::Any)),
            Stmt::Try(TryStmt {
                block: block(Vec::new()),
                handler: Some(CatchClause {
                    param: Some(binding("err", None)),
                    body: block(vec![expr_stmt(ident_expr("err"))]),
                }),
                finalizer: None,
            }),
        ],
    );
    let program = bind_file(&file);

    let Stmt::Try(try_stmt) = &file.statements[1] else {
        unreachable!()
    };
    let handler = try_stmt.handler.as_ref().expect("handler");
    let decl = declaration_of(&program, expr_ident(&handler.body.stmts[0])).expect("resolved");
    assert_eq!(decl.kind, DeclarationKind::CatchBinding);
}
