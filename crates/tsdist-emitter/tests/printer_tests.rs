use tsdist_ast::factory::*;
use tsdist_ast::*;
use tsdist_emitter::{print_code, print_declarations};

fn module(statements: Vec<Stmt>) -> SourceFile {
    SourceFile::new("src/index.ts", statements)
}

fn area_function() -> Stmt {
    let Stmt::Function(mut decl) = function_decl(
        ModifierFlags::EXPORT,
        "area",
        vec![param("r", Some(keyword_type(KeywordType::Number)))],
        Some(vec![Stmt::Return(Some(binary(
            BinaryOp::Mul,
            ident_expr("r"),
            ident_expr("r"),
        )))]),
    ) else {
        unreachable!()
    };
    decl.function.return_type = Some(keyword_type(KeywordType::Number));
    Stmt::Function(decl)
}

fn enum_decl(modifiers: ModifierFlags, name: &str, members: Vec<(&str, Option<Expr>)>) -> Stmt {
    Stmt::Enum(EnumDecl {
        modifiers,
        ident: ident(name),
        members: members
            .into_iter()
            .map(|(name, init)| EnumMember {
                name: PropName::Ident(ident_name(name)),
                init,
            })
            .collect(),
    })
}

#[test]
fn code_output_erases_type_syntax() {
    let file = module(vec![
        Stmt::Import(ImportDecl {
            type_only: true,
            default: None,
            namespace: None,
            named: vec![ImportSpecifier {
                imported: None,
                local: ident("Options"),
                type_only: false,
            }],
            specifier: str_lit("./types"),
        }),
        Stmt::Interface(InterfaceDecl {
            modifiers: ModifierFlags::EXPORT,
            ident: ident("Shape"),
            type_params: Vec::new(),
            extends: Vec::new(),
            body: Vec::new(),
        }),
        declare_const("__VERSION__", keyword_type(KeywordType::String)),
        area_function(),
        expr_stmt(call(
            member(ident_expr("console"), "log"),
            vec![ident_expr("__VERSION__")],
        )),
    ]);

    assert_eq!(
        print_code(&file),
        "export function area(r) {\n    return r * r;\n}\nconsole.log(__VERSION__);\n"
    );
}

#[test]
fn type_only_specifiers_are_dropped_from_code_but_kept_in_declarations() {
    let file = module(vec![Stmt::Import(ImportDecl {
        type_only: false,
        default: None,
        namespace: None,
        named: vec![
            ImportSpecifier {
                imported: None,
                local: ident("A"),
                type_only: true,
            },
            ImportSpecifier {
                imported: Some(ident_name("b")),
                local: ident("B"),
                type_only: false,
            },
        ],
        specifier: str_lit("./m"),
    })]);

    assert_eq!(print_code(&file), "import { b as B } from \"./m\";\n");
    assert_eq!(
        print_declarations(&file),
        "import { type A, b as B } from \"./m\";\n"
    );
}

#[test]
fn enums_lower_to_reverse_mapped_objects() {
    let file = module(vec![enum_decl(
        ModifierFlags::EXPORT,
        "Color",
        vec![
            ("Red", None),
            ("Green", Some(num_expr(5.0))),
            ("Blue", None),
            ("Name", Some(str_expr("n"))),
        ],
    )]);

    let expected = "\
export var Color;
(function (Color) {
    Color[Color[\"Red\"] = 0] = \"Red\";
    Color[Color[\"Green\"] = 5] = \"Green\";
    Color[Color[\"Blue\"] = 6] = \"Blue\";
    Color[\"Name\"] = \"n\";
})(Color || (Color = {}));
";
    assert_eq!(print_code(&file), expected);
}

#[test]
fn const_enums_and_type_only_namespaces_are_erased() {
    let file = module(vec![
        enum_decl(
            ModifierFlags::EXPORT | ModifierFlags::CONST,
            "Mode",
            vec![("A", None)],
        ),
        Stmt::Module(ModuleDecl {
            modifiers: ModifierFlags::EXPORT,
            kind: ModuleDeclKind::Namespace,
            name: ModuleName::Ident(ident("Types")),
            body: Some(vec![Stmt::TypeAlias(TypeAliasDecl {
                modifiers: ModifierFlags::EXPORT,
                ident: ident("Id"),
                type_params: Vec::new(),
                type_ann: keyword_type(KeywordType::String),
            })]),
        }),
    ]);
    assert_eq!(print_code(&file), "");
}

#[test]
fn namespace_exports_assign_onto_namespace_object() {
    let file = module(vec![Stmt::Module(ModuleDecl {
        modifiers: ModifierFlags::empty(),
        kind: ModuleDeclKind::Namespace,
        name: ModuleName::Ident(ident("Util")),
        body: Some(vec![
            Stmt::Var(VarDecl {
                modifiers: ModifierFlags::EXPORT,
                kind: VarKind::Const,
                decls: vec![VarDeclarator {
                    name: binding("x", None),
                    init: Some(num_expr(1.0)),
                    definite: false,
                }],
            }),
            function_decl(ModifierFlags::EXPORT, "f", Vec::new(), Some(Vec::new())),
        ]),
    })]);

    let expected = "\
var Util;
(function (Util) {
    Util.x = 1;
    function f() { }
    Util.f = f;
})(Util || (Util = {}));
";
    assert_eq!(print_code(&file), expected);
}

#[test]
fn parameter_properties_are_assigned_after_super() {
    let class = Class {
        super_class: Some(Box::new(ident_expr("Base"))),
        members: vec![
            ClassMember::Property(ClassProp {
                modifiers: ModifierFlags::empty(),
                key: PropName::Ident(ident_name("y")),
                optional: false,
                definite: false,
                type_ann: None,
                value: Some(num_expr(2.0)),
            }),
            ClassMember::Property(ClassProp {
                modifiers: ModifierFlags::empty(),
                key: PropName::Ident(ident_name("z")),
                optional: false,
                definite: false,
                type_ann: Some(keyword_type(KeywordType::String)),
                value: None,
            }),
            ClassMember::Constructor(Constructor {
                modifiers: ModifierFlags::empty(),
                params: vec![Param {
                    modifiers: ModifierFlags::PUBLIC,
                    pat: binding("x", Some(keyword_type(KeywordType::Number))),
                }],
                body: Some(block(vec![expr_stmt(call(Expr::Super, Vec::new()))])),
            }),
        ],
        ..Class::default()
    };
    let file = module(vec![Stmt::Class(ClassDecl {
        modifiers: ModifierFlags::empty(),
        ident: ident("Derived"),
        class,
    })]);

    let expected = "\
class Derived extends Base {
    y = 2;
    constructor(x) {
        super();
        this.x = x;
    }
}
";
    assert_eq!(print_code(&file), expected);
}

#[test]
fn parenthesizes_by_precedence() {
    let cases: Vec<(Expr, &str)> = vec![
        (
            binary(
                BinaryOp::Mul,
                binary(BinaryOp::Add, ident_expr("a"), ident_expr("b")),
                ident_expr("c"),
            ),
            "(a + b) * c;",
        ),
        (
            binary(
                BinaryOp::Sub,
                ident_expr("a"),
                binary(BinaryOp::Sub, ident_expr("b"), ident_expr("c")),
            ),
            "a - (b - c);",
        ),
        (
            binary(
                BinaryOp::NullishCoalescing,
                binary(BinaryOp::LogicalOr, ident_expr("a"), ident_expr("b")),
                ident_expr("c"),
            ),
            "(a || b) ?? c;",
        ),
        (
            binary(
                BinaryOp::Mul,
                Expr::As(AsExpr {
                    expr: Box::new(binary(BinaryOp::Add, ident_expr("a"), ident_expr("b"))),
                    type_ann: keyword_type(KeywordType::Number),
                }),
                ident_expr("c"),
            ),
            "(a + b) * c;",
        ),
        (
            assign(
                Expr::Object(vec![Prop::Shorthand(ident("a"))]),
                ident_expr("obj"),
            ),
            "({ a } = obj);",
        ),
        (call(member(num_expr(1.0), "toString"), Vec::new()), "(1).toString();"),
        (new_expr(call(ident_expr("f"), Vec::new()), Vec::new()), "new (f())();"),
        (
            Expr::Unary(UnaryExpr {
                op: UnaryOp::Minus,
                arg: Box::new(Expr::Unary(UnaryExpr {
                    op: UnaryOp::Minus,
                    arg: Box::new(ident_expr("x")),
                })),
            }),
            "- -x;",
        ),
    ];

    for (expr, expected) in cases {
        let printed = print_code(&module(vec![expr_stmt(expr)]));
        assert_eq!(printed.trim_end(), expected);
    }
}

#[test]
fn arrow_returning_object_literal_is_wrapped() {
    let file = module(vec![var(
        VarKind::Const,
        "make",
        Some(arrow(
            Vec::new(),
            Expr::Object(vec![Prop::KeyValue {
                key: PropName::Ident(ident_name("a")),
                value: num_expr(1.0),
            }]),
        )),
    )]);
    assert_eq!(print_code(&file), "const make = () => ({ a: 1 });\n");
}

#[test]
fn export_assignment_per_output_kind() {
    let file = module(vec![Stmt::ExportAssignment(ident_expr("api"))]);
    assert_eq!(print_code(&file), "module.exports = api;\n");
    assert_eq!(print_declarations(&file), "export = api;\n");
}

#[test]
fn declaration_output_prints_public_surface() {
    let counter = Stmt::Class(ClassDecl {
        modifiers: ModifierFlags::EXPORT,
        ident: ident("Counter"),
        class: Class {
            members: vec![
                ClassMember::Constructor(Constructor {
                    modifiers: ModifierFlags::empty(),
                    params: vec![Param {
                        modifiers: ModifierFlags::PRIVATE | ModifierFlags::READONLY,
                        pat: binding("start", Some(keyword_type(KeywordType::Number))),
                    }],
                    body: Some(block(Vec::new())),
                }),
                ClassMember::Method(ClassMethod {
                    modifiers: ModifierFlags::empty(),
                    key: PropName::Ident(ident_name("next")),
                    kind: MethodKind::Method,
                    optional: false,
                    function: Function {
                        body: Some(block(vec![Stmt::Return(Some(num_expr(1.0)))])),
                        return_type: Some(keyword_type(KeywordType::Number)),
                        ..Function::default()
                    },
                }),
                ClassMember::Property(ClassProp {
                    modifiers: ModifierFlags::STATIC,
                    key: PropName::Ident(ident_name("zero")),
                    optional: false,
                    definite: false,
                    type_ann: None,
                    value: Some(num_expr(0.0)),
                }),
            ],
            ..Class::default()
        },
    });
    let shape = Stmt::Interface(InterfaceDecl {
        modifiers: ModifierFlags::EXPORT,
        ident: ident("Shape"),
        type_params: Vec::new(),
        extends: Vec::new(),
        body: vec![
            TypeMember::Property {
                readonly: true,
                key: PropName::Ident(ident_name("kind")),
                optional: false,
                type_ann: Some(keyword_type(KeywordType::String)),
            },
            TypeMember::Method {
                key: PropName::Ident(ident_name("area")),
                optional: true,
                type_params: Vec::new(),
                params: Vec::new(),
                return_type: Some(keyword_type(KeywordType::Number)),
            },
        ],
    });
    let file = module(vec![
        import_named(&["helper"], "./helper"),
        area_function(),
        Stmt::Var(VarDecl {
            modifiers: ModifierFlags::EXPORT,
            kind: VarKind::Const,
            decls: vec![VarDeclarator {
                name: binding("VERSION", None),
                init: Some(str_expr("1.0")),
                definite: false,
            }],
        }),
        var(VarKind::Let, "count", Some(num_expr(0.0))),
        Stmt::TypeAlias(TypeAliasDecl {
            modifiers: ModifierFlags::EXPORT,
            ident: ident("Id"),
            type_params: Vec::new(),
            type_ann: TypeNode::Union(vec![
                keyword_type(KeywordType::String),
                keyword_type(KeywordType::Number),
            ]),
        }),
        shape,
        enum_decl(
            ModifierFlags::EXPORT | ModifierFlags::CONST,
            "Mode",
            vec![("A", None), ("B", Some(num_expr(4.0))), ("C", None)],
        ),
        counter,
        expr_stmt(call(ident_expr("helper"), Vec::new())),
    ]);

    let expected = "\
import { helper } from \"./helper\";
export declare function area(r: number): number;
export declare const VERSION: \"1.0\";
declare let count: number;
export type Id = string | number;
export interface Shape {
    readonly kind: string;
    area?(): number;
}
export declare const enum Mode {
    A = 0,
    B = 4,
    C = 5
}
export declare class Counter {
    private readonly start;
    constructor(start: number);
    next(): number;
    static zero: number;
}
";
    assert_eq!(print_declarations(&file), expected);
}

#[test]
fn declaration_output_keeps_overloads_and_drops_implementation() {
    let overload = function_decl(
        ModifierFlags::EXPORT,
        "parse",
        vec![param("input", Some(keyword_type(KeywordType::String)))],
        None,
    );
    let implementation = function_decl(
        ModifierFlags::EXPORT,
        "parse",
        vec![param("input", Some(keyword_type(KeywordType::Any)))],
        Some(vec![Stmt::Return(Some(ident_expr("input")))]),
    );
    let file = module(vec![overload, implementation]);

    assert_eq!(
        print_declarations(&file),
        "export declare function parse(input: string): any;\n"
    );
    assert_eq!(
        print_code(&file),
        "export function parse(input) {\n    return input;\n}\n"
    );
}

#[test]
fn ambient_namespace_members_omit_declare() {
    let file = module(vec![Stmt::Module(ModuleDecl {
        modifiers: ModifierFlags::EXPORT | ModifierFlags::DECLARE,
        kind: ModuleDeclKind::Namespace,
        name: ModuleName::Ident(ident("Env")),
        body: Some(vec![declare_const("mode", type_ref("Mode"))]),
    })]);

    assert_eq!(
        print_declarations(&file),
        "export declare namespace Env {\n    const mode: Mode;\n}\n"
    );
    assert_eq!(print_code(&file), "");
}

#[test]
fn import_types_print_with_qualifier() {
    let file = module(vec![declare_const(
        "options",
        import_type("./types", Some("Options")),
    )]);
    assert_eq!(
        print_declarations(&file),
        "declare const options: import(\"./types\").Options;\n"
    );
}
