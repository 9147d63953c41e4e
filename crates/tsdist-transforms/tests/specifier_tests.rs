use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tsdist_ast::factory::*;
use tsdist_ast::*;
use tsdist_common::ModuleKind;
use tsdist_transforms::{
    ModuleResolver, ModuleSuffix, NodeModuleResolver, OutputKind, SpecifierRewriter,
    TransformOptions, Transformer,
};

const VIRTUAL_FILE: &str = "/virtual/project/src/index.ts";

fn rewriter(suffix: ModuleSuffix, module_kind: ModuleKind, output: OutputKind) -> SpecifierRewriter {
    let options = TransformOptions {
        module_suffix: suffix,
        ..TransformOptions::default()
    };
    SpecifierRewriter::new(&options, module_kind, output)
}

fn code_rewriter(suffix: ModuleSuffix, module_kind: ModuleKind) -> SpecifierRewriter {
    rewriter(suffix, module_kind, OutputKind::Code)
}

/// A project with a directory carrying a manifest and one without.
fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    let with_manifest = dir.path().join("with-manifest");
    fs::create_dir_all(with_manifest.join("lib")).unwrap();
    fs::write(
        with_manifest.join("package.json"),
        r#"{ "name": "inner", "main": "lib/entry.ts" }"#,
    )
    .unwrap();
    fs::write(with_manifest.join("lib/entry.ts"), "export {};").unwrap();
    fs::create_dir_all(dir.path().join("plain")).unwrap();
    fs::write(dir.path().join("plain/index.ts"), "export {};").unwrap();
    fs::write(dir.path().join("main.ts"), "").unwrap();
    dir
}

#[test]
fn node_suffix_follows_module_kind() {
    let file = Path::new(VIRTUAL_FILE);
    let esm = code_rewriter(ModuleSuffix::Node, ModuleKind::EsModule);
    let cjs = code_rewriter(ModuleSuffix::Node, ModuleKind::CommonJs);

    assert_eq!(esm.rewrite_specifier("../helper", file), "../helper.mjs");
    assert_eq!(cjs.rewrite_specifier("../helper", file), "../helper.js");
}

#[test]
fn default_and_none_suffix_policies() {
    let file = Path::new(VIRTUAL_FILE);
    let default = code_rewriter(ModuleSuffix::Default, ModuleKind::EsModule);
    let none = code_rewriter(ModuleSuffix::None, ModuleKind::EsModule);

    assert_eq!(default.rewrite_specifier("./util", file), "./util.js");
    assert_eq!(default.rewrite_specifier("./util.ts", file), "./util.js");
    assert_eq!(default.rewrite_specifier("./types.d.ts", file), "./types.js");
    assert_eq!(none.rewrite_specifier("./util.ts", file), "./util");
}

#[test]
fn declaration_output_never_gets_a_suffix() {
    let file = Path::new(VIRTUAL_FILE);
    let declarations = rewriter(ModuleSuffix::Node, ModuleKind::EsModule, OutputKind::Declarations);

    assert_eq!(declarations.rewrite_specifier("./util", file), "./util");
    assert_eq!(declarations.rewrite_specifier("./util.mjs", file), "./util");
}

#[test]
fn bare_and_json_specifiers_are_untouched() {
    let file = Path::new(VIRTUAL_FILE);
    let rewriter = code_rewriter(ModuleSuffix::Default, ModuleKind::CommonJs);

    for specifier in ["lodash", "@scope/pkg/sub", "node:fs", "tslib", "./data.json", ".hidden"] {
        assert_eq!(rewriter.rewrite_specifier(specifier, file), specifier);
    }
}

#[test]
fn rewriting_relative_specifiers_is_idempotent() {
    let dir = fixture();
    let file = dir.path().join("main.ts");
    let specifiers = [
        "./a",
        "../b/c",
        "./lib/index.ts",
        "./x.d.ts",
        "./with-manifest",
        "./plain",
        ".",
    ];

    for (suffix, kind) in [
        (ModuleSuffix::Default, ModuleKind::CommonJs),
        (ModuleSuffix::Node, ModuleKind::EsModule),
        (ModuleSuffix::None, ModuleKind::EsModule),
    ] {
        let rewriter = code_rewriter(suffix, kind);
        for specifier in specifiers {
            let once = rewriter.rewrite_specifier(specifier, &file);
            let twice = rewriter.rewrite_specifier(&once, &file);
            assert_eq!(once, twice, "{specifier} with {suffix} on {kind}");
        }
    }
}

#[test]
fn directory_specifiers_follow_manifest_main_or_index() {
    let dir = fixture();
    let declarations = rewriter(ModuleSuffix::Default, ModuleKind::CommonJs, OutputKind::Declarations);

    let in_manifest_dir = dir.path().join("with-manifest/consumer.ts");
    let in_plain_dir = dir.path().join("plain/consumer.ts");
    assert_eq!(declarations.rewrite_specifier(".", &in_manifest_dir), "./lib/entry");
    assert_eq!(declarations.rewrite_specifier(".", &in_plain_dir), "./index");

    let code = code_rewriter(ModuleSuffix::Default, ModuleKind::CommonJs);
    let root_file = dir.path().join("main.ts");
    assert_eq!(
        code.rewrite_specifier("./with-manifest", &root_file),
        "./with-manifest/lib/entry.js"
    );
    assert_eq!(code.rewrite_specifier("./plain", &root_file), "./plain/index.js");
}

#[test]
fn file_wins_over_directory_of_the_same_name() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("lib")).unwrap();
    fs::write(src.join("lib.ts"), "export {};").unwrap();
    fs::write(src.join("lib/index.ts"), "export {};").unwrap();
    let importer = src.join("main.ts");

    let resolved = NodeModuleResolver::new()
        .resolve_module("./lib", &importer)
        .unwrap();
    assert_eq!(resolved.resolved_path.file_name().unwrap(), "lib.ts");

    let code = code_rewriter(ModuleSuffix::Default, ModuleKind::EsModule);
    assert_eq!(code.rewrite_specifier("./lib", &importer), "./lib.js");
    let declarations = rewriter(ModuleSuffix::Default, ModuleKind::EsModule, OutputKind::Declarations);
    assert_eq!(declarations.rewrite_specifier("./lib", &importer), "./lib");

    fs::remove_file(src.join("lib.ts")).unwrap();
    let fresh = code_rewriter(ModuleSuffix::Default, ModuleKind::EsModule);
    assert_eq!(fresh.rewrite_specifier("./lib", &importer), "./lib/index.js");
}

#[test]
fn runtime_helper_points_at_local_copy() {
    let options = TransformOptions {
        module_suffix: ModuleSuffix::Node,
        runtime_helper_local_path: Some(PathBuf::from("/virtual/project/src/tslib.ts")),
        ..TransformOptions::default()
    };
    let file = Path::new("/virtual/project/src/util/format.ts");

    let code = SpecifierRewriter::new(&options, ModuleKind::EsModule, OutputKind::Code);
    assert_eq!(code.rewrite_specifier("tslib", file), "../tslib.mjs");

    let declarations = SpecifierRewriter::new(&options, ModuleKind::EsModule, OutputKind::Declarations);
    assert_eq!(declarations.rewrite_specifier("tslib", file), "../tslib");

    let sibling = Path::new("/virtual/project/src/index.ts");
    assert_eq!(code.rewrite_specifier("tslib", sibling), "./tslib.mjs");
}

#[test]
fn transform_rewrites_every_specifier_position() {
    let mut file = SourceFile::new(
        VIRTUAL_FILE,
        vec![
            import_named(&["a"], "./a"),
            import_default("lodash", "lodash"),
            export_all("./b"),
            export_named_from(&["c"], "../c"),
            import_equals("d", "./d"),
            function_decl(
                ModifierFlags::empty(),
                "load",
                Vec::new(),
                Some(vec![
                    expr_stmt(dynamic_import("./lazy")),
                    Stmt::Return(Some(require("./legacy"))),
                ]),
            ),
        ],
    );

    let mut rewriter = code_rewriter(ModuleSuffix::Default, ModuleKind::CommonJs);
    rewriter.transform(&mut file);

    let printed = tsdist_emitter::print_code(&file);
    for expected in [
        "from \"./a.js\"",
        "from \"lodash\"",
        "export * from \"./b.js\"",
        "from \"../c.js\"",
        "require(\"./d.js\")",
        "import(\"./lazy.js\")",
        "require(\"./legacy.js\")",
    ] {
        assert!(printed.contains(expected), "missing {expected} in:\n{printed}");
    }
    assert_eq!(rewriter.rewritten_count(), 6);
}

#[test]
fn transform_rewrites_import_types_in_declarations() {
    let mut file = SourceFile::new(
        "/virtual/project/src/index.d.ts",
        vec![declare_const(
            "config",
            import_type("./config.ts", Some("Config")),
        )],
    );

    let mut rewriter = rewriter(ModuleSuffix::Node, ModuleKind::EsModule, OutputKind::Declarations);
    rewriter.transform(&mut file);

    let Stmt::Var(var) = &file.statements[0] else {
        panic!("expected variable statement");
    };
    let Some(TypeNode::Import(import)) = var.decls[0].name.type_ann() else {
        panic!("expected import type");
    };
    assert_eq!(import.argument.value, "./config");
    assert_eq!(import.qualifier.as_deref(), Some("Config"));
}
