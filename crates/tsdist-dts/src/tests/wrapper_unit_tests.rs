use super::*;

#[test]
fn wraps_after_imports_and_closes_before_source_map() {
    let text = "import { Base } from \"./base\";\n\
                /** Adds. */\n\
                export declare function add(a: number, b: number): number;\n\
                export {};\n\
                //# sourceMappingURL=util.d.ts.map\n";
    assert_eq!(
        wrap_in_namespace(text, "Util"),
        "import { Base } from \"./base\";\n\
         declare namespace Util {\n\
         /** Adds. */\n\
         function add(a: number, b: number): number;\n\
         }\n\
         export default Util;\n\
         //# sourceMappingURL=util.d.ts.map\n"
    );
}

#[test]
fn appends_closing_without_source_map() {
    assert_eq!(
        wrap_in_namespace("export declare const x: number;\n", "NS"),
        "declare namespace NS {\nconst x: number;\n}\nexport default NS;\n"
    );
}

#[test]
fn file_without_statements_opens_at_first_line() {
    assert_eq!(
        wrap_in_namespace("", "Empty"),
        "declare namespace Empty {\n}\nexport default Empty;\n"
    );
}

#[test]
fn plain_block_comment_is_not_pulled_into_namespace() {
    let lines = ["/* license */", "export declare const a: 1;"];
    assert_eq!(namespace_start(&lines), 1);
    let lines = ["/**", " * Multi-line.", " */", "declare class C {}"];
    assert_eq!(namespace_start(&lines), 0);
    let lines = ["/** detached */", "", "export declare const b: 2;"];
    assert_eq!(namespace_start(&lines), 2);
}

#[test]
fn strips_leading_modifiers_only() {
    assert_eq!(strip_modifiers("export declare class A {}"), "class A {}");
    assert_eq!(strip_modifiers("    declare function f(): void;"), "    function f(): void;");
    assert_eq!(strip_modifiers("export default class B {}"), "class B {}");
    assert_eq!(strip_modifiers("type T = \"export \";"), "type T = \"export \";");
}

#[test]
fn export_only_lines_are_dropped() {
    assert!(EXPORT_ONLY_LINE.is_match("export {};"));
    assert!(EXPORT_ONLY_LINE.is_match("export { a, b as c };"));
    assert!(EXPORT_ONLY_LINE.is_match("export default _default;"));
    assert!(!EXPORT_ONLY_LINE.is_match("export default class A {}"));
    assert!(!EXPORT_ONLY_LINE.is_match("export { a } from \"./a\";"));
}

#[test]
fn declaration_file_names_have_a_single_stem() {
    assert!(is_declaration_file_name(Path::new("/out/util.d.ts")));
    assert!(!is_declaration_file_name(Path::new("/out/util.spec.d.ts")));
    assert!(!is_declaration_file_name(Path::new("/out/util.ts")));
    assert!(!is_declaration_file_name(Path::new("/out/.d.ts")));
}

#[test]
fn normalizes_joined_targets() {
    assert_eq!(
        normalize_path(Path::new("/out/a/./../b/c.d.ts")),
        PathBuf::from("/out/b/c.d.ts")
    );
}
