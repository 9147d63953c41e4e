use std::fs;
use tempfile::TempDir;
use tsdist_dts::{DeclarationFormat, DtsError, render, resolve};

const MERGED: &str = "export default Foo;\ndeclare class Foo {}";

#[test]
fn commonjs_namespace_assigns_the_namespace() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("index.d.ts");
    fs::write(&path, MERGED).unwrap();

    resolve(&path, "mylib", DeclarationFormat::CommonjsNamespace).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("declare namespace mylib {\n"), "{text}");
    assert!(text.contains("export { Foo as default }"), "{text}");
    assert!(text.contains("\nclass Foo {}\n"), "{text}");
    assert!(text.trim_end().ends_with("export = mylib"), "{text}");
}

#[test]
fn global_umd_appends_namespace_export() {
    assert_eq!(
        render("export declare const a: number;\n", "mylib", DeclarationFormat::GlobalUmd),
        "export declare const a: number;\n\nexport as namespace mylib\n"
    );
}

#[test]
fn plain_global_wraps_without_export_assignment() {
    assert_eq!(
        render(MERGED, "mylib", DeclarationFormat::PlainGlobal),
        "declare namespace mylib {\nexport { Foo as default }\nclass Foo {}\n}\n"
    );
}

#[test]
fn format_names_deserialize_in_kebab_case() {
    let formats: Vec<DeclarationFormat> =
        serde_json::from_str(r#"["global-umd", "commonjs-namespace", "plain-global", "cjs"]"#)
            .unwrap();
    assert_eq!(
        formats,
        [
            DeclarationFormat::GlobalUmd,
            DeclarationFormat::CommonjsNamespace,
            DeclarationFormat::PlainGlobal,
            DeclarationFormat::CommonjsNamespace,
        ]
    );
}

#[test]
fn missing_merged_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = resolve(
        &dir.path().join("missing.d.ts"),
        "mylib",
        DeclarationFormat::GlobalUmd,
    )
    .unwrap_err();
    assert!(matches!(err, DtsError::Io { .. }), "{err}");
}
