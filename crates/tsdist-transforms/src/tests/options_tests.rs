use super::*;

#[test]
fn parses_camel_case_options() {
    let options = TransformOptions::from_json(
        r#"{
            "moduleSuffix": "node",
            "runtimeHelperLocalPath": "src/tslib.ts",
            "ignoredDiagnosticCodes": [2307, 1005],
            "defineTable": { "__VERSION__": "\"1.0.0\"", "__DEV__": false }
        }"#,
    )
    .unwrap();

    assert_eq!(options.module_suffix, ModuleSuffix::Node);
    assert_eq!(
        options.runtime_helper_local_path,
        Some(PathBuf::from("src/tslib.ts"))
    );
    assert!(options.is_ignored(2307));
    assert!(!options.is_ignored(2304));
    let keys: Vec<_> = options.define_table.keys().cloned().collect();
    assert_eq!(keys, ["__VERSION__", "__DEV__"]);
}

#[test]
fn missing_fields_take_defaults() {
    let options = TransformOptions::from_json("{}").unwrap();
    assert_eq!(options, TransformOptions::default());
    assert_eq!(options.module_suffix, ModuleSuffix::Default);
}

#[test]
fn literal_values_cover_every_kind() {
    let table: IndexMap<String, LiteralValue> = serde_json::from_str(
        r#"{
            "s": "2",
            "n": 1.5,
            "b": true,
            "z": null,
            "u": { "kind": "undefined" },
            "nan": { "kind": "nan" },
            "sym": { "kind": "symbol", "description": "token" },
            "d": { "kind": "date", "epochMillis": 1700000000000 },
            "r": { "kind": "regex", "source": "/ab+c/gi" }
        }"#,
    )
    .unwrap();

    assert_eq!(table["s"], LiteralValue::String("2".into()));
    assert_eq!(table["n"], LiteralValue::Number(1.5));
    assert_eq!(table["b"], LiteralValue::Boolean(true));
    assert_eq!(table["z"], LiteralValue::Null);
    assert_eq!(table["u"], LiteralValue::Undefined);
    assert_eq!(table["nan"], LiteralValue::NaN);
    assert_eq!(table["sym"], LiteralValue::Symbol("token".into()));
    assert_eq!(table["d"], LiteralValue::Date(1_700_000_000_000.0));
    assert_eq!(table["r"], LiteralValue::Regex("/ab+c/gi".into()));
}

#[test]
fn tagged_literals_serialize_with_kind() {
    let json = serde_json::to_string(&LiteralValue::Symbol("x".into())).unwrap();
    assert_eq!(json, r#"{"kind":"symbol","description":"x"}"#);
    let json = serde_json::to_string(&LiteralValue::Null).unwrap();
    assert_eq!(json, "null");
}

#[test]
fn regex_source_splits_pattern_and_flags() {
    let Expr::Lit(Lit::Regex(regex)) = LiteralValue::Regex("/a\\/b/gm".into()).to_expr() else {
        panic!("expected regex literal");
    };
    assert_eq!(regex.pattern, "a\\/b");
    assert_eq!(regex.flags, "gm");

    let Expr::Lit(Lit::Regex(regex)) = LiteralValue::Regex("plain".into()).to_expr() else {
        panic!("expected regex literal");
    };
    assert_eq!(regex.pattern, "plain");
    assert!(regex.flags.is_empty());
}

#[test]
fn non_finite_numbers_fold_to_identifiers() {
    assert!(matches!(
        LiteralValue::Number(f64::NAN).to_expr(),
        Expr::Ident(ident) if ident.name == "NaN"
    ));
    assert!(matches!(
        LiteralValue::Number(f64::INFINITY).to_expr(),
        Expr::Ident(ident) if ident.name == "Infinity"
    ));
    assert!(matches!(
        LiteralValue::Number(f64::NEG_INFINITY).to_expr(),
        Expr::Unary(_)
    ));
}

#[test]
fn module_suffix_per_module_kind() {
    assert_eq!(ModuleSuffix::Node.extension(ModuleKind::EsModule), Some(".mjs"));
    assert_eq!(ModuleSuffix::Node.extension(ModuleKind::CommonJs), Some(".js"));
    assert_eq!(ModuleSuffix::Default.extension(ModuleKind::EsModule), Some(".js"));
    assert_eq!(ModuleSuffix::None.extension(ModuleKind::EsModule), None);
    assert_eq!("NODE".parse::<ModuleSuffix>().unwrap(), ModuleSuffix::Node);
    assert!(matches!(
        "mjs".parse::<ModuleSuffix>(),
        Err(OptionsError::InvalidModuleSuffix(_))
    ));
}

#[test]
fn rejects_non_identifier_define_keys() {
    let err = TransformOptions::from_json(r#"{ "defineTable": { "process.env.X": "1" } }"#)
        .unwrap_err();
    assert!(matches!(err, OptionsError::InvalidDefineKey(key) if key == "process.env.X"));
}
