use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tsdist_dts::{DeclarationWrapper, DtsError};

const INDEX: &str = "import * as Util from './util';\n\
                     import * as Shapes from \"./shapes/index\";\n\
                     export { Util, Shapes };\n\
                     //# sourceMappingURL=index.d.ts.map\n";

const UTIL: &str = "/** Helpers. */\n\
                    export declare function clamp(n: number): number;\n\
                    export declare const VERSION: string;\n\
                    //# sourceMappingURL=util.d.ts.map\n";

const SHAPES: &str = "import * as Util from '../util';\r\n\
                      export interface Circle { r: number }\r\n\
                      export declare function area(c: Circle): number;\r\n";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("shapes")).unwrap();
        fs::write(dir.path().join("index.d.ts"), INDEX).unwrap();
        fs::write(dir.path().join("util.d.ts"), UTIL).unwrap();
        fs::write(dir.path().join("shapes/index.d.ts"), SHAPES).unwrap();
        fs::write(dir.path().join("index.test.d.ts"), "import * as U from './util';\n").unwrap();
        Fixture { dir }
    }

    fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).unwrap()
    }
}

fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<_> = walk(root)
        .into_iter()
        .map(|path| {
            let bytes = fs::read(&path).unwrap();
            (path, bytes)
        })
        .collect();
    files.sort();
    files
}

fn walk(dir: &Path) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            found.extend(walk(&path));
        } else {
            found.push(path);
        }
    }
    found
}

#[test]
fn scan_records_wrapped_files_and_users() {
    let fixture = Fixture::new();
    let plan = DeclarationWrapper::scan(fixture.dir.path()).unwrap();

    let wrapped: Vec<(PathBuf, String)> = plan
        .wrapped_files()
        .map(|(path, namespace)| (path.to_path_buf(), namespace.to_string()))
        .collect();
    assert_eq!(
        wrapped,
        vec![
            (fixture.path("shapes/index.d.ts"), "Shapes".to_string()),
            (fixture.path("util.d.ts"), "Util".to_string()),
        ]
    );
    let users: Vec<PathBuf> = plan.user_files().map(Path::to_path_buf).collect();
    assert_eq!(
        users,
        vec![fixture.path("index.d.ts"), fixture.path("shapes/index.d.ts")]
    );
}

#[test]
fn apply_wraps_targets_and_rewrites_users() {
    let fixture = Fixture::new();
    let transaction = DeclarationWrapper::scan(fixture.dir.path())
        .unwrap()
        .apply()
        .unwrap();

    assert_eq!(
        fixture.read("util.d.ts"),
        "declare namespace Util {\n\
         /** Helpers. */\n\
         function clamp(n: number): number;\n\
         const VERSION: string;\n\
         }\n\
         export default Util;\n\
         //# sourceMappingURL=util.d.ts.map\n"
    );
    assert_eq!(
        fixture.read("index.d.ts"),
        "import Util from './util';\n\
         import Shapes from \"./shapes/index\";\n\
         export { Util, Shapes };\n\
         //# sourceMappingURL=index.d.ts.map\n"
    );
    // Both wrapped and a user of `util`.
    assert_eq!(
        fixture.read("shapes/index.d.ts"),
        "import Util from '../util';\n\
         declare namespace Shapes {\n\
         interface Circle { r: number }\n\
         function area(c: Circle): number;\n\
         }\n\
         export default Shapes;\n"
    );
    assert_eq!(fixture.read("index.test.d.ts"), "import * as U from './util';\n");
    assert_eq!(transaction.files().count(), 3);
    transaction.commit();
}

#[test]
fn revert_restores_original_bytes() {
    let fixture = Fixture::new();
    let before = snapshot(fixture.dir.path());

    let transaction = DeclarationWrapper::scan(fixture.dir.path())
        .unwrap()
        .apply()
        .unwrap();
    assert_ne!(snapshot(fixture.dir.path()), before);
    transaction.revert().unwrap();

    assert_eq!(snapshot(fixture.dir.path()), before);
}

#[test]
fn dropping_an_open_transaction_reverts() {
    let fixture = Fixture::new();
    let before = snapshot(fixture.dir.path());
    {
        let _transaction = DeclarationWrapper::scan(fixture.dir.path())
            .unwrap()
            .apply()
            .unwrap();
        assert!(fixture.read("util.d.ts").starts_with("declare namespace Util {"));
    }
    assert_eq!(snapshot(fixture.dir.path()), before);
}

#[test]
fn committed_transaction_keeps_rewrites() {
    let fixture = Fixture::new();
    DeclarationWrapper::scan(fixture.dir.path())
        .unwrap()
        .apply()
        .unwrap()
        .commit();
    assert!(fixture.read("util.d.ts").contains("export default Util;"));
}

#[test]
fn missing_targets_are_skipped() {
    let dir = TempDir::new().unwrap();
    let index = dir.path().join("index.d.ts");
    fs::write(&index, "import * as Gone from './gone';\nexport { Gone };\n").unwrap();

    let plan = DeclarationWrapper::scan(dir.path()).unwrap();
    assert!(plan.is_empty());
    let transaction = plan.apply().unwrap();
    assert_eq!(transaction.files().count(), 0);
    assert_eq!(
        fs::read_to_string(&index).unwrap(),
        "import * as Gone from './gone';\nexport { Gone };\n"
    );
}

#[test]
fn bare_star_imports_are_ignored() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("index.d.ts"),
        "import * as React from 'react';\nimport * as local from './local';\n",
    )
    .unwrap();
    let plan = DeclarationWrapper::scan(dir.path()).unwrap();
    assert!(plan.is_empty());
}

#[test]
fn non_utf8_declaration_is_an_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.d.ts"), [0xff, 0xfe, 0x00]).unwrap();
    let err = DeclarationWrapper::scan(dir.path()).unwrap_err();
    assert!(matches!(err, DtsError::NonUtf8 { .. }), "{err}");
}

#[test]
fn relative_scan_dir_applies_wrap_and_user_rewrite_to_the_same_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("index.d.ts"), "import * as A from './a';\nexport { A };\n").unwrap();
    fs::write(
        out.join("a.d.ts"),
        "import * as B from './b';\nexport declare const a: B.Thing;\n",
    )
    .unwrap();
    fs::write(out.join("b.d.ts"), "export interface Thing {}\n").unwrap();
    let before = snapshot(&out);

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let applied = DeclarationWrapper::scan(Path::new("./out")).and_then(|plan| plan.apply());
    std::env::set_current_dir(previous).unwrap();
    let transaction = applied.unwrap();

    let a = fs::read_to_string(out.join("a.d.ts")).unwrap();
    assert!(a.starts_with("import B from './b';\n"), "{a}");
    assert!(a.contains("declare namespace A {"), "{a}");
    assert!(!a.contains("import * as"), "{a}");
    let index = fs::read_to_string(out.join("index.d.ts")).unwrap();
    assert!(index.starts_with("import A from './a';"), "{index}");
    let b = fs::read_to_string(out.join("b.d.ts")).unwrap();
    assert!(b.starts_with("declare namespace B {"), "{b}");

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let reverted = transaction.revert();
    std::env::set_current_dir(previous).unwrap();
    reverted.unwrap();
    assert_eq!(snapshot(&out), before);
}
