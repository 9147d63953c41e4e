//! Marks down-leveled class IIFEs as side-effect free for minifiers.
//!
//! ```text
//! var Foo = /** @class */ (function () { ... }());
//! var Foo = /*#__PURE__*/ (function () { ... }());
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::path::Path;

use crate::host::WriteFile;

static CLASS_IIFE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\*\* @class \*/ \(function").expect("valid regex"));

pub fn mark_pure_classes(text: &str) -> Cow<'_, str> {
    CLASS_IIFE.replace_all(text, "/*#__PURE__*/ (function")
}

/// Rewrites class markers in every file passed through it.
pub struct PureClassWriter<W> {
    inner: W,
}

impl<W: WriteFile> PureClassWriter<W> {
    pub fn new(inner: W) -> Self {
        PureClassWriter { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: WriteFile> WriteFile for PureClassWriter<W> {
    fn write_file(&mut self, path: &Path, contents: &str) -> std::io::Result<()> {
        self.inner.write_file(path, &mark_pure_classes(contents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Collect(Vec<(String, String)>);

    impl WriteFile for Collect {
        fn write_file(&mut self, path: &Path, contents: &str) -> std::io::Result<()> {
            self.0.push((path.display().to_string(), contents.to_string()));
            Ok(())
        }
    }

    #[test]
    fn marks_every_class_iife() {
        let text = "var A = /** @class */ (function () {}());\n\
                    var B = /** @class */ (function (_super) {}(A));\n";
        assert_eq!(
            mark_pure_classes(text),
            "var A = /*#__PURE__*/ (function () {}());\n\
             var B = /*#__PURE__*/ (function (_super) {}(A));\n"
        );
    }

    #[test]
    fn leaves_other_comments_alone() {
        let text = "/** @class */ function f() {}\n";
        assert!(matches!(mark_pure_classes(text), Cow::Borrowed(_)));
    }

    #[test]
    fn writer_rewrites_before_delegating() {
        let mut writer = PureClassWriter::new(Collect::default());
        writer
            .write_file(Path::new("out/a.js"), "x = /** @class */ (function () {}());")
            .unwrap();
        let collected = writer.into_inner().0;
        assert_eq!(collected[0].1, "x = /*#__PURE__*/ (function () {}());");
    }
}
