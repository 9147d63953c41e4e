use colored::Colorize;
use std::collections::HashMap;
use std::path::Path;
use tsdist_common::{Diagnostic, DiagnosticCategory, DiagnosticRelatedInformation, LineMap};

/// Renders diagnostics as `file (line,col): error TS<code>: message`.
pub struct Reporter {
    color: bool,
    sources: HashMap<String, String>,
    line_maps: HashMap<String, LineMap>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            sources: HashMap::new(),
            line_maps: HashMap::new(),
        }
    }

    /// Use `text` for `file` instead of reading it from disk.
    pub fn with_source(mut self, file: impl Into<String>, text: impl Into<String>) -> Self {
        let file = file.into();
        self.line_maps.remove(&file);
        self.sources.insert(file, text.into());
        self
    }

    pub fn render(&mut self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&mut self, diagnostic: &Diagnostic) -> String {
        let mut output = String::new();
        if let Some(location) = self.format_location(&diagnostic.file, diagnostic.start) {
            output.push_str(&location);
            output.push_str(": ");
        } else if !diagnostic.file.is_empty() {
            output.push_str(&diagnostic.file);
            output.push_str(": ");
        }

        output.push_str(&self.format_category(diagnostic.category));
        let code = self.format_code(diagnostic.code);
        if !code.is_empty() {
            output.push(' ');
            output.push_str(&code);
        }
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        for related in &diagnostic.related_information {
            output.push('\n');
            output.push_str(&self.format_related(related));
        }
        output
    }

    fn format_related(&mut self, related: &DiagnosticRelatedInformation) -> String {
        let location = self
            .format_location(&related.file, related.start)
            .unwrap_or_else(|| related.file.clone());
        let prefix = if self.color {
            "  Related".dimmed().to_string()
        } else {
            "  Related".to_string()
        };
        format!("{prefix}: {location}: {}", related.message_text)
    }

    fn format_location(&mut self, file: &str, offset: u32) -> Option<String> {
        if file.is_empty() {
            return None;
        }
        let (line, column) = self.position_for(file, offset)?;
        Some(format!("{file} ({line},{column})"))
    }

    fn position_for(&mut self, file: &str, offset: u32) -> Option<(u32, u32)> {
        self.ensure_source(file)?;
        if !self.line_maps.contains_key(file) {
            let source = self.sources.get(file)?;
            self.line_maps
                .insert(file.to_string(), LineMap::build(source));
        }
        let source = self.sources.get(file)?;
        let position = self.line_maps.get(file)?.offset_to_position(offset, source);
        Some((position.line + 1, position.character + 1))
    }

    fn ensure_source(&mut self, file: &str) -> Option<()> {
        if !self.sources.contains_key(file) {
            let contents = std::fs::read_to_string(Path::new(file)).ok()?;
            self.sources.insert(file.to_string(), contents);
        }
        Some(())
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Suggestion => "suggestion",
            DiagnosticCategory::Message => "message",
        };
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
            DiagnosticCategory::Suggestion => label.blue().bold().to_string(),
            DiagnosticCategory::Message => label.cyan().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        if code == 0 {
            return String::new();
        }
        let label = format!("TS{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_location_category_and_code() {
        let source = "import a from './a';\nimport b from './missing';\n";
        let start = source.find("'./missing'").unwrap() as u32;
        let diagnostic = Diagnostic::error(
            "/p/src/index.ts",
            start,
            11,
            "Cannot find module './missing' or its corresponding type declarations.",
            2307,
        );
        let mut reporter = Reporter::new(false).with_source("/p/src/index.ts", source);
        assert_eq!(
            reporter.render(&[diagnostic]),
            "/p/src/index.ts (2,15): error TS2307: Cannot find module './missing' or its corresponding type declarations."
        );
    }

    #[test]
    fn global_diagnostics_have_no_location() {
        let diagnostic = Diagnostic::global("Could not write file 'out/a.js'.", 5033);
        let mut reporter = Reporter::new(false);
        assert_eq!(
            reporter.format_diagnostic(&diagnostic),
            "error TS5033: Could not write file 'out/a.js'."
        );
    }

    #[test]
    fn unreadable_file_falls_back_to_its_name() {
        let diagnostic = Diagnostic::error("/does/not/exist.ts", 4, 1, "Bad.", 1005)
            .with_category(DiagnosticCategory::Warning);
        let mut reporter = Reporter::new(false);
        assert_eq!(
            reporter.format_diagnostic(&diagnostic),
            "/does/not/exist.ts: warning TS1005: Bad."
        );
    }

    #[test]
    fn related_information_follows_on_its_own_line() {
        let diagnostic = Diagnostic::error("a.ts", 0, 1, "Duplicate.", 2300)
            .with_related("b.ts", 4, 1, "Declared here.");
        let mut reporter = Reporter::new(false)
            .with_source("a.ts", "let x;\n")
            .with_source("b.ts", "let\nx;\n");
        assert_eq!(
            reporter.render(&[diagnostic]),
            "a.ts (1,1): error TS2300: Duplicate.\n  Related: b.ts (2,1): Declared here."
        );
    }

    #[test]
    fn color_output_keeps_the_message() {
        colored::control::set_override(true);
        let diagnostic = Diagnostic::global("Broken.", 2000);
        let rendered = Reporter::new(true).format_diagnostic(&diagnostic);
        assert!(rendered.contains("Broken."));
        assert!(rendered.contains("TS2000"));
    }
}
