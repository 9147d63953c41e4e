//! Diagnostics surfaced by the front end and by tsdist itself.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

pub mod diagnostic_codes {
    /// Cannot find module '{0}' or its corresponding type declarations.
    pub const CANNOT_FIND_MODULE: u32 = 2307;
    /// Cannot find name '{0}'.
    pub const CANNOT_FIND_NAME: u32 = 2304;
    /// Cannot read file '{0}'.
    pub const CANNOT_READ_FILE: u32 = 5083;
    /// Could not write file '{0}': {1}.
    pub const COULD_NOT_WRITE_FILE: u32 = 5033;
}

pub mod diagnostic_messages {
    pub const CANNOT_FIND_MODULE: &str =
        "Cannot find module '{0}' or its corresponding type declarations.";
    pub const CANNOT_FIND_NAME: &str = "Cannot find name '{0}'.";
    pub const CANNOT_READ_FILE: &str = "Cannot read file '{0}'.";
    pub const COULD_NOT_WRITE_FILE: &str = "Could not write file '{0}': {1}.";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticRelatedInformation {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub file: String,
    pub start: u32,
    pub length: u32,
    pub message_text: String,
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    pub fn error(
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
        code: u32,
    ) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            message_text: message.into(),
            code,
            file: file.into(),
            start,
            length,
            related_information: Vec::new(),
        }
    }

    /// A diagnostic that is not tied to a source location.
    pub fn global(message: impl Into<String>, code: u32) -> Self {
        Self::error(String::new(), 0, 0, message, code)
    }

    pub fn with_category(mut self, category: DiagnosticCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_related(
        mut self,
        file: impl Into<String>,
        start: u32,
        length: u32,
        message: impl Into<String>,
    ) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            category: DiagnosticCategory::Message,
            code: 0,
            file: file.into(),
            start,
            length,
            message_text: message.into(),
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

pub fn format_message(message: &str, args: &[&str]) -> String {
    let mut result = message.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_positional_arguments() {
        let text = format_message(diagnostic_messages::COULD_NOT_WRITE_FILE, &["a.js", "denied"]);
        assert_eq!(text, "Could not write file 'a.js': denied.");
    }

    #[test]
    fn global_diagnostic_has_no_location() {
        let diag = Diagnostic::global("boom", 1).with_category(DiagnosticCategory::Warning);
        assert!(diag.file.is_empty());
        assert!(!diag.is_error());
    }
}
