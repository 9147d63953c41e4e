//! Printer for tsdist syntax trees.
//!
//! Two output modes share one writer:
//!
//! ```typescript
//! // input.ts
//! export const enum Mode { A }
//! export function area(r: number): number { return r * r; }
//! ```
//!
//! Code mode erases type syntax and prints JavaScript:
//!
//! ```javascript
//! export function area(r) {
//!     return r * r;
//! }
//! ```
//!
//! Declaration mode prints the public surface:
//!
//! ```typescript
//! export declare const enum Mode {
//!     A = 0
//! }
//! export declare function area(r: number): number;
//! ```

use tracing::trace;
use tsdist_ast::SourceFile;

mod code;
mod declarations;
mod expressions;
mod types;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitMode {
    /// JavaScript output.
    Code,
    /// `.d.ts` output.
    Declaration,
}

/// Print `file` as JavaScript.
pub fn print_code(file: &SourceFile) -> String {
    Printer::new(EmitMode::Code).print_file(file)
}

/// Print `file` as a declaration file.
pub fn print_declarations(file: &SourceFile) -> String {
    Printer::new(EmitMode::Declaration).print_file(file)
}

pub struct Printer {
    mode: EmitMode,
    output: String,
    indent_level: u32,
    indent_str: &'static str,
    /// Inside `declare namespace`/`declare module`/`declare global` bodies.
    in_ambient_context: bool,
    /// Enclosing namespaces being lowered in code mode, innermost last.
    namespaces: Vec<String>,
}

impl Printer {
    pub fn new(mode: EmitMode) -> Self {
        Printer {
            mode,
            output: String::new(),
            indent_level: 0,
            indent_str: "    ",
            in_ambient_context: false,
            namespaces: Vec::new(),
        }
    }

    pub fn mode(&self) -> EmitMode {
        self.mode
    }

    pub fn print_file(mut self, file: &SourceFile) -> String {
        match self.mode {
            EmitMode::Code => self.emit_code_statements(&file.statements),
            EmitMode::Declaration => {
                self.in_ambient_context = file.is_declaration_file;
                self.emit_declaration_file(file);
            }
        }
        trace!(
            file = %file.file_name,
            mode = ?self.mode,
            bytes = self.output.len(),
            "printed file"
        );
        self.output
    }

    pub(crate) fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    pub(crate) fn write_line(&mut self) {
        self.output.push('\n');
    }

    pub(crate) fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(self.indent_str);
        }
    }

    pub(crate) const fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub(crate) const fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    /// Write `items` separated by `, `.
    pub(crate) fn write_comma_list<T>(&mut self, items: &[T], mut emit: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            emit(self, item);
        }
    }

    pub(crate) fn write_string_literal(&mut self, value: &str, single_quote: bool) {
        let quote = if single_quote { '\'' } else { '"' };
        self.output.push(quote);
        for c in value.chars() {
            match c {
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                '\0' => self.output.push_str("\\0"),
                '\u{2028}' => self.output.push_str("\\u2028"),
                '\u{2029}' => self.output.push_str("\\u2029"),
                c if c == quote => {
                    self.output.push('\\');
                    self.output.push(c);
                }
                c if (c as u32) < 0x20 || c == '\x7F' => {
                    self.output.push_str(&format!("\\u{:04X}", c as u32));
                }
                c => self.output.push(c),
            }
        }
        self.output.push(quote);
    }
}

/// Canonical JavaScript spelling of a number.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.fract() == 0.0 && value.abs() < 1e21 {
        return format!("{value:.0}");
    }
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::format_number;

    #[test]
    fn formats_numbers_like_javascript() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(-7.0), "-7");
        assert_eq!(format_number(0.5), "0.5");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }
}
