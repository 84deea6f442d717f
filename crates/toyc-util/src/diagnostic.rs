//! Shared diagnostic rendering.
//!
//! `toyc-lex`, `toyc-par`, and `toyc-gen` each define their own `thiserror`
//! error enum (see `spec.md` §7's five error categories). This module only
//! holds the pieces those enums have in common — a [`Category`] tag and a
//! uniform [`render`] function — so the driver can print every phase's
//! errors the same way without depending on any one phase's error type.

use crate::span::Span;
use std::fmt;

/// One of the five error categories `spec.md` §7 assigns every fatal
/// diagnostic to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Lexical,
    Syntactic,
    NameResolution,
    DriverIo,
    Internal,
}

impl Category {
    pub const fn label(self) -> &'static str {
        match self {
            Category::Lexical => "lexical error",
            Category::Syntactic => "syntax error",
            Category::NameResolution => "name resolution error",
            Category::DriverIo => "error",
            Category::Internal => "internal compiler error",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Renders a single fatal diagnostic the way the driver prints it to
/// stderr: `toyc: <category>: <message> (at <span>)`, the span suffix
/// omitted when there's no useful position (e.g. missing-argument errors).
pub fn render(category: Category, message: &str, span: Option<Span>) -> String {
    match span {
        Some(span) => format!("toyc: {category}: {message} (at {span})"),
        None => format!("toyc: {category}: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_with_span() {
        let s = render(Category::Syntactic, "unexpected token", Some(Span::point(3, 5)));
        assert_eq!(s, "toyc: syntax error: unexpected token (at 3:5)");
    }

    #[test]
    fn renders_without_span() {
        let s = render(Category::DriverIo, "missing source argument", None);
        assert_eq!(s, "toyc: error: missing source argument");
    }
}
