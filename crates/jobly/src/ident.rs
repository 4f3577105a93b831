//! Column identifiers.
//!
//! PostgreSQL cannot bind identifiers as parameters, so every column name that
//! reaches SQL text goes through [`Ident`]. A name must match
//! `[A-Za-z_][A-Za-z0-9_$]*`; anything else is rejected before rendering.

use crate::error::{JoblyError, JoblyResult};
use std::fmt;

/// A validated, single-segment SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ident(String);

impl Ident {
    /// Validate an identifier.
    pub fn parse(s: &str) -> JoblyResult<Self> {
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            return Err(JoblyError::invalid("invalid column name: empty identifier"));
        };
        if !(first == '_' || first.is_ascii_alphabetic()) {
            return Err(JoblyError::invalid(format!(
                "invalid column name {s:?}: must start with a letter or '_'"
            )));
        }
        if let Some(c) = chars.find(|&c| !(c == '_' || c == '$' || c.is_ascii_alphanumeric())) {
            return Err(JoblyError::invalid(format!(
                "invalid column name {s:?}: unexpected character '{c}'"
            )));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append the bare identifier.
    pub(crate) fn write_sql(&self, out: &mut String) {
        out.push_str(&self.0);
    }

    /// Append the identifier wrapped in double quotes.
    ///
    /// `parse` never admits `"`, so no escaping is needed.
    pub(crate) fn write_quoted(&self, out: &mut String) {
        out.push('"');
        out.push_str(&self.0);
        out.push('"');
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Convert an input into an [`Ident`].
pub trait IntoIdent {
    fn into_ident(self) -> JoblyResult<Ident>;
}

impl IntoIdent for Ident {
    fn into_ident(self) -> JoblyResult<Ident> {
        Ok(self)
    }
}

impl IntoIdent for &str {
    fn into_ident(self) -> JoblyResult<Ident> {
        Ident::parse(self)
    }
}

impl IntoIdent for String {
    fn into_ident(self) -> JoblyResult<Ident> {
        Ident::parse(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_simple() {
        let ident = Ident::parse("num_employees").unwrap();
        assert_eq!(ident.as_str(), "num_employees");
    }

    #[test]
    fn ident_quoted_rendering() {
        let mut out = String::new();
        Ident::parse("logo_url").unwrap().write_quoted(&mut out);
        assert_eq!(out, r#""logo_url""#);
    }

    #[test]
    fn ident_with_dollar() {
        assert!(Ident::parse("my_var$1").is_ok());
    }

    #[test]
    fn ident_rejects_empty() {
        assert!(Ident::parse("").is_err());
    }

    #[test]
    fn ident_rejects_start_digit() {
        assert!(Ident::parse("1table").is_err());
    }

    #[test]
    fn ident_rejects_embedded_quote() {
        assert!(Ident::parse("a\"b").is_err());
    }

    #[test]
    fn ident_rejects_injection() {
        assert!(Ident::parse("name\"=1; DROP TABLE companies; --").is_err());
        assert!(Ident::parse("my column").is_err());
        assert!(Ident::parse("public.companies").is_err());
    }
}
