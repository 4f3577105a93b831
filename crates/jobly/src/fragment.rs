//! Parameterized SQL fragments.
//!
//! A [`Fragment`] is a piece of SQL text with `$1, $2, ...` placeholders and the
//! values that bind to them, in order. Fragments are produced by
//! [`FragmentBuilder`], which stores raw text and bind markers separately and
//! only numbers placeholders when rendering, so numbering is always 1-based and
//! contiguous regardless of which clauses a caller decided to emit.

use crate::error::{JoblyError, JoblyResult};
use crate::ident::Ident;
use crate::value::FieldValue;
use std::fmt::Write;
use tokio_postgres::types::ToSql;

#[derive(Debug, Clone)]
enum Part {
    Raw(String),
    Param,
}

/// Incremental builder for a [`Fragment`].
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct FragmentBuilder {
    parts: Vec<Part>,
    values: Vec<FieldValue>,
}

impl FragmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw SQL (no parameters).
    pub fn push(&mut self, sql: &str) -> &mut Self {
        if sql.is_empty() {
            return self;
        }
        match self.parts.last_mut() {
            Some(Part::Raw(last)) => last.push_str(sql),
            _ => self.parts.push(Part::Raw(sql.to_string())),
        }
        self
    }

    /// Append a placeholder and bind its value.
    pub fn push_bind(&mut self, value: impl Into<FieldValue>) -> &mut Self {
        self.parts.push(Part::Param);
        self.values.push(value.into());
        self
    }

    /// Append a bare identifier.
    pub fn push_ident(&mut self, ident: &Ident) -> &mut Self {
        let mut s = String::new();
        ident.write_sql(&mut s);
        self.push(&s)
    }

    /// Append a double-quoted identifier.
    pub fn push_quoted_ident(&mut self, ident: &Ident) -> &mut Self {
        let mut s = String::new();
        ident.write_quoted(&mut s);
        self.push(&s)
    }

    /// Number of values bound so far.
    pub fn bind_count(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Render the text and hand over the values.
    pub fn build(self) -> Fragment {
        let mut sql = String::new();
        let mut idx: usize = 0;
        for part in &self.parts {
            match part {
                Part::Raw(s) => sql.push_str(s),
                Part::Param => {
                    idx += 1;
                    let _ = write!(&mut sql, "${idx}");
                }
            }
        }
        Fragment {
            sql,
            values: self.values,
        }
    }
}

/// SQL text with positional placeholders plus the ordered values for them.
///
/// Placeholder `$i` binds to `values()[i - 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    sql: String,
    values: Vec<FieldValue>,
}

impl Fragment {
    /// The empty fragment: no text, no values.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn values(&self) -> &[FieldValue] {
        &self.values
    }

    pub fn into_parts(self) -> (String, Vec<FieldValue>) {
        (self.sql, self.values)
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// Number of bound values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Index of the placeholder a caller should use for the next value it
    /// appends after this fragment.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }

    /// Parameter refs compatible with `tokio-postgres`.
    pub fn params_ref(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.values.iter().map(|v| v as &(dyn ToSql + Sync)).collect()
    }

    /// Verify that the text holds exactly the placeholders `$1..$n`, each once,
    /// where `n` is the number of values.
    ///
    /// Quoted literals and identifiers are skipped while scanning, and so is a
    /// `$` inside a bare identifier.
    pub fn check(&self) -> JoblyResult<()> {
        let mut found = placeholder_indices(&self.sql);
        found.sort_unstable();
        let expected: Vec<usize> = (1..=self.values.len()).collect();
        if found != expected {
            return Err(JoblyError::Other(format!(
                "fragment placeholders {found:?} do not match {} bound value(s)",
                self.values.len()
            )));
        }
        Ok(())
    }
}

/// Collect the indices of `$n` placeholders in SQL text, in order of appearance.
pub fn placeholder_indices(sql: &str) -> Vec<usize> {
    let bytes = sql.as_bytes();
    let mut out = Vec::new();
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
                i += 1;
            }
            None if b == b'\'' || b == b'"' => {
                quote = Some(b);
                i += 1;
            }
            None if b == b'$' => {
                let start = i + 1;
                let mut end = start;
                while end < bytes.len() && bytes[end].is_ascii_digit() {
                    end += 1;
                }
                if end > start {
                    if let Ok(n) = sql[start..end].parse() {
                        out.push(n);
                    }
                }
                i = end.max(start);
            }
            // `$` inside a bare identifier (`col$1`) is not a placeholder.
            None if is_ident_byte(b) => {
                while i < bytes.len() && (is_ident_byte(bytes[i]) || bytes[i] == b'$') {
                    i += 1;
                }
            }
            None => i += 1,
        }
    }
    out
}

fn is_ident_byte(b: u8) -> bool {
    b == b'_' || b.is_ascii_alphanumeric()
}
