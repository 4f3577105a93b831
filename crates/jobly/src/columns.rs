//! Field-to-column mapping for partial updates.

use crate::error::{JoblyError, JoblyResult};
use crate::ident::{Ident, IntoIdent};

/// What to do with a field that has no entry in a [`ColumnMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownField {
    /// Use the field name itself as the column, provided it is a valid
    /// identifier.
    #[default]
    PassThrough,
    /// Reject the field: the map is an allow-list.
    Reject,
}

/// Maps logical field names (e.g. `numEmployees`) to physical column names
/// (e.g. `num_employees`).
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    entries: Vec<(String, Ident)>,
    unknown: UnknownField,
}

impl ColumnMap {
    /// An alias table: unlisted fields pass through as their own column name.
    pub fn aliases() -> Self {
        Self::default()
    }

    /// An allow-list: only listed fields are accepted.
    pub fn allow_list() -> Self {
        Self {
            entries: Vec::new(),
            unknown: UnknownField::Reject,
        }
    }

    /// Add a field that maps to a differently named column.
    pub fn alias<I: IntoIdent>(mut self, field: &str, column: I) -> JoblyResult<Self> {
        let column = column.into_ident()?;
        match self.entries.iter_mut().find(|(f, _)| f == field) {
            Some((_, slot)) => *slot = column,
            None => self.entries.push((field.to_string(), column)),
        }
        Ok(self)
    }

    /// Add a field whose column has the same name.
    pub fn column(self, name: &str) -> JoblyResult<Self> {
        self.alias(name, name)
    }

    pub fn unknown_fields(&self) -> UnknownField {
        self.unknown
    }

    /// Listed fields, in the order they were added.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(f, _)| f.as_str())
    }

    /// Resolve the column for a field.
    pub fn resolve(&self, field: &str) -> JoblyResult<Ident> {
        if let Some((_, column)) = self.entries.iter().find(|(f, _)| f == field) {
            return Ok(column.clone());
        }
        match self.unknown {
            UnknownField::PassThrough => Ident::parse(field),
            UnknownField::Reject => Err(JoblyError::invalid(format!("unsupported field: {field}"))),
        }
    }
}

/// Build a pass-through [`ColumnMap`] from `(field, column)` pairs.
impl<'a> TryFrom<&[(&'a str, &'a str)]> for ColumnMap {
    type Error = JoblyError;

    fn try_from(pairs: &[(&'a str, &'a str)]) -> JoblyResult<Self> {
        pairs
            .iter()
            .try_fold(Self::aliases(), |map, (field, column)| map.alias(field, *column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_fall_back_to_field_name() {
        let map = ColumnMap::aliases().alias("numEmployees", "num_employees").unwrap();
        assert_eq!(map.resolve("numEmployees").unwrap().as_str(), "num_employees");
        assert_eq!(map.resolve("name").unwrap().as_str(), "name");
    }

    #[test]
    fn pass_through_still_validates_identifiers() {
        let map = ColumnMap::aliases();
        let err = map.resolve("name\" = 'x'; --").unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn allow_list_rejects_unlisted_fields() {
        let map = ColumnMap::allow_list()
            .column("name")
            .unwrap()
            .alias("logoUrl", "logo_url")
            .unwrap();
        assert_eq!(map.resolve("logoUrl").unwrap().as_str(), "logo_url");
        let err = map.resolve("handle").unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: unsupported field: handle");
        assert_eq!(map.fields().collect::<Vec<_>>(), vec!["name", "logoUrl"]);
    }

    #[test]
    fn alias_rejects_invalid_column() {
        assert!(ColumnMap::aliases().alias("x", "bad column").is_err());
    }

    #[test]
    fn builds_from_pairs() {
        let map = ColumnMap::try_from(&[("numEmployees", "num_employees"), ("logoUrl", "logo_url")][..])
            .unwrap();
        assert_eq!(map.unknown_fields(), UnknownField::PassThrough);
        assert_eq!(map.resolve("logoUrl").unwrap().as_str(), "logo_url");
    }
}
