//! Partial-update `SET` fragments.

use crate::columns::ColumnMap;
use crate::error::{JoblyError, JoblyResult};
use crate::field_map::FieldMap;
use crate::fragment::{Fragment, FragmentBuilder};

/// Build the column list of a partial `UPDATE`.
///
/// Each field, in iteration order, becomes `"<column>"=$i`, joined with `, `;
/// the returned values follow the same order. The column for each field is
/// resolved through `columns`.
///
/// Fails with [`JoblyError::InvalidArgument`] when `fields` is empty or a
/// field cannot be mapped to a column.
///
/// # Example
/// ```ignore
/// let columns = ColumnMap::aliases()
///     .alias("numEmployees", "num_employees")?
///     .alias("logoUrl", "logo_url")?;
/// let frag = build_set_fragment(&field_map! { "numEmployees" => 10, "logoUrl" => "x.png" }, &columns)?;
/// assert_eq!(frag.sql(), r#""num_employees"=$1, "logo_url"=$2"#);
/// ```
pub fn build_set_fragment(fields: &FieldMap, columns: &ColumnMap) -> JoblyResult<Fragment> {
    if fields.is_empty() {
        return Err(JoblyError::no_data());
    }

    let mut b = FragmentBuilder::new();
    for (i, (field, value)) in fields.iter().enumerate() {
        let column = columns.resolve(field)?;
        if i > 0 {
            b.push(", ");
        }
        b.push_quoted_ident(&column).push("=").push_bind(value.clone());
    }
    Ok(b.build())
}
