use super::{
    Comparison, FilterRule, FilterSpec, ParamKind, Participation, UnknownFilterKey, ValueTransform,
};
use crate::columns::ColumnMap;
use crate::error::JoblyResult;
use crate::value::FieldValue;
use std::fmt;

/// The searchable, updatable record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Company,
    Job,
}

impl EntityKind {
    pub fn table(self) -> &'static str {
        match self {
            Self::Company => "companies",
            Self::Job => "jobs",
        }
    }

    /// Parse a CLI/route style name (`companies`, `company`, `jobs`, `job`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "company" | "companies" => Some(Self::Company),
            "job" | "jobs" => Some(Self::Job),
            _ => None,
        }
    }

    /// Recognized search parameters.
    pub fn filter_spec(self) -> FilterSpec {
        match self {
            Self::Company => company_filters(),
            Self::Job => job_filters(),
        }
        .expect("invalid built-in filter table")
    }

    /// Fields accepted by partial updates, with their columns.
    pub fn update_columns(self) -> ColumnMap {
        match self {
            Self::Company => company_columns(),
            Self::Job => job_columns(),
        }
        .expect("invalid built-in column table")
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

fn company_filters() -> JoblyResult<FilterSpec> {
    Ok(FilterSpec::new()
        .rule(
            FilterRule::new("name", "name", Comparison::ILike)?
                .transform(ValueTransform::Contains),
        )
        .rule(
            FilterRule::new("minEmployees", "num_employees", Comparison::Gte)?
                .kind(ParamKind::Integer),
        )
        .rule(
            FilterRule::new("maxEmployees", "num_employees", Comparison::Lte)?
                .kind(ParamKind::Integer),
        )
        .range("minEmployees", "maxEmployees")
        .unknown_keys(UnknownFilterKey::Reject))
}

fn job_filters() -> JoblyResult<FilterSpec> {
    Ok(FilterSpec::new()
        .rule(
            FilterRule::new("title", "title", Comparison::ILike)?
                .transform(ValueTransform::Contains),
        )
        .rule(FilterRule::new("minSalary", "salary", Comparison::Gte)?.kind(ParamKind::Integer))
        .rule(
            FilterRule::new("hasEquity", "equity", Comparison::Gt)?
                .transform(ValueTransform::Constant(FieldValue::Int(0)))
                .participation(Participation::WhenTruthy)
                .kind(ParamKind::Boolean),
        )
        .unknown_keys(UnknownFilterKey::Reject))
}

fn company_columns() -> JoblyResult<ColumnMap> {
    ColumnMap::allow_list()
        .column("name")?
        .column("description")?
        .alias("numEmployees", "num_employees")?
        .alias("logoUrl", "logo_url")
}

fn job_columns() -> JoblyResult<ColumnMap> {
    ColumnMap::allow_list()
        .column("title")?
        .column("salary")?
        .column("equity")?
        .alias("companyHandle", "company_handle")
}
