//! Company and job repositories.
//!
//! Every operation runs a single statement through any [`GenericClient`], so
//! callers that need atomicity pass a transaction.
//!
//! [`GenericClient`]: crate::GenericClient

mod company;
mod job;

pub use company::{Company, CompanyDetail, NewCompany};
pub use job::{Job, JobSummary, NewJob};

use crate::fragment::Fragment;

pub(crate) fn log_sql(tag: &str, sql: &str, param_count: usize) {
    tracing::debug!(target: "jobly.sql", tag, param_count, sql = %sql);
}

/// `SELECT <columns> FROM <table> [WHERE <frag>] ORDER BY <order>`.
pub(crate) fn select_where(columns: &str, table: &str, filter: &Fragment, order: &str) -> String {
    if filter.is_empty() {
        format!("SELECT {columns} FROM {table} ORDER BY {order}")
    } else {
        format!(
            "SELECT {columns} FROM {table} WHERE {} ORDER BY {order}",
            filter.sql()
        )
    }
}

/// `UPDATE <table> SET <frag> WHERE <key> = $n+1 RETURNING <columns>`.
pub(crate) fn update_returning(table: &str, set: &Fragment, key: &str, columns: &str) -> String {
    format!(
        "UPDATE {table} SET {} WHERE {key} = ${} RETURNING {columns}",
        set.sql(),
        set.next_placeholder()
    )
}
