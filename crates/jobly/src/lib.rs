//! # jobly
//!
//! Companies and jobs over PostgreSQL.
//!
//! The heart of the crate is a pair of fragment builders that turn sparse,
//! caller-supplied input into parameterized SQL:
//!
//! - [`build_set_fragment`] renders a partial update (`"col"=$1, "col2"=$2`)
//! - [`build_where_fragment`] renders a search predicate
//!   (`name ILIKE $1 AND num_employees >= $2`)
//!
//! Values never reach the SQL text. Placeholders are numbered when a
//! [`Fragment`] is rendered, so a skipped filter cannot leave a gap.
//!
//! ```ignore
//! use jobly::{EntityKind, build_set_fragment, build_where_fragment, field_map};
//!
//! let set = build_set_fragment(
//!     &field_map! { "numEmployees" => 10, "logoUrl" => "x.png" },
//!     &EntityKind::Company.update_columns(),
//! )?;
//! assert_eq!(set.sql(), r#""num_employees"=$1, "logo_url"=$2"#);
//!
//! let filter = build_where_fragment(
//!     &field_map! { "hasEquity" => false, "minSalary" => 100 },
//!     EntityKind::Job,
//! )?;
//! assert_eq!(filter.sql(), "salary >= $1");
//! ```
//!
//! ## Repositories
//!
//! [`Company`] and [`Job`] carry async CRUD and search operations over any
//! [`GenericClient`] (a `tokio_postgres::Client`, a transaction, or a pooled
//! connection):
//!
//! ```ignore
//! let pool = jobly::create_pool(&std::env::var("DATABASE_URL")?)?;
//! let client = pool.get().await?;
//!
//! let request = SearchRequest::from_query(EntityKind::Company, [("name", "net")])?;
//! let companies = Company::search(&client, &request).await?;
//! ```

pub mod client;
pub mod columns;
pub mod config;
pub mod error;
pub mod field_map;
pub mod filter;
pub mod fragment;
pub mod ident;
pub mod models;
pub mod prelude;
pub mod row;
pub mod search;
pub mod update;
pub mod value;

pub use client::GenericClient;
pub use columns::{ColumnMap, UnknownField};
pub use config::{DatabaseConfig, JoblyConfig};
pub use error::{JoblyError, JoblyResult};
pub use field_map::FieldMap;
pub use filter::{
    Comparison, EntityKind, FilterRule, FilterSpec, ParamKind, Participation, RangePair,
    UnknownFilterKey, ValueTransform, build_where_fragment, build_where_fragment_with,
};
pub use fragment::{Fragment, FragmentBuilder};
pub use ident::{Ident, IntoIdent};
pub use models::{Company, CompanyDetail, Job, JobSummary, NewCompany, NewJob};
pub use row::{FromRow, RowExt};
pub use search::SearchRequest;
pub use update::build_set_fragment;
pub use value::FieldValue;

#[cfg(feature = "pool")]
pub mod pool;

#[cfg(feature = "pool")]
pub use pool::{Pool, create_pool, create_pool_from_config, create_pool_with_config};

#[cfg(feature = "migrate")]
pub mod migrate;

// Re-export tokio-postgres for downstream users
pub use tokio_postgres;
