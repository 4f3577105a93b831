//! Common imports.
//!
//! ```ignore
//! use jobly::prelude::*;
//! ```

pub use crate::{
    ColumnMap, Company, EntityKind, FieldMap, FieldValue, FilterSpec, Fragment, FromRow,
    GenericClient, Job, JoblyError, JoblyResult, RowExt, SearchRequest, build_set_fragment,
    build_where_fragment, field_map,
};

#[cfg(feature = "pool")]
pub use crate::{create_pool, create_pool_with_config};
