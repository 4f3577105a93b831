//! Embedded schema migrations via [`refinery`].
//!
//! The SQL files under `crates/jobly/migrations` are compiled into the
//! binary, so `jobly migrate` needs nothing but a database URL.
//!
//! ```ignore
//! let pool = jobly::create_pool(&std::env::var("DATABASE_URL")?)?;
//! jobly::migrate::run_pool(&pool).await?;
//! ```

use crate::error::{JoblyError, JoblyResult};
use std::collections::HashSet;

pub use refinery::{Migration, Report, Runner};

const MIGRATION_TABLE: &str = "refinery_schema_history";

mod embedded {
    refinery::embed_migrations!("migrations");
}

/// A runner over the embedded migrations.
pub fn runner() -> Runner {
    embedded::migrations::runner()
}

/// `(version, name)` of every embedded migration, in version order.
pub fn embedded_versions() -> Vec<(i64, String)> {
    let mut out: Vec<(i64, String)> = runner()
        .get_migrations()
        .iter()
        .map(|m| (i64::from(m.version()), m.name().to_string()))
        .collect();
    out.sort_by_key(|(v, _)| *v);
    out
}

/// Applied and pending migrations for one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub applied: Vec<(i64, String)>,
    pub pending: Vec<(i64, String)>,
}

/// Apply every pending embedded migration.
pub async fn run(client: &mut tokio_postgres::Client) -> JoblyResult<Report> {
    let report = runner().run_async(client).await?;
    for m in report.applied_migrations() {
        tracing::info!(
            target: "jobly.migrate",
            version = i64::from(m.version()),
            name = m.name(),
            "applied migration"
        );
    }
    Ok(report)
}

/// Compare the embedded migrations with the history table.
pub async fn status(client: &tokio_postgres::Client) -> JoblyResult<MigrationStatus> {
    let applied = fetch_applied(client).await?;
    let seen: HashSet<i64> = applied.iter().map(|(v, _)| *v).collect();
    let pending = embedded_versions()
        .into_iter()
        .filter(|(v, _)| !seen.contains(v))
        .collect();
    Ok(MigrationStatus { applied, pending })
}

async fn fetch_applied(client: &tokio_postgres::Client) -> JoblyResult<Vec<(i64, String)>> {
    let sql = format!(
        "SELECT version::bigint AS version, name FROM \"{MIGRATION_TABLE}\" ORDER BY version ASC"
    );

    let rows = match client.query(&sql, &[]).await {
        Ok(rows) => rows,
        Err(err) => {
            // Undefined table: nothing has been applied yet.
            if err
                .as_db_error()
                .is_some_and(|db| db.code().code() == "42P01")
            {
                return Ok(Vec::new());
            }
            return Err(JoblyError::from_db_error(err));
        }
    };

    rows.iter()
        .map(|row| {
            let version: i64 = row
                .try_get("version")
                .map_err(|e| JoblyError::decode("version", e.to_string()))?;
            let name: String = row
                .try_get("name")
                .map_err(|e| JoblyError::decode("name", e.to_string()))?;
            Ok((version, name))
        })
        .collect()
}

/// Pool variant of [`run`].
#[cfg(feature = "pool")]
pub async fn run_pool(pool: &deadpool_postgres::Pool) -> JoblyResult<Report> {
    let mut client = pool.get().await?;
    run(&mut client).await
}

/// Pool variant of [`status`].
#[cfg(feature = "pool")]
pub async fn status_pool(pool: &deadpool_postgres::Pool) -> JoblyResult<MigrationStatus> {
    let client = pool.get().await?;
    status(&client).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_migration_is_embedded() {
        let versions = embedded_versions();
        assert_eq!(versions.len(), 1);
        assert_eq!(versions[0].0, 1);
        assert_eq!(versions[0].1, "create_companies_and_jobs");
    }
}
