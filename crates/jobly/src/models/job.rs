use super::{log_sql, select_where, update_returning};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::field_map::FieldMap;
use crate::filter::EntityKind;
use crate::row::{FromRow, RowExt};
use crate::search::SearchRequest;
use crate::update::build_set_fragment;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const COLUMNS: &str = "id, title, salary, equity, company_handle";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub salary: Option<i32>,
    #[serde(default)]
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    /// Fraction of the company, serialized as a decimal string.
    pub equity: Option<Decimal>,
    pub company_handle: String,
}

/// A job as listed under its company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<Decimal>,
}

impl FromRow for Job {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
            company_handle: row.try_get_column("company_handle")?,
        })
    }
}

impl FromRow for JobSummary {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            id: row.try_get_column("id")?,
            title: row.try_get_column("title")?,
            salary: row.try_get_column("salary")?,
            equity: row.try_get_column("equity")?,
        })
    }
}

fn no_job(title: &str) -> JoblyError {
    JoblyError::not_found(format!("No job: {title}"))
}

impl Job {
    /// Insert a job.
    ///
    /// Titles are unique. An unknown company handle surfaces as
    /// [`JoblyError::ForeignKeyViolation`].
    pub async fn create(client: &impl GenericClient, new: &NewJob) -> JoblyResult<Job> {
        let dup = "SELECT title FROM jobs WHERE title = $1";
        log_sql("job.create.check", dup, 1);
        if client.query_opt(dup, &[&new.title]).await?.is_some() {
            return Err(JoblyError::Duplicate(format!("Duplicate job: {}", new.title)));
        }

        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        log_sql("job.create", &sql, 4);
        let row = client
            .query_one(
                &sql,
                &[&new.title, &new.salary, &new.equity, &new.company_handle],
            )
            .await?;
        Job::from_row(&row)
    }

    /// All jobs, ordered by title.
    pub async fn find_all(client: &impl GenericClient) -> JoblyResult<Vec<Job>> {
        let sql = format!("SELECT {COLUMNS} FROM jobs ORDER BY title");
        log_sql("job.find_all", &sql, 0);
        let rows = client.query(&sql, &[]).await?;
        rows.iter().map(Job::from_row).collect()
    }

    /// Look a job up by title, ignoring case.
    pub async fn get(client: &impl GenericClient, title: &str) -> JoblyResult<Job> {
        let sql = format!("SELECT {COLUMNS} FROM jobs WHERE title ILIKE $1 ORDER BY id");
        log_sql("job.get", &sql, 1);
        let row = client
            .query_opt(&sql, &[&title])
            .await?
            .ok_or_else(|| no_job(title))?;
        Job::from_row(&row)
    }

    /// Partially update a job.
    ///
    /// Accepted fields: `title`, `salary`, `equity`, `companyHandle`.
    pub async fn update(
        client: &impl GenericClient,
        title: &str,
        data: &FieldMap,
    ) -> JoblyResult<Job> {
        let set = build_set_fragment(data, &EntityKind::Job.update_columns())?;
        let sql = update_returning("jobs", &set, "title", COLUMNS);

        let mut params = set.params_ref();
        params.push(&title);
        log_sql("job.update", &sql, params.len());

        let row = client
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| no_job(title))?;
        Job::from_row(&row)
    }

    pub async fn remove(client: &impl GenericClient, title: &str) -> JoblyResult<()> {
        let sql = "DELETE FROM jobs WHERE title = $1";
        log_sql("job.remove", sql, 1);
        if client.execute(sql, &[&title]).await? == 0 {
            return Err(no_job(title));
        }
        Ok(())
    }

    /// Jobs matching a search request, ordered by title.
    pub async fn search(
        client: &impl GenericClient,
        request: &SearchRequest,
    ) -> JoblyResult<Vec<Job>> {
        if request.kind() != EntityKind::Job {
            return Err(JoblyError::invalid(format!(
                "expected a jobs search, got {}",
                request.kind()
            )));
        }
        let filter = request.where_fragment()?;
        let sql = select_where(COLUMNS, "jobs", &filter, "title");
        log_sql("job.search", &sql, filter.len());
        let rows = client.query(&sql, &filter.params_ref()).await?;
        rows.iter().map(Job::from_row).collect()
    }
}
