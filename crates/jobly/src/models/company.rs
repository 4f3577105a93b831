use super::{JobSummary, log_sql, select_where, update_returning};
use crate::client::GenericClient;
use crate::error::{JoblyError, JoblyResult};
use crate::field_map::FieldMap;
use crate::filter::EntityKind;
use crate::row::{FromRow, RowExt};
use crate::search::SearchRequest;
use crate::update::build_set_fragment;
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

const COLUMNS: &str = "handle, name, description, num_employees, logo_url";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCompany {
    pub handle: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub num_employees: Option<i32>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// A company together with its jobs, ordered by title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<JobSummary>,
}

impl FromRow for Company {
    fn from_row(row: &Row) -> JoblyResult<Self> {
        Ok(Self {
            handle: row.try_get_column("handle")?,
            name: row.try_get_column("name")?,
            description: row.try_get_column("description")?,
            num_employees: row.try_get_column("num_employees")?,
            logo_url: row.try_get_column("logo_url")?,
        })
    }
}

fn no_company(handle: &str) -> JoblyError {
    JoblyError::not_found(format!("No company: {handle}"))
}

impl Company {
    /// Insert a company.
    ///
    /// Fails with [`JoblyError::Duplicate`] when the handle is taken.
    pub async fn create(client: &impl GenericClient, new: &NewCompany) -> JoblyResult<Company> {
        let dup = "SELECT handle FROM companies WHERE handle = $1";
        log_sql("company.create.check", dup, 1);
        if client.query_opt(dup, &[&new.handle]).await?.is_some() {
            return Err(JoblyError::Duplicate(format!(
                "Duplicate company: {}",
                new.handle
            )));
        }

        let sql = format!(
            "INSERT INTO companies (handle, name, description, num_employees, logo_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        );
        log_sql("company.create", &sql, 5);
        let row = client
            .query_one(
                &sql,
                &[
                    &new.handle,
                    &new.name,
                    &new.description,
                    &new.num_employees,
                    &new.logo_url,
                ],
            )
            .await?;
        Company::from_row(&row)
    }

    /// All companies, ordered by name.
    pub async fn find_all(client: &impl GenericClient) -> JoblyResult<Vec<Company>> {
        let sql = format!("SELECT {COLUMNS} FROM companies ORDER BY name");
        log_sql("company.find_all", &sql, 0);
        let rows = client.query(&sql, &[]).await?;
        rows.iter().map(Company::from_row).collect()
    }

    /// One company with its jobs.
    pub async fn get(client: &impl GenericClient, handle: &str) -> JoblyResult<CompanyDetail> {
        let sql = format!("SELECT {COLUMNS} FROM companies WHERE handle = $1");
        log_sql("company.get", &sql, 1);
        let row = client
            .query_opt(&sql, &[&handle])
            .await?
            .ok_or_else(|| no_company(handle))?;
        let company = Company::from_row(&row)?;

        let jobs_sql =
            "SELECT id, title, salary, equity FROM jobs WHERE company_handle = $1 ORDER BY title";
        log_sql("company.get.jobs", jobs_sql, 1);
        let jobs = client
            .query(jobs_sql, &[&handle])
            .await?
            .iter()
            .map(JobSummary::from_row)
            .collect::<JoblyResult<Vec<_>>>()?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Partially update a company.
    ///
    /// Accepted fields: `name`, `description`, `numEmployees`, `logoUrl`.
    pub async fn update(
        client: &impl GenericClient,
        handle: &str,
        data: &FieldMap,
    ) -> JoblyResult<Company> {
        let set = build_set_fragment(data, &EntityKind::Company.update_columns())?;
        let sql = update_returning("companies", &set, "handle", COLUMNS);

        let mut params = set.params_ref();
        params.push(&handle);
        log_sql("company.update", &sql, params.len());

        let row = client
            .query_opt(&sql, &params)
            .await?
            .ok_or_else(|| no_company(handle))?;
        Company::from_row(&row)
    }

    /// Delete a company (its jobs go with it).
    pub async fn remove(client: &impl GenericClient, handle: &str) -> JoblyResult<()> {
        let sql = "DELETE FROM companies WHERE handle = $1";
        log_sql("company.remove", sql, 1);
        if client.execute(sql, &[&handle]).await? == 0 {
            return Err(no_company(handle));
        }
        Ok(())
    }

    /// Companies matching a search request, ordered by name.
    pub async fn search(
        client: &impl GenericClient,
        request: &SearchRequest,
    ) -> JoblyResult<Vec<Company>> {
        if request.kind() != EntityKind::Company {
            return Err(JoblyError::invalid(format!(
                "expected a companies search, got {}",
                request.kind()
            )));
        }
        let filter = request.where_fragment()?;
        let sql = select_where(COLUMNS, "companies", &filter, "name");
        log_sql("company.search", &sql, filter.len());
        let rows = client.query(&sql, &filter.params_ref()).await?;
        rows.iter().map(Company::from_row).collect()
    }
}
