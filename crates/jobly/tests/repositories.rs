use jobly::{
    Company, EntityKind, Job, JoblyError, JoblyResult, NewCompany, NewJob, SearchRequest,
    field_map,
};
use rust_decimal::Decimal;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio_postgres::NoTls;

fn unique_tag() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before UNIX_EPOCH")
        .as_nanos();
    format!("t{:x}", nanos as u64)
}

fn new_company(tag: &str, suffix: &str, employees: i32) -> NewCompany {
    NewCompany {
        handle: format!("{tag}{suffix}"),
        name: format!("{tag} {suffix} Corp"),
        description: format!("Desc {suffix}"),
        num_employees: Some(employees),
        logo_url: None,
    }
}

// One test owns the whole flow: migrations must not race, and every write
// happens inside a transaction that is rolled back at the end.
#[tokio::test]
async fn repositories_roundtrip() -> JoblyResult<()> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping repositories_roundtrip");
            return Ok(());
        }
    };

    let (mut client, connection) = tokio_postgres::connect(&database_url, NoTls)
        .await
        .map_err(JoblyError::from_db_error)?;
    tokio::spawn(async move {
        let _ = connection.await;
    });

    jobly::migrate::run(&mut client).await?;

    let tx = client.transaction().await.map_err(JoblyError::from_db_error)?;
    let tag = unique_tag();

    // --- companies ---
    let c1 = Company::create(&tx, &new_company(&tag, "a", 1)).await?;
    assert_eq!(c1.num_employees, Some(1));
    Company::create(&tx, &new_company(&tag, "b", 20)).await?;
    Company::create(&tx, &new_company(&tag, "c", 300)).await?;

    let err = Company::create(&tx, &new_company(&tag, "a", 1)).await.unwrap_err();
    assert!(err.is_duplicate());

    let request = SearchRequest::from_query(
        EntityKind::Company,
        [("name", tag.as_str()), ("minEmployees", "10")],
    )?;
    let found = Company::search(&tx, &request).await?;
    let handles: Vec<_> = found.iter().map(|c| c.handle.clone()).collect();
    assert_eq!(handles, vec![format!("{tag}b"), format!("{tag}c")]);

    let updated = Company::update(
        &tx,
        &c1.handle,
        &field_map! { "numEmployees" => 10, "logoUrl" => "x.png" },
    )
    .await?;
    assert_eq!(updated.num_employees, Some(10));
    assert_eq!(updated.logo_url.as_deref(), Some("x.png"));
    assert_eq!(updated.name, c1.name);

    let err = Company::update(&tx, "nope", &field_map! { "name" => "x" })
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = Company::update(&tx, &c1.handle, &field_map! { "handle" => "other" })
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());

    // --- jobs ---
    let j1 = Job::create(
        &tx,
        &NewJob {
            title: format!("{tag} Engineer"),
            salary: Some(100),
            equity: Some(Decimal::new(5, 2)),
            company_handle: c1.handle.clone(),
        },
    )
    .await?;
    assert_eq!(j1.equity, Some(Decimal::new(5, 2)));
    Job::create(
        &tx,
        &NewJob {
            title: format!("{tag} Analyst"),
            salary: Some(200),
            equity: Some(Decimal::ZERO),
            company_handle: c1.handle.clone(),
        },
    )
    .await?;

    let request = SearchRequest::from_query(
        EntityKind::Job,
        [("title", tag.as_str()), ("hasEquity", "true")],
    )?;
    let with_equity = Job::search(&tx, &request).await?;
    assert_eq!(with_equity.len(), 1);
    assert_eq!(with_equity[0].id, j1.id);

    let request = SearchRequest::from_query(
        EntityKind::Job,
        [("title", tag.as_str()), ("hasEquity", "false"), ("minSalary", "150")],
    )?;
    let paid = Job::search(&tx, &request).await?;
    assert_eq!(paid.len(), 1);
    assert_eq!(paid[0].title, format!("{tag} Analyst"));

    let fetched = Job::get(&tx, &j1.title.to_uppercase()).await?;
    assert_eq!(fetched.id, j1.id);

    let moved = Job::update(&tx, &j1.title, &field_map! { "salary" => 150 }).await?;
    assert_eq!(moved.salary, Some(150));

    let err = Job::create(
        &tx,
        &NewJob {
            title: format!("{tag} Orphan"),
            salary: None,
            equity: None,
            company_handle: format!("{tag}zzz"),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, JoblyError::ForeignKeyViolation(_)));

    // The failed insert aborted the transaction; everything above is discarded.
    tx.rollback().await.map_err(JoblyError::from_db_error)?;
    Ok(())
}

#[tokio::test]
async fn company_detail_and_removal() -> JoblyResult<()> {
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping company_detail_and_removal");
            return Ok(());
        }
    };

    let (mut client, connection) = tokio_postgres::connect(&database_url, NoTls)
        .await
        .map_err(JoblyError::from_db_error)?;
    tokio::spawn(async move {
        let _ = connection.await;
    });

    // Wait for the schema rather than racing the other test's migration run.
    let mut ready = false;
    for _ in 0..50 {
        let status = jobly::migrate::status(&client).await?;
        if status.pending.is_empty() {
            ready = true;
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }
    if !ready {
        eprintln!("schema not migrated; skipping company_detail_and_removal");
        return Ok(());
    }

    let tx = client.transaction().await.map_err(JoblyError::from_db_error)?;
    let tag = unique_tag();

    let company = Company::create(&tx, &new_company(&tag, "d", 5)).await?;
    for title in ["Zeta", "Alpha"] {
        Job::create(
            &tx,
            &NewJob {
                title: format!("{tag} {title}"),
                salary: None,
                equity: None,
                company_handle: company.handle.clone(),
            },
        )
        .await?;
    }

    let detail = Company::get(&tx, &company.handle).await?;
    assert_eq!(detail.company, company);
    let titles: Vec<_> = detail.jobs.iter().map(|j| j.title.clone()).collect();
    assert_eq!(titles, vec![format!("{tag} Alpha"), format!("{tag} Zeta")]);

    Company::remove(&tx, &company.handle).await?;
    assert!(Company::get(&tx, &company.handle).await.unwrap_err().is_not_found());
    assert!(Job::get(&tx, &format!("{tag} Alpha")).await.unwrap_err().is_not_found());
    assert!(Company::remove(&tx, &company.handle).await.unwrap_err().is_not_found());

    tx.rollback().await.map_err(JoblyError::from_db_error)?;
    Ok(())
}
