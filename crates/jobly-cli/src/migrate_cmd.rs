use crate::cli::MigrateArgs;
use crate::db;

pub async fn run(args: MigrateArgs) -> anyhow::Result<()> {
    let pool = db::connect(&args.connect)?;

    if args.status {
        let status = jobly::migrate::status_pool(&pool).await?;
        for (version, name) in &status.applied {
            println!("applied  V{version}__{name}");
        }
        for (version, name) in &status.pending {
            println!("pending  V{version}__{name}");
        }
        if status.applied.is_empty() && status.pending.is_empty() {
            println!("no migrations");
        }
        return Ok(());
    }

    let report = jobly::migrate::run_pool(&pool).await?;
    let applied = report.applied_migrations();
    if applied.is_empty() {
        println!("up to date");
    } else {
        for m in applied {
            println!("applied  {m}");
        }
    }
    Ok(())
}
