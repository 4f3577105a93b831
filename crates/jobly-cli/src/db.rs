use crate::cli::ConnectArgs;
use anyhow::Context;
use jobly::{DatabaseConfig, JoblyConfig, Pool};

/// Resolve the database config: `--database` wins, then `--config`, then the
/// environment.
pub fn load_config(args: &ConnectArgs) -> anyhow::Result<JoblyConfig> {
    match (&args.database, &args.config) {
        (Some(url), Some(path)) => {
            let mut config = JoblyConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            config.database.url = url.clone();
            Ok(config)
        }
        (Some(url), None) => Ok(JoblyConfig {
            database: DatabaseConfig::new(url.clone()),
        }),
        (None, Some(path)) => JoblyConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display())),
        (None, None) => JoblyConfig::from_env()
            .context("no database configured (use --config, --database or DATABASE_URL)"),
    }
}

pub fn connect(args: &ConnectArgs) -> anyhow::Result<Pool> {
    let config = load_config(args)?;
    config.validate()?;
    tracing::debug!(
        target: "jobly.cli",
        pool_size = config.database.pool_size,
        from_file = args.config.is_some(),
        "connecting"
    );
    Ok(jobly::create_pool_from_config(&config.database)?)
}
