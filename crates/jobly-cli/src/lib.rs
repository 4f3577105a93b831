mod cli;
mod db;
mod entity_cmd;
mod fragment_cmd;
mod migrate_cmd;
mod output;

pub async fn run(args: Vec<String>) -> anyhow::Result<()> {
    let cmd = cli::parse_args(&args)?;
    match cmd {
        cli::Command::Help(topic) => {
            cli::print_help(topic);
            Ok(())
        }
        cli::Command::Migrate(args) => migrate_cmd::run(args).await,
        cli::Command::Entity(args) => entity_cmd::run(args).await,
        cli::Command::Fragment(cmd) => fragment_cmd::run(cmd),
    }
}
