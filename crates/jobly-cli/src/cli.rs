use jobly::EntityKind;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Migrate,
    Entity(EntityKind),
    Fragment,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Migrate(MigrateArgs),
    Entity(EntityArgs),
    Fragment(FragmentCommand),
}

/// Where to find the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectArgs {
    pub config: Option<PathBuf>,
    pub database: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MigrateArgs {
    pub connect: ConnectArgs,
    pub status: bool,
}

#[derive(Debug, Clone)]
pub struct EntityArgs {
    pub kind: EntityKind,
    pub connect: ConnectArgs,
    pub json: bool,
    pub action: EntityAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityAction {
    List,
    Get(String),
    Search(Vec<(String, String)>),
    Update {
        key: String,
        fields: Vec<(String, String)>,
    },
    Delete(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentCommand {
    /// `fragment set <entity> k=json..`
    Set {
        kind: EntityKind,
        fields: Vec<(String, String)>,
    },
    /// `fragment where <entity> k=v..`
    Where {
        kind: EntityKind,
        params: Vec<(String, String)>,
    },
}

struct GlobalArgs {
    connect: ConnectArgs,
    json: bool,
    help: bool,
    positional: Vec<String>,
}

fn split_globals<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<GlobalArgs> {
    let mut out = GlobalArgs {
        connect: ConnectArgs::default(),
        json: false,
        help: false,
        positional: Vec::new(),
    };

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => out.help = true,
            "--json" => out.json = true,
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                out.connect.config = Some(PathBuf::from(v));
            }
            _ if token.starts_with("--config=") => {
                out.connect.config = Some(PathBuf::from(token.trim_start_matches("--config=")));
            }
            "--database" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--database requires a value");
                };
                out.connect.database = Some(v.to_string());
            }
            _ if token.starts_with("--database=") => {
                out.connect.database = Some(token.trim_start_matches("--database=").to_string());
            }
            other if other.starts_with("--") => anyhow::bail!("unknown argument: {other}"),
            other => out.positional.push(other.to_string()),
        }
    }

    Ok(out)
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let globals = split_globals(args.iter().skip(1).map(|s| s.as_str()))?;
    let mut words = globals.positional.into_iter();

    let Some(first) = words.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    let topic = match first.as_str() {
        "help" => return Ok(Command::Help(parse_help_topic(words.next().as_deref())?)),
        "migrate" => HelpTopic::Migrate,
        "fragment" => HelpTopic::Fragment,
        other => match parse_entity(other) {
            Some(kind) => HelpTopic::Entity(kind),
            None => anyhow::bail!("unknown command: {other}"),
        },
    };
    if globals.help {
        return Ok(Command::Help(topic));
    }

    let rest: Vec<String> = words.collect();
    match topic {
        HelpTopic::Migrate => parse_migrate(globals.connect, &rest),
        HelpTopic::Fragment => parse_fragment(&rest),
        HelpTopic::Entity(kind) => Ok(Command::Entity(EntityArgs {
            kind,
            connect: globals.connect,
            json: globals.json,
            action: parse_entity_action(kind, &rest)?,
        })),
        HelpTopic::Root => Ok(Command::Help(HelpTopic::Root)),
    }
}

fn parse_help_topic(word: Option<&str>) -> anyhow::Result<HelpTopic> {
    Ok(match word {
        None => HelpTopic::Root,
        Some("migrate") => HelpTopic::Migrate,
        Some("fragment") => HelpTopic::Fragment,
        Some(other) => match parse_entity(other) {
            Some(kind) => HelpTopic::Entity(kind),
            None => anyhow::bail!("unknown help topic: {other}"),
        },
    })
}

fn parse_entity(word: &str) -> Option<EntityKind> {
    EntityKind::from_name(word)
}

fn parse_migrate(connect: ConnectArgs, rest: &[String]) -> anyhow::Result<Command> {
    let status = match rest {
        [] => false,
        [s] if s == "status" => true,
        [s] if s == "up" => false,
        [other, ..] => anyhow::bail!("unknown migrate subcommand: {other}"),
    };
    Ok(Command::Migrate(MigrateArgs { connect, status }))
}

fn parse_entity_action(kind: EntityKind, rest: &[String]) -> anyhow::Result<EntityAction> {
    let Some((sub, args)) = rest.split_first() else {
        return Ok(EntityAction::List);
    };
    let key_name = match kind {
        EntityKind::Company => "handle",
        EntityKind::Job => "title",
    };

    match sub.as_str() {
        "list" => {
            expect_no_args(sub, args)?;
            Ok(EntityAction::List)
        }
        "get" | "delete" => {
            let [key] = args else {
                anyhow::bail!("{kind} {sub} requires exactly one <{key_name}>");
            };
            Ok(if sub == "get" {
                EntityAction::Get(key.clone())
            } else {
                EntityAction::Delete(key.clone())
            })
        }
        "search" => Ok(EntityAction::Search(parse_pairs(args)?)),
        "update" => {
            let Some((key, fields)) = args.split_first() else {
                anyhow::bail!("{kind} update requires <{key_name}> and at least one field=value");
            };
            if key.contains('=') {
                anyhow::bail!("{kind} update requires <{key_name}> before the fields");
            }
            Ok(EntityAction::Update {
                key: key.clone(),
                fields: parse_pairs(fields)?,
            })
        }
        other => anyhow::bail!("unknown {kind} subcommand: {other}"),
    }
}

fn parse_fragment(rest: &[String]) -> anyhow::Result<Command> {
    let [sub, entity, pairs @ ..] = rest else {
        anyhow::bail!("usage: jobly fragment <set|where> <entity> [key=value..]");
    };
    let Some(kind) = parse_entity(entity) else {
        anyhow::bail!("unknown entity: {entity}");
    };
    let pairs = parse_pairs(pairs)?;
    let cmd = match sub.as_str() {
        "set" => FragmentCommand::Set { kind, fields: pairs },
        "where" => FragmentCommand::Where {
            kind,
            params: pairs,
        },
        other => anyhow::bail!("unknown fragment subcommand: {other}"),
    };
    Ok(Command::Fragment(cmd))
}

fn expect_no_args(sub: &str, args: &[String]) -> anyhow::Result<()> {
    if let Some(extra) = args.first() {
        anyhow::bail!("{sub} takes no arguments (got {extra})");
    }
    Ok(())
}

/// Parse `key=value` tokens, keeping their order.
pub fn parse_pairs(tokens: &[String]) -> anyhow::Result<Vec<(String, String)>> {
    tokens
        .iter()
        .map(|t| {
            let Some((k, v)) = t.split_once('=') else {
                anyhow::bail!("expected key=value, got: {t}");
            };
            if k.is_empty() {
                anyhow::bail!("empty key in: {t}");
            }
            Ok((k.to_string(), v.to_string()))
        })
        .collect()
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
jobly - companies and jobs over PostgreSQL

USAGE:
  jobly [OPTIONS] <COMMAND>

COMMANDS:
  migrate [status]      Apply (or list) embedded schema migrations
  companies ...         List, get, search, update and delete companies
  jobs ...              List, get, search, update and delete jobs
  fragment ...          Render update/search SQL without a database
  help [COMMAND]        Print help

OPTIONS:
  --config <FILE>       Config file (default: DATABASE_URL from the environment)
  --database <URL>      Override the database URL
  --json                Print list/search results as JSON
  -h, --help            Print help

Set RUST_LOG=jobly.sql=debug to log executed SQL.
Run `jobly help <command>` for more."
            );
        }
        HelpTopic::Migrate => {
            println!(
                "\
USAGE:
  jobly migrate [up]
  jobly migrate status

OPTIONS:
  --config <FILE>       Config file path
  --database <URL>      Database URL (overrides config)
  -h, --help            Print help"
            );
        }
        HelpTopic::Entity(kind) => {
            let (key, filters, fields) = match kind {
                EntityKind::Company => (
                    "handle",
                    "name, minEmployees, maxEmployees",
                    "name, description, numEmployees, logoUrl",
                ),
                EntityKind::Job => (
                    "title",
                    "title, minSalary, hasEquity",
                    "title, salary, equity, companyHandle",
                ),
            };
            println!(
                "\
USAGE:
  jobly {kind} [list]
  jobly {kind} get <{key}>
  jobly {kind} search [FILTER=VALUE..]
  jobly {kind} update <{key}> [FIELD=JSON..]
  jobly {kind} delete <{key}>

FILTERS:
  {filters}

UPDATE FIELDS:
  {fields}
  Values are JSON scalars; anything that is not valid JSON is taken as text.

OPTIONS:
  --config <FILE>       Config file path
  --database <URL>      Database URL (overrides config)
  --json                Print JSON instead of a table
  -h, --help            Print help"
            );
        }
        HelpTopic::Fragment => {
            println!(
                "\
USAGE:
  jobly fragment set <companies|jobs> [FIELD=JSON..]
  jobly fragment where <companies|jobs> [FILTER=VALUE..]

Prints the rendered SQL fragment and its bound values. No database is used."
            );
        }
    }
}
