use crate::cli::{EntityAction, EntityArgs};
use crate::db;
use crate::output::{COMPANY_COLUMNS, JOB_COLUMNS, print_json, print_rows};
use jobly::{Company, EntityKind, FieldMap, FieldValue, Job, SearchRequest};

pub async fn run(args: EntityArgs) -> anyhow::Result<()> {
    let pool = db::connect(&args.connect)?;
    let client = pool.get().await?;

    match (args.kind, args.action) {
        (EntityKind::Company, EntityAction::List) => {
            print_rows(&Company::find_all(&client).await?, COMPANY_COLUMNS, args.json)
        }
        (EntityKind::Job, EntityAction::List) => {
            print_rows(&Job::find_all(&client).await?, JOB_COLUMNS, args.json)
        }
        (EntityKind::Company, EntityAction::Get(handle)) => {
            print_json(&Company::get(&client, &handle).await?)
        }
        (EntityKind::Job, EntityAction::Get(title)) => print_json(&Job::get(&client, &title).await?),
        (kind, EntityAction::Search(pairs)) => {
            let request =
                SearchRequest::from_query(kind, pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
            match kind {
                EntityKind::Company => {
                    print_rows(&Company::search(&client, &request).await?, COMPANY_COLUMNS, args.json)
                }
                EntityKind::Job => {
                    print_rows(&Job::search(&client, &request).await?, JOB_COLUMNS, args.json)
                }
            }
        }
        (kind, EntityAction::Update { key, fields }) => {
            let fields = parse_fields(&fields)?;
            match kind {
                EntityKind::Company => print_json(&Company::update(&client, &key, &fields).await?),
                EntityKind::Job => print_json(&Job::update(&client, &key, &fields).await?),
            }
        }
        (kind, EntityAction::Delete(key)) => {
            match kind {
                EntityKind::Company => Company::remove(&client, &key).await?,
                EntityKind::Job => Job::remove(&client, &key).await?,
            }
            print_json(&serde_json::json!({ "deleted": key }))
        }
    }
}

/// Turn `key=value` pairs into a field map.
///
/// Values are read as JSON scalars (`10`, `true`, `null`, `"x"`); anything
/// that does not parse as JSON is taken as text.
pub fn parse_fields(pairs: &[(String, String)]) -> anyhow::Result<FieldMap> {
    let mut fields = FieldMap::new();
    for (key, raw) in pairs {
        let value = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(json) => FieldValue::try_from(json)
                .map_err(|e| anyhow::anyhow!("invalid value for {key}: {e}"))?,
            Err(_) => FieldValue::Text(raw.clone()),
        };
        fields.insert(key.as_str(), value);
    }
    Ok(fields)
}
