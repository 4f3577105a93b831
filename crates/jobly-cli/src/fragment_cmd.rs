use crate::cli::FragmentCommand;
use crate::entity_cmd::parse_fields;
use jobly::{Fragment, SearchRequest, build_set_fragment};

pub fn run(cmd: FragmentCommand) -> anyhow::Result<()> {
    let fragment = render(cmd)?;
    println!("{}", describe(&fragment));
    Ok(())
}

fn render(cmd: FragmentCommand) -> anyhow::Result<Fragment> {
    Ok(match cmd {
        FragmentCommand::Set { kind, fields } => {
            build_set_fragment(&parse_fields(&fields)?, &kind.update_columns())?
        }
        FragmentCommand::Where { kind, params } => {
            SearchRequest::from_query(kind, params.iter().map(|(k, v)| (k.as_str(), v.as_str())))?
                .where_fragment()?
        }
    })
}

fn describe(fragment: &Fragment) -> String {
    let mut out = if fragment.is_empty() {
        "sql:    (empty)".to_string()
    } else {
        format!("sql:    {}", fragment.sql())
    };
    for (i, value) in fragment.values().iter().enumerate() {
        let json = serde_json::to_string(value).unwrap_or_else(|_| value.to_string());
        out.push_str(&format!("\n${}:     {json}", i + 1));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobly::EntityKind;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn set_fragment_dry_run() {
        let frag = render(FragmentCommand::Set {
            kind: EntityKind::Company,
            fields: pairs(&[("numEmployees", "10"), ("logoUrl", "x.png")]),
        })
        .unwrap();
        assert_eq!(
            describe(&frag),
            "sql:    \"num_employees\"=$1, \"logo_url\"=$2\n$1:     10\n$2:     \"x.png\""
        );
    }

    #[test]
    fn where_fragment_dry_run() {
        let frag = render(FragmentCommand::Where {
            kind: EntityKind::Job,
            params: pairs(&[("hasEquity", "false"), ("minSalary", "100")]),
        })
        .unwrap();
        assert_eq!(describe(&frag), "sql:    salary >= $1\n$1:     100");
    }

    #[test]
    fn empty_where_fragment() {
        let frag = render(FragmentCommand::Where {
            kind: EntityKind::Company,
            params: Vec::new(),
        })
        .unwrap();
        assert_eq!(describe(&frag), "sql:    (empty)");
    }

    #[test]
    fn errors_surface() {
        assert!(
            render(FragmentCommand::Set {
                kind: EntityKind::Job,
                fields: Vec::new(),
            })
            .is_err()
        );
        assert!(
            render(FragmentCommand::Where {
                kind: EntityKind::Company,
                params: pairs(&[("minEmployees", "9"), ("maxEmployees", "1")]),
            })
            .is_err()
        );
    }
}
