use jobly::fragment::placeholder_indices;
use jobly::{
    ColumnMap, EntityKind, FieldMap, FieldValue, FragmentBuilder, SearchRequest,
    build_set_fragment, build_where_fragment, field_map,
};

const FIELDS: [(&str, &str); 4] = [
    ("name", "name"),
    ("description", "description"),
    ("numEmployees", "num_employees"),
    ("logoUrl", "logo_url"),
];

/// Every non-empty ordered subset of the company fields, as field maps.
fn company_updates() -> Vec<FieldMap> {
    let mut out = Vec::new();
    for mask in 1u32..(1 << FIELDS.len()) {
        let mut map = FieldMap::new();
        for (i, (field, _)) in FIELDS.iter().enumerate() {
            if mask & (1 << i) != 0 {
                map.insert(*field, FieldValue::Int(i as i64));
            }
        }
        let mut pairs: Vec<_> = map.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        pairs.reverse();
        out.push(map);
        out.push(pairs.into_iter().collect());
    }
    out
}

#[test]
fn set_fragment_assignments_follow_field_order() {
    let columns = EntityKind::Company.update_columns();
    for fields in company_updates() {
        let frag = build_set_fragment(&fields, &columns).unwrap();
        let assignments: Vec<&str> = frag.sql().split(", ").collect();
        assert_eq!(assignments.len(), fields.len());
        assert_eq!(frag.values().len(), fields.len());
        assert_eq!(placeholder_indices(frag.sql()), (1..=fields.len()).collect::<Vec<_>>());

        for (i, ((field, value), assignment)) in fields.iter().zip(&assignments).enumerate() {
            let column = FIELDS.iter().find(|(f, _)| *f == field).unwrap().1;
            assert_eq!(*assignment, format!("\"{column}\"=${}", i + 1));
            assert_eq!(&frag.values()[i], value);
        }
        frag.check().unwrap();
    }
}

#[test]
fn set_fragment_without_fields_is_rejected() {
    let err = build_set_fragment(&FieldMap::new(), &ColumnMap::aliases()).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(err.to_string(), "Invalid argument: no data supplied");
}

#[test]
fn set_fragment_with_alias_table() {
    let aliases = ColumnMap::try_from(&[("numEmployees", "num_employees")][..]).unwrap();
    let frag = build_set_fragment(&field_map! { "name" => "C1" }, &aliases).unwrap();
    assert_eq!(frag.sql(), "\"name\"=$1");
    assert_eq!(frag.values(), &[FieldValue::from("C1")]);

    let aliases = ColumnMap::try_from(
        &[("numEmployees", "num_employees"), ("logoUrl", "logo_url")][..],
    )
    .unwrap();
    let frag = build_set_fragment(
        &field_map! { "numEmployees" => 10, "logoUrl" => "x.png" },
        &aliases,
    )
    .unwrap();
    assert_eq!(frag.sql(), "\"num_employees\"=$1, \"logo_url\"=$2");
    assert_eq!(frag.values(), &[FieldValue::Int(10), FieldValue::from("x.png")]);
}

#[test]
fn where_fragments_for_every_job_filter_combination() {
    let flags = [FieldValue::Bool(true), FieldValue::Bool(false), FieldValue::Null];
    for flag in &flags {
        for with_title in [false, true] {
            for with_salary in [false, true] {
                let mut params = FieldMap::new();
                if with_title {
                    params.insert("title", "dev");
                }
                params.insert("hasEquity", flag.clone());
                if with_salary {
                    params.insert("minSalary", 100);
                }

                let frag = build_where_fragment(&params, EntityKind::Job).unwrap();
                let expected =
                    usize::from(with_title) + usize::from(with_salary) + usize::from(flag.is_truthy());
                assert_eq!(frag.len(), expected);
                assert_eq!(placeholder_indices(frag.sql()), (1..=expected).collect::<Vec<_>>());
                frag.check().unwrap();
            }
        }
    }
}

#[test]
fn search_request_builds_the_same_fragment_as_the_builder() {
    let request = SearchRequest::from_query(
        EntityKind::Company,
        [("name", "c"), ("minEmployees", "5")],
    )
    .unwrap();
    let direct = build_where_fragment(
        &field_map! { "name" => "c", "minEmployees" => 5 },
        EntityKind::Company,
    )
    .unwrap();
    assert_eq!(request.where_fragment().unwrap(), direct);
    assert_eq!(direct.sql(), "name ILIKE $1 AND num_employees >= $2");
}

#[test]
fn update_fragment_composes_with_a_trailing_key() {
    let set = build_set_fragment(
        &field_map! { "title" => "Dev", "salary" => 10 },
        &EntityKind::Job.update_columns(),
    )
    .unwrap();

    let mut b = FragmentBuilder::new();
    b.push("UPDATE jobs SET ")
        .push(set.sql())
        .push(&format!(" WHERE title = ${}", set.next_placeholder()));
    let sql = b.build();
    assert_eq!(
        sql.sql(),
        "UPDATE jobs SET \"title\"=$1, \"salary\"=$2 WHERE title = $3"
    );
}

#[test]
fn field_map_from_json_keeps_document_order() {
    let fields: FieldMap =
        serde_json::from_str(r#"{"logoUrl": "x.png", "numEmployees": 10}"#).unwrap();
    let frag = build_set_fragment(&fields, &EntityKind::Company.update_columns()).unwrap();
    assert_eq!(frag.sql(), "\"logo_url\"=$1, \"num_employees\"=$2");

    assert!(serde_json::from_str::<FieldMap>(r#"{"name": ["a"]}"#).is_err());
}
