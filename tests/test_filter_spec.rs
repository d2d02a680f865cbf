use logconf::filter::{Filter, FilterError, filter_from_model, model_to_spec, parse_filter_spec};
use serde_json::json;

fn parse_one(spec: &str) -> Filter {
    parse_filter_spec(spec)
        .expect("valid spec")
        .expect("non-empty spec")
}

#[test]
fn test_compile_then_parse_round_trip() {
    let trees = vec![
        Filter::Accept,
        Filter::Deny,
        Filter::Not(Box::new(Filter::Levels("DEBUG".to_string()))),
        Filter::All(vec![
            Filter::Match("core".to_string()),
            Filter::Any(vec![Filter::Accept, Filter::Deny]),
        ]),
        Filter::LevelChange("WARN".to_string()),
        Filter::LevelRange {
            min: "INFO".to_string(),
            min_inclusive: true,
            max: "ERROR".to_string(),
            max_inclusive: true,
        },
        Filter::Substitute {
            pattern: "secret=\\w+".to_string(),
            replacement: "secret=***".to_string(),
            all: true,
        },
    ];

    for tree in trees {
        let spec = tree.to_spec();
        let reparsed = parse_one(&spec);
        assert_eq!(reparsed, tree, "round trip failed for '{spec}'");
    }
}

#[test]
fn test_parse_then_compile_reaches_a_fixed_point() {
    let specs = [
        "accept",
        " any( deny , levels(INFO) ) ",
        r#"all(match("a b"),substitute("x","y"))"#,
        "levelRange(TRACE,FATAL]",
        "not(not(not(accept)))",
    ];

    for spec in specs {
        let first = parse_one(spec);
        let normalized = first.to_spec();
        let second = parse_one(&normalized);
        assert_eq!(second, first, "tree changed after normalizing '{spec}'");
        // A normalized spec is its own normal form
        assert_eq!(second.to_spec(), normalized);
    }
}

#[test]
fn test_backslash_escaping_survives_round_trip() {
    let tree = Filter::Match("a\\b".to_string());
    let spec = tree.to_spec();
    assert_eq!(spec, r#"match("a\\b")"#);
    assert_eq!(parse_one(&spec), tree);
}

#[test]
fn test_levels_collapse_keeps_first_level() {
    assert_eq!(
        parse_one("levels(ALL,INFO)"),
        Filter::Levels("ALL".to_string())
    );
    assert_eq!(
        parse_one("levels(ALL,INFO)").to_spec(),
        "levels(ALL)"
    );
}

#[test]
fn test_nested_composition_is_exact() {
    let tree = parse_one("all(accept,not(deny))");
    assert_eq!(
        tree,
        Filter::All(vec![Filter::Accept, Filter::Not(Box::new(Filter::Deny))])
    );
    assert_eq!(tree.to_spec(), "all(accept,not(deny))");
}

#[test]
fn test_range_boundary_fidelity() {
    let tree = parse_one("levelRange[INFO,WARN)");
    assert_eq!(
        tree,
        Filter::LevelRange {
            min: "INFO".to_string(),
            min_inclusive: true,
            max: "WARN".to_string(),
            max_inclusive: false,
        }
    );
    assert_eq!(tree.to_spec(), "levelRange[INFO,WARN)");
}

#[test]
fn test_top_level_empty_input_is_not_an_error() {
    assert_eq!(parse_filter_spec("").unwrap(), None);
}

#[test]
fn test_error_taxonomy() {
    assert_eq!(
        parse_filter_spec("not()").unwrap_err(),
        FilterError::UnexpectedEndOfInput
    );
    assert_eq!(
        parse_filter_spec("match(abc)").unwrap_err(),
        FilterError::ExpectedString
    );
    assert_eq!(
        parse_filter_spec("frobnicate").unwrap_err(),
        FilterError::UnknownFilterKeyword("frobnicate".to_string())
    );
    assert_eq!(
        parse_filter_spec(r#"match("abc"#).unwrap_err(),
        FilterError::TruncatedExpression
    );
    assert_eq!(
        parse_filter_spec(r#"match("a\zb")"#).unwrap_err(),
        FilterError::InvalidEscape('z')
    );
    assert_eq!(
        parse_filter_spec("levelChange(7)").unwrap_err(),
        FilterError::ExpectedIdentifier
    );
}

#[test]
fn test_structured_form_round_trip_through_spec() {
    let model = json!({"any": [
        {"level": "ERROR"},
        {"all": [
            {"match": "core"},
            {"not": {"deny": true}},
        ]},
    ]});

    let spec = model_to_spec(&model).unwrap().unwrap();
    assert_eq!(spec, r#"any(levels(ERROR),all(match("core"),not(deny)))"#);

    let read_back = parse_one(&spec).to_model();
    assert_eq!(filter_from_model(&read_back).unwrap(), filter_from_model(&model).unwrap());
}

#[test]
fn test_structured_null_compiles_to_absent_spec() {
    assert_eq!(model_to_spec(&serde_json::Value::Null).unwrap(), None);
}
