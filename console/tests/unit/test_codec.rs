//! Codec integration tests

use ajconsole::query::codec::{
    decode_query, decode_token, encode_filter, encode_query, raw_filters,
};
use ajconsole::query::render::{render_chips, render_raw_chips, RENDER_ERROR_LABEL};
use ajconsole::query::{
    Condition, ConditionKind, DeviceListState, Filter, FilterEditor, Operator, Query, QueryEditor,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};

fn edited_query() -> Query {
    let mut editor = QueryEditor::new(None).unwrap();
    editor.add_condition(0).unwrap();
    editor
        .change_kind(0, 1, ConditionKind::LabelExistence)
        .unwrap();
    editor
        .edit(0, 1, ajconsole::query::ConditionEdit::Key("gpu".to_string()))
        .unwrap();

    let mut dialog = FilterEditor::new(None).unwrap();
    dialog.change_kind(0, ConditionKind::LabelValue).unwrap();
    dialog.set_key(0, "env").unwrap();
    dialog.set_operator(0, Operator::IsNot).unwrap();
    dialog.set_value(0, "prod/eu = 1").unwrap();
    editor.append_filter(dialog.commit());

    editor.into_query()
}

#[test]
fn test_round_trip_of_edited_query() {
    let query = edited_query();
    assert_eq!(query.len(), 2);

    let tokens = encode_query(&query).unwrap();
    assert_eq!(decode_query(&tokens), query);
}

#[test]
fn test_round_trip_through_query_string() {
    let state = DeviceListState {
        query: edited_query(),
        page: 4,
        order_by: Some("last_seen".to_string()),
        order: Some("asc".to_string()),
    };
    let url = state.to_query_string().unwrap();
    assert_eq!(DeviceListState::from_query_string(&url), state);
}

#[test]
fn test_invalid_base64_token_is_dropped() {
    let good = encode_filter(&Filter::seeded(ConditionKind::DeviceProperty)).unwrap();
    let query = decode_query(&[good.as_str(), "not*base64"]);
    assert_eq!(query, Query::new(vec![Filter::seeded(ConditionKind::DeviceProperty)]));
}

#[test]
fn test_wrong_params_shape_is_dropped() {
    let json = r#"[
        {"type": "LabelValueCondition", "params": {"property": "status"}},
        {"type": "LabelValueCondition", "params": {"key": "env", "operator": "is", "value": "prod"}}
    ]"#;
    let filter = decode_token(&STANDARD.encode(json)).unwrap().unwrap();
    assert_eq!(
        filter,
        Filter::new(vec![Condition::label_value("env", Operator::Is, "prod")])
    );

    let only_bad = r#"[{"type": "LabelValueCondition", "params": {"property": "status"}}]"#;
    assert_eq!(decode_token(&STANDARD.encode(only_bad)).unwrap(), None);
}

#[test]
fn test_corrupted_url_degrades_to_partial_query() {
    let good = encode_filter(&Filter::new(vec![Condition::label_existence(
        "gpu",
        Operator::Exists,
    )]))
    .unwrap();
    let bad_json = STANDARD.encode("[{\"type\":");
    let url = format!("filter={}&filter={}&filter=%%%&page=2", good, bad_json);

    let state = DeviceListState::from_query_string(&url);
    assert_eq!(state.query.len(), 1);
    assert_eq!(state.page, 2);
}

#[test]
fn test_empty_query_encodes_to_nothing() {
    assert!(encode_query(&Query::default()).unwrap().is_empty());
    assert_eq!(encode_query(&Query::new(vec![Filter::default()])).unwrap().len(), 1);
}

#[test]
fn test_dropped_conditions_stay_visible_as_written() {
    let mixed = STANDARD.encode(
        r#"[{"type":"LabelExistenceCondition","params":{"key":"gpu","operator":"exists"}},{"type":"LabelValueCondition","params":{"key":"env","operator":"exists","value":"x"}}]"#,
    );
    let query_string = format!("filter={}", mixed.replace('+', "%2B").replace('=', "%3D"));

    let state = DeviceListState::from_query_string(&query_string);
    assert_eq!(render_chips(&state.query, false)[0].text(), "gpu exists");

    let written = render_raw_chips(&raw_filters(&query_string), false);
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].labels, vec!["gpu exists", RENDER_ERROR_LABEL]);
}
