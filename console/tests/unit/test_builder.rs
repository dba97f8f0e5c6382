//! Editor and evaluation integration tests

use std::collections::HashMap;

use ajconsole::errors::ConsoleError;
use ajconsole::query::{Condition, ConditionKind, Filter, FilterEditor, Operator, Query, QueryEditor};
use openapi_client::models::{DeviceInfo, DeviceStatus};

fn device(status: DeviceStatus, labels: &[(&str, &str)]) -> DeviceInfo {
    DeviceInfo {
        id: "dev-1".to_string(),
        name: "rover".to_string(),
        status,
        labels: labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
        last_seen: None,
    }
}

#[test]
fn test_empty_allow_list_is_a_configuration_error() {
    assert!(matches!(
        FilterEditor::new(Some(&[])),
        Err(ConsoleError::NoSelectableKinds(_))
    ));
    assert!(matches!(
        QueryEditor::new(Some(&[])),
        Err(ConsoleError::NoSelectableKinds(_))
    ));
}

#[test]
fn test_whitelist_limits_kinds_and_seed() {
    let mut editor = FilterEditor::new(Some(&[ConditionKind::LabelValue])).unwrap();
    assert_eq!(editor.selectable_kinds(), &[ConditionKind::LabelValue]);
    assert_eq!(editor.draft(), &Filter::seeded(ConditionKind::LabelValue));

    editor.add_condition();
    assert!(editor
        .draft()
        .iter()
        .all(|c| c.kind() == ConditionKind::LabelValue));
}

#[test]
fn test_kind_switch_discards_previous_fields() {
    let mut editor = FilterEditor::new(None).unwrap();
    editor.change_kind(0, ConditionKind::LabelValue).unwrap();
    editor.set_key(0, "env").unwrap();
    editor.set_value(0, "prod").unwrap();

    editor.change_kind(0, ConditionKind::LabelExistence).unwrap();
    assert_eq!(
        editor.draft().conditions()[0],
        Condition::label_existence("", Operator::Exists)
    );

    editor.change_kind(0, ConditionKind::LabelValue).unwrap();
    assert_eq!(
        editor.draft().conditions()[0],
        Condition::label_value("", Operator::Is, "")
    );
}

#[test]
fn test_reopened_dialog_starts_fresh() {
    let mut editor = FilterEditor::new(None).unwrap();
    editor.add_condition();
    editor.set_value(0, "offline").unwrap();
    editor.cancel();
    assert_eq!(editor.draft(), &Filter::seeded(ConditionKind::DeviceProperty));
}

#[test]
fn test_edit_out_of_range() {
    let mut editor = QueryEditor::new(None).unwrap();
    assert!(matches!(
        editor.add_condition(3),
        Err(ConsoleError::IndexOutOfRange { .. })
    ));
    assert!(matches!(
        editor.change_kind(0, 1, ConditionKind::LabelValue),
        Err(ConsoleError::IndexOutOfRange { .. })
    ));
    assert_eq!(editor.query().len(), 1);
}

#[test]
fn test_and_of_or_against_devices() {
    let query = Query::new(vec![
        Filter::new(vec![Condition::device_property("status", Operator::Is, "online")]),
        Filter::new(vec![
            Condition::label_value("env", Operator::Is, "prod"),
            Condition::label_value("env", Operator::Is, "staging"),
        ]),
    ]);

    assert!(query.matches(&device(DeviceStatus::Online, &[("env", "prod")])));
    assert!(query.matches(&device(DeviceStatus::Online, &[("env", "staging")])));
    assert!(!query.matches(&device(DeviceStatus::Offline, &[("env", "staging")])));
    assert!(!query.matches(&device(DeviceStatus::Online, &[("env", "qa")])));
}
