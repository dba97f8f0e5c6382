//! Screen tests against an in-memory backend

use std::collections::HashMap;
use std::sync::Mutex;

use ajconsole::errors::ConsoleError;
use ajconsole::http::api::ConsoleApi;
use ajconsole::query::codec::{encode_filter, scheduling_rule_to_json};
use ajconsole::query::render::RemoveFilter;
use ajconsole::query::{
    Condition, ConditionKind, DeviceListState, Filter, Operator, Query, SelectableKinds,
};
use ajconsole::screens::devices::DeviceListScreen;
use ajconsole::screens::scheduling::SchedulingRuleScreen;
use async_trait::async_trait;
use openapi_client::models::{Application, DeviceInfo, DevicePage, DeviceStatus};
use serde_json::json;

struct FakeApi {
    devices: Vec<DeviceInfo>,
    application: Mutex<Application>,
    listed: Mutex<Vec<DeviceListState>>,
}

impl FakeApi {
    fn new(scheduling_rule: serde_json::Value) -> Self {
        let device = |id: &str, status, env: &str| DeviceInfo {
            id: id.to_string(),
            name: format!("robot-{}", id),
            status,
            labels: HashMap::from([("env".to_string(), env.to_string())]),
            last_seen: None,
        };

        Self {
            devices: vec![
                device("a", DeviceStatus::Online, "prod"),
                device("b", DeviceStatus::Offline, "prod"),
                device("c", DeviceStatus::Online, "dev"),
            ],
            application: Mutex::new(Application {
                id: "app-1".to_string(),
                name: "navigator".to_string(),
                scheduling_rule,
            }),
            listed: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ConsoleApi for FakeApi {
    async fn list_devices(
        &self,
        state: &DeviceListState,
        _page_size: u32,
    ) -> Result<DevicePage, ConsoleError> {
        self.listed.lock().unwrap().push(state.clone());
        let devices: Vec<DeviceInfo> = self
            .devices
            .iter()
            .filter(|d| state.query.matches(*d))
            .cloned()
            .collect();
        Ok(DevicePage {
            total: devices.len() as u64,
            devices,
            page: state.page,
        })
    }

    async fn get_application(&self, application_id: &str) -> Result<Application, ConsoleError> {
        let application = self.application.lock().unwrap().clone();
        if application.id != application_id {
            return Err(ConsoleError::ApiError {
                status: 404,
                body: "not found".to_string(),
            });
        }
        Ok(application)
    }

    async fn update_scheduling_rule(
        &self,
        _application_id: &str,
        rule: &Query,
    ) -> Result<Application, ConsoleError> {
        let mut application = self.application.lock().unwrap();
        application.scheduling_rule = scheduling_rule_to_json(rule)?;
        Ok(application.clone())
    }
}

#[test]
fn test_device_list_from_url_with_garbage() {
    let online = encode_filter(&Filter::seeded(ConditionKind::DeviceProperty)).unwrap();
    let url = format!("?filter={}&filter=@@@&page=x&order_by=name", online);
    let api = FakeApi::new(json!(null));

    let mut screen = DeviceListScreen::from_url(&url, 25).unwrap();
    assert_eq!(screen.state().query.len(), 1);
    assert_eq!(screen.state().page, 0);
    assert_eq!(screen.state().order_by.as_deref(), Some("name"));

    tokio_test::block_on(screen.refresh(&api)).unwrap();
    let ids: Vec<&str> = screen.devices().iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "c"]);
}

#[test]
fn test_device_list_dialog_and_chips() {
    let api = FakeApi::new(json!(null));
    let mut screen = DeviceListScreen::from_url("page=3", 25).unwrap();

    let dialog = screen.dialog_mut();
    dialog.change_kind(0, ConditionKind::LabelValue).unwrap();
    dialog.set_key(0, "env").unwrap();
    dialog.set_value(0, "prod").unwrap();
    let filter = screen.submit_dialog();
    assert_eq!(
        filter,
        Filter::new(vec![Condition::label_value("env", Operator::Is, "prod")])
    );
    assert_eq!(screen.state().page, 0);
    assert_eq!(screen.dialog().draft(), &Filter::seeded(ConditionKind::DeviceProperty));

    screen.submit_dialog();
    let chips = screen.chips();
    assert_eq!(chips.len(), 2);
    assert_eq!(chips[0].text(), "env is prod");
    assert_eq!(chips[1].text(), "status is online");

    tokio_test::block_on(screen.refresh(&api)).unwrap();
    assert_eq!(screen.total(), Some(1));

    let request = chips[0].remove_request().unwrap();
    screen.remove_filter(request).unwrap();
    assert_eq!(screen.chips()[0].text(), "status is online");
    assert!(screen.remove_filter(RemoveFilter { index: 5 }).is_err());

    let reopened = DeviceListScreen::from_url(&screen.url_query().unwrap(), 25).unwrap();
    assert_eq!(reopened.state(), screen.state());

    let listed = api.listed.lock().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].query.len(), 2);
}

#[test]
fn test_scheduling_rule_is_stripped_and_saved() {
    let api = FakeApi::new(json!([
        [
            { "type": "LabelValueCondition", "params": { "key": "env", "operator": "is", "value": "prod" } },
            { "type": "DevicePropertyCondition", "params": { "property": "status", "operator": "is", "value": "online" } }
        ],
        [
            { "type": "LabelExistenceCondition", "params": { "key": "gpu", "operator": "exists" } }
        ],
        [
            { "type": "LabelValueCondition", "params": { "bogus": true } }
        ]
    ]));
    let kinds = SelectableKinds::new(Some(&[ConditionKind::LabelValue])).unwrap();

    let mut screen =
        tokio_test::block_on(SchedulingRuleScreen::load(&api, "app-1", kinds)).unwrap();
    assert_eq!(
        screen.rule(),
        &Query::new(vec![Filter::new(vec![Condition::label_value(
            "env",
            Operator::Is,
            "prod"
        )])])
    );

    let dialog = screen.dialog_mut();
    dialog.set_key(0, "site").unwrap();
    dialog.set_value(0, "lyon").unwrap();
    screen.submit_dialog();
    assert_eq!(screen.rule().len(), 2);

    let saved = tokio_test::block_on(screen.save(&api)).unwrap().clone();
    assert_eq!(saved.len(), 2);
    assert_eq!(
        api.application.lock().unwrap().scheduling_rule[1][0]["params"]["key"],
        "site"
    );
}

#[test]
fn test_scheduling_screen_missing_application() {
    let api = FakeApi::new(json!(null));
    let result = tokio_test::block_on(SchedulingRuleScreen::load(
        &api,
        "nope",
        SelectableKinds::all(),
    ));
    assert!(matches!(result, Err(ConsoleError::ApiError { status: 404, .. })));
}
