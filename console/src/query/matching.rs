//! Evaluation of queries against devices
//!
//! A query matches when every filter matches; a filter matches when any of
//! its conditions does. An empty query matches every device, an empty filter
//! matches none.

use openapi_client::models::DeviceInfo;

use crate::query::model::{Condition, Filter, Operator, Query, STATUS_PROPERTY};

/// Attributes a condition can inspect on a device
pub trait DeviceAttributes {
    fn property(&self, name: &str) -> Option<&str>;

    fn label(&self, key: &str) -> Option<&str>;
}

impl DeviceAttributes for DeviceInfo {
    fn property(&self, name: &str) -> Option<&str> {
        match name {
            STATUS_PROPERTY => Some(self.status.as_str()),
            "name" => Some(self.name.as_str()),
            "id" => Some(self.id.as_str()),
            _ => None,
        }
    }

    fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

fn compare(operator: Operator, actual: Option<&str>, expected: Option<&str>) -> bool {
    match operator {
        Operator::Is => actual.is_some() && actual == expected,
        Operator::IsNot => actual.is_none() || actual != expected,
        Operator::Exists => actual.is_some(),
        Operator::DoesNotExist => actual.is_none(),
    }
}

impl Condition {
    pub fn matches<D: DeviceAttributes + ?Sized>(&self, device: &D) -> bool {
        match self {
            Condition::DeviceProperty(p) => compare(
                p.operator,
                device.property(&p.property),
                Some(p.value.as_str()),
            ),
            Condition::LabelValue(p) => {
                compare(p.operator, device.label(&p.key), Some(p.value.as_str()))
            }
            Condition::LabelExistence(p) => compare(p.operator, device.label(&p.key), None),
        }
    }
}

impl Filter {
    pub fn matches<D: DeviceAttributes + ?Sized>(&self, device: &D) -> bool {
        self.iter().any(|condition| condition.matches(device))
    }
}

impl Query {
    pub fn matches<D: DeviceAttributes + ?Sized>(&self, device: &D) -> bool {
        self.iter().all(|filter| filter.matches(device))
    }
}
