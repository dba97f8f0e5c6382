//! Device filter query model
//!
//! A [`Query`] is an AND of [`Filter`]s, each [`Filter`] an OR of [`Condition`]s.
//! The same structure serves as a device list filter and as an application
//! scheduling rule.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::ConsoleError;

/// Comparison attached to a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "is")]
    Is,
    #[serde(rename = "is not")]
    IsNot,
    #[serde(rename = "exists")]
    Exists,
    #[serde(rename = "does not exist")]
    DoesNotExist,
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Is => "is",
            Operator::IsNot => "is not",
            Operator::Exists => "exists",
            Operator::DoesNotExist => "does not exist",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition kinds, in the order they are offered for selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionKind {
    #[serde(rename = "DevicePropertyCondition")]
    DeviceProperty,
    #[serde(rename = "LabelValueCondition")]
    LabelValue,
    #[serde(rename = "LabelExistenceCondition")]
    LabelExistence,
}

impl ConditionKind {
    /// Every known kind in declared order
    pub const ALL: [ConditionKind; 3] = [
        ConditionKind::DeviceProperty,
        ConditionKind::LabelValue,
        ConditionKind::LabelExistence,
    ];

    /// Wire tag of the kind
    pub fn name(&self) -> &'static str {
        match self {
            ConditionKind::DeviceProperty => "DevicePropertyCondition",
            ConditionKind::LabelValue => "LabelValueCondition",
            ConditionKind::LabelExistence => "LabelExistenceCondition",
        }
    }

    /// Operators a condition of this kind accepts
    pub fn operators(&self) -> &'static [Operator] {
        match self {
            ConditionKind::DeviceProperty | ConditionKind::LabelValue => {
                &[Operator::Is, Operator::IsNot]
            }
            ConditionKind::LabelExistence => &[Operator::Exists, Operator::DoesNotExist],
        }
    }

    pub fn accepts(&self, operator: Operator) -> bool {
        self.operators().contains(&operator)
    }

    /// Default condition of this kind
    pub fn default_condition(&self) -> Condition {
        match self {
            ConditionKind::DeviceProperty => Condition::DeviceProperty(DevicePropertyParams {
                property: STATUS_PROPERTY.to_string(),
                operator: Operator::Is,
                value: STATUS_ONLINE.to_string(),
            }),
            ConditionKind::LabelValue => Condition::LabelValue(LabelValueParams {
                key: String::new(),
                operator: Operator::Is,
                value: String::new(),
            }),
            ConditionKind::LabelExistence => Condition::LabelExistence(LabelExistenceParams {
                key: String::new(),
                operator: Operator::Exists,
            }),
        }
    }
}

impl fmt::Display for ConditionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConditionKind {
    type Err = ConsoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConditionKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConsoleError::ValidationError(format!("Unknown condition kind: {}", s)))
    }
}

/// The only device property conditions currently address
pub const STATUS_PROPERTY: &str = "status";
pub const STATUS_ONLINE: &str = "online";

/// Compares a device property against a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DevicePropertyParams {
    pub property: String,
    pub operator: Operator,
    pub value: String,
}

/// Compares the value of a device label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelValueParams {
    pub key: String,
    pub operator: Operator,
    pub value: String,
}

/// Tests presence or absence of a device label key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelExistenceParams {
    pub key: String,
    pub operator: Operator,
}

/// A single predicate.
///
/// Serialized as `{"type": "<Kind>Condition", "params": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum Condition {
    #[serde(rename = "DevicePropertyCondition")]
    DeviceProperty(DevicePropertyParams),
    #[serde(rename = "LabelValueCondition")]
    LabelValue(LabelValueParams),
    #[serde(rename = "LabelExistenceCondition")]
    LabelExistence(LabelExistenceParams),
}

impl Condition {
    pub fn kind(&self) -> ConditionKind {
        match self {
            Condition::DeviceProperty(_) => ConditionKind::DeviceProperty,
            Condition::LabelValue(_) => ConditionKind::LabelValue,
            Condition::LabelExistence(_) => ConditionKind::LabelExistence,
        }
    }

    pub fn operator(&self) -> Operator {
        match self {
            Condition::DeviceProperty(p) => p.operator,
            Condition::LabelValue(p) => p.operator,
            Condition::LabelExistence(p) => p.operator,
        }
    }

    pub fn device_property(property: &str, operator: Operator, value: &str) -> Self {
        Condition::DeviceProperty(DevicePropertyParams {
            property: property.to_string(),
            operator,
            value: value.to_string(),
        })
    }

    pub fn label_value(key: &str, operator: Operator, value: &str) -> Self {
        Condition::LabelValue(LabelValueParams {
            key: key.to_string(),
            operator,
            value: value.to_string(),
        })
    }

    pub fn label_existence(key: &str, operator: Operator) -> Self {
        Condition::LabelExistence(LabelExistenceParams {
            key: key.to_string(),
            operator,
        })
    }
}

/// Conditions combined with OR
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(Vec<Condition>);

impl Filter {
    pub fn new(conditions: Vec<Condition>) -> Self {
        Self(conditions)
    }

    /// A filter holding the default condition of `kind`
    pub fn seeded(kind: ConditionKind) -> Self {
        Self(vec![kind.default_condition()])
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.0.iter()
    }

    pub fn into_conditions(self) -> Vec<Condition> {
        self.0
    }
}

impl From<Vec<Condition>> for Filter {
    fn from(conditions: Vec<Condition>) -> Self {
        Self(conditions)
    }
}

impl FromIterator<Condition> for Filter {
    fn from_iter<I: IntoIterator<Item = Condition>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Filter {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Filters combined with AND
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(Vec<Filter>);

impl Query {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self(filters)
    }

    pub fn filters(&self) -> &[Filter] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.0.iter()
    }

    pub fn into_filters(self) -> Vec<Filter> {
        self.0
    }

    /// Copy of this query with `filter` appended
    pub fn with_filter(&self, filter: Filter) -> Query {
        Query(crate::query::update::appended(&self.0, filter))
    }

    /// Copy of this query without the filter at `index`
    pub fn without_filter(&self, index: usize) -> Result<Query, ConsoleError> {
        crate::query::update::remove_at(&self.0, index)
            .map(Query)
            .ok_or(ConsoleError::IndexOutOfRange {
                what: "query",
                index,
                len: self.0.len(),
            })
    }

    /// Keep only conditions whose kind is in `kinds`.
    ///
    /// Filters left empty by the stripping are dropped; filters that were
    /// already empty are kept.
    pub fn retain_kinds(&self, kinds: &[ConditionKind]) -> Query {
        self.0
            .iter()
            .filter_map(|filter| {
                let kept: Filter = filter
                    .iter()
                    .filter(|c| kinds.contains(&c.kind()))
                    .cloned()
                    .collect();
                if kept.len() < filter.len() {
                    warn!(
                        "Stripped {} condition(s) of disallowed kind from filter",
                        filter.len() - kept.len()
                    );
                }
                if kept.is_empty() && !filter.is_empty() {
                    None
                } else {
                    Some(kept)
                }
            })
            .collect()
    }
}

impl From<Vec<Filter>> for Query {
    fn from(filters: Vec<Filter>) -> Self {
        Self(filters)
    }
}

impl FromIterator<Filter> for Query {
    fn from_iter<I: IntoIterator<Item = Filter>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Query {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Condition kinds an editor may offer.
///
/// Always non-empty and in [`ConditionKind::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableKinds(Vec<ConditionKind>);

impl SelectableKinds {
    /// Intersect an optional allow-list with the known kinds.
    ///
    /// `None` offers every kind. An allow-list sharing nothing with the known
    /// kinds is a configuration error.
    pub fn new(allow_list: Option<&[ConditionKind]>) -> Result<Self, ConsoleError> {
        let kinds: Vec<ConditionKind> = match allow_list {
            None => ConditionKind::ALL.to_vec(),
            Some(allowed) => ConditionKind::ALL
                .into_iter()
                .filter(|kind| allowed.contains(kind))
                .collect(),
        };

        if kinds.is_empty() {
            let names = allow_list
                .unwrap_or_default()
                .iter()
                .map(|k| k.name().to_string())
                .collect();
            return Err(ConsoleError::NoSelectableKinds(names));
        }

        Ok(Self(kinds))
    }

    /// Same as [`SelectableKinds::new`] from wire names; unknown names are ignored
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ConsoleError> {
        let mut allowed = Vec::new();
        for name in names {
            match name.as_ref().parse::<ConditionKind>() {
                Ok(kind) => allowed.push(kind),
                Err(_) => warn!("Ignoring unknown condition kind in allow-list: {}", name.as_ref()),
            }
        }

        Self::new(Some(&allowed)).map_err(|_| {
            ConsoleError::NoSelectableKinds(names.iter().map(|n| n.as_ref().to_string()).collect())
        })
    }

    pub fn all() -> Self {
        Self(ConditionKind::ALL.to_vec())
    }

    /// Kind used for new conditions and fresh filters
    pub fn first(&self) -> ConditionKind {
        self.0[0]
    }

    pub fn contains(&self, kind: ConditionKind) -> bool {
        self.0.contains(&kind)
    }

    pub fn as_slice(&self) -> &[ConditionKind] {
        &self.0
    }

    /// Fresh filter holding the default condition of the first kind
    pub fn default_filter(&self) -> Filter {
        Filter::seeded(self.first())
    }
}

impl Default for SelectableKinds {
    fn default() -> Self {
        Self::all()
    }
}
