//! Interactive query construction
//!
//! [`FilterEditor`] backs the "add filter" dialog: it builds one [`Filter`] at
//! a time and hands it to the caller on commit. [`QueryEditor`] edits a whole
//! [`Query`] in place, as the scheduling rule screen does. Both replace their
//! state through the helpers in [`crate::query::update`] rather than mutating
//! shared vectors.

use tracing::debug;

use crate::errors::ConsoleError;
use crate::query::model::{
    Condition, ConditionKind, DevicePropertyParams, Filter, LabelExistenceParams,
    LabelValueParams, Operator, Query, SelectableKinds,
};
use crate::query::update::{appended, remove_at, replace_at};

/// A single field change on a condition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionEdit {
    Property(String),
    Key(String),
    Operator(Operator),
    Value(String),
}

impl ConditionEdit {
    fn field(&self) -> &'static str {
        match self {
            ConditionEdit::Property(_) => "property",
            ConditionEdit::Key(_) => "key",
            ConditionEdit::Operator(_) => "operator",
            ConditionEdit::Value(_) => "value",
        }
    }
}

impl Condition {
    /// Copy of this condition with one field changed.
    ///
    /// Fails when the field does not exist on this kind or the operator does
    /// not apply to it.
    pub fn with_edit(&self, edit: ConditionEdit) -> Result<Condition, ConsoleError> {
        if let ConditionEdit::Operator(operator) = &edit {
            if !self.kind().accepts(*operator) {
                return Err(ConsoleError::InvalidEdit(format!(
                    "operator '{}' does not apply to {}",
                    operator,
                    self.kind()
                )));
            }
        }

        let edited = match (self, edit) {
            (Condition::DeviceProperty(p), ConditionEdit::Property(property)) => {
                Condition::DeviceProperty(DevicePropertyParams { property, ..p.clone() })
            }
            (Condition::DeviceProperty(p), ConditionEdit::Operator(operator)) => {
                Condition::DeviceProperty(DevicePropertyParams { operator, ..p.clone() })
            }
            (Condition::DeviceProperty(p), ConditionEdit::Value(value)) => {
                Condition::DeviceProperty(DevicePropertyParams { value, ..p.clone() })
            }
            (Condition::LabelValue(p), ConditionEdit::Key(key)) => {
                Condition::LabelValue(LabelValueParams { key, ..p.clone() })
            }
            (Condition::LabelValue(p), ConditionEdit::Operator(operator)) => {
                Condition::LabelValue(LabelValueParams { operator, ..p.clone() })
            }
            (Condition::LabelValue(p), ConditionEdit::Value(value)) => {
                Condition::LabelValue(LabelValueParams { value, ..p.clone() })
            }
            (Condition::LabelExistence(p), ConditionEdit::Key(key)) => {
                Condition::LabelExistence(LabelExistenceParams { key, ..p.clone() })
            }
            (Condition::LabelExistence(p), ConditionEdit::Operator(operator)) => {
                Condition::LabelExistence(LabelExistenceParams { operator, ..p.clone() })
            }
            (condition, edit) => {
                return Err(ConsoleError::InvalidEdit(format!(
                    "{} has no {} field",
                    condition.kind(),
                    edit.field()
                )));
            }
        };

        Ok(edited)
    }
}

fn condition_out_of_range(filter: &Filter, index: usize) -> ConsoleError {
    ConsoleError::IndexOutOfRange {
        what: "filter",
        index,
        len: filter.len(),
    }
}

fn ensure_selectable(kinds: &SelectableKinds, kind: ConditionKind) -> Result<(), ConsoleError> {
    if kinds.contains(kind) {
        Ok(())
    } else {
        Err(ConsoleError::InvalidEdit(format!(
            "{} is not selectable here",
            kind
        )))
    }
}

/// Filter with the condition at `index` switched to the defaults of `kind`
fn filter_with_kind(
    kinds: &SelectableKinds,
    filter: &Filter,
    index: usize,
    kind: ConditionKind,
) -> Result<Filter, ConsoleError> {
    ensure_selectable(kinds, kind)?;
    replace_at(filter.conditions(), index, kind.default_condition())
        .map(Filter::new)
        .ok_or_else(|| condition_out_of_range(filter, index))
}

/// Filter with one field of the condition at `index` changed
fn filter_with_edit(
    filter: &Filter,
    index: usize,
    edit: ConditionEdit,
) -> Result<Filter, ConsoleError> {
    let condition = filter
        .conditions()
        .get(index)
        .ok_or_else(|| condition_out_of_range(filter, index))?;
    let edited = condition.with_edit(edit)?;
    replace_at(filter.conditions(), index, edited)
        .map(Filter::new)
        .ok_or_else(|| condition_out_of_range(filter, index))
}

/// Editor for the one filter built by the "add filter" dialog
#[derive(Debug, Clone)]
pub struct FilterEditor {
    kinds: SelectableKinds,
    seed: Filter,
    draft: Filter,
}

impl FilterEditor {
    /// Create an editor offering the allowed kinds.
    ///
    /// Fails when the allow-list shares no kind with the known kinds.
    pub fn new(allow_list: Option<&[ConditionKind]>) -> Result<Self, ConsoleError> {
        Ok(Self::with_kinds(SelectableKinds::new(allow_list)?))
    }

    /// Editor seeded with the default condition of the first selectable kind
    pub fn with_kinds(kinds: SelectableKinds) -> Self {
        let seed = kinds.default_filter();
        Self::seeded(kinds, seed)
    }

    /// Editor seeded with an existing filter; commit and cancel return to it
    pub fn seeded(kinds: SelectableKinds, seed: Filter) -> Self {
        Self {
            kinds,
            draft: seed.clone(),
            seed,
        }
    }

    pub fn selectable_kinds(&self) -> &[ConditionKind] {
        self.kinds.as_slice()
    }

    /// The filter under construction
    pub fn draft(&self) -> &Filter {
        &self.draft
    }

    /// Append the default condition of the first selectable kind
    pub fn add_condition(&mut self) {
        let condition = self.kinds.first().default_condition();
        self.draft = Filter::new(appended(self.draft.conditions(), condition));
        debug!("Added condition, draft has {}", self.draft.len());
    }

    /// Remove the condition at `index`.
    ///
    /// The last remaining condition is kept; `Ok(false)` reports that no-op.
    pub fn remove_condition(&mut self, index: usize) -> Result<bool, ConsoleError> {
        if index >= self.draft.len() {
            return Err(condition_out_of_range(&self.draft, index));
        }
        if self.draft.len() == 1 {
            debug!("Keeping the only condition of the draft");
            return Ok(false);
        }
        if let Some(conditions) = remove_at(self.draft.conditions(), index) {
            self.draft = Filter::new(conditions);
        }
        Ok(true)
    }

    /// Switch the condition at `index` to `kind`, discarding its params
    pub fn change_kind(&mut self, index: usize, kind: ConditionKind) -> Result<(), ConsoleError> {
        self.draft = filter_with_kind(&self.kinds, &self.draft, index, kind)?;
        debug!("Condition {} switched to {}", index, kind);
        Ok(())
    }

    /// Apply one field change to the condition at `index`
    pub fn edit(&mut self, index: usize, edit: ConditionEdit) -> Result<(), ConsoleError> {
        self.draft = filter_with_edit(&self.draft, index, edit)?;
        Ok(())
    }

    pub fn set_property(&mut self, index: usize, property: &str) -> Result<(), ConsoleError> {
        self.edit(index, ConditionEdit::Property(property.to_string()))
    }

    pub fn set_key(&mut self, index: usize, key: &str) -> Result<(), ConsoleError> {
        self.edit(index, ConditionEdit::Key(key.to_string()))
    }

    pub fn set_operator(&mut self, index: usize, operator: Operator) -> Result<(), ConsoleError> {
        self.edit(index, ConditionEdit::Operator(operator))
    }

    pub fn set_value(&mut self, index: usize, value: &str) -> Result<(), ConsoleError> {
        self.edit(index, ConditionEdit::Value(value.to_string()))
    }

    /// Hand over the built filter and start over from the seed
    pub fn commit(&mut self) -> Filter {
        let built = std::mem::replace(&mut self.draft, self.seed.clone());
        debug!("Committed filter with {} condition(s)", built.len());
        built
    }

    /// Discard the draft and start over from the seed
    pub fn cancel(&mut self) {
        self.draft = self.seed.clone();
        debug!("Discarded filter draft");
    }
}

/// Editor for a whole query, e.g. an application's scheduling rule
#[derive(Debug, Clone)]
pub struct QueryEditor {
    kinds: SelectableKinds,
    seed: Query,
    query: Query,
}

impl QueryEditor {
    /// Editor holding one default filter.
    ///
    /// Fails when the allow-list shares no kind with the known kinds.
    pub fn new(allow_list: Option<&[ConditionKind]>) -> Result<Self, ConsoleError> {
        let kinds = SelectableKinds::new(allow_list)?;
        let seed = Query::new(vec![kinds.default_filter()]);
        Ok(Self::seeded(kinds, seed))
    }

    /// Editor starting from an existing query
    pub fn seeded(kinds: SelectableKinds, seed: Query) -> Self {
        Self {
            kinds,
            query: seed.clone(),
            seed,
        }
    }

    pub fn selectable_kinds(&self) -> &[ConditionKind] {
        self.kinds.as_slice()
    }

    pub fn kinds(&self) -> &SelectableKinds {
        &self.kinds
    }

    pub fn query(&self) -> &Query {
        &self.query
    }

    fn filter(&self, filter_index: usize) -> Result<&Filter, ConsoleError> {
        self.query
            .filters()
            .get(filter_index)
            .ok_or(ConsoleError::IndexOutOfRange {
                what: "query",
                index: filter_index,
                len: self.query.len(),
            })
    }

    fn replace_filter(&mut self, filter_index: usize, filter: Filter) -> Result<(), ConsoleError> {
        let filters = replace_at(self.query.filters(), filter_index, filter).ok_or(
            ConsoleError::IndexOutOfRange {
                what: "query",
                index: filter_index,
                len: self.query.len(),
            },
        )?;
        self.query = Query::new(filters);
        Ok(())
    }

    /// Append a fresh default filter
    pub fn add_filter(&mut self) {
        self.append_filter(self.kinds.default_filter());
    }

    /// Append a filter built elsewhere, e.g. committed from a [`FilterEditor`]
    pub fn append_filter(&mut self, filter: Filter) {
        self.query = self.query.with_filter(filter);
        debug!("Query now has {} filter(s)", self.query.len());
    }

    pub fn remove_filter(&mut self, filter_index: usize) -> Result<(), ConsoleError> {
        self.query = self.query.without_filter(filter_index)?;
        Ok(())
    }

    pub fn add_condition(&mut self, filter_index: usize) -> Result<(), ConsoleError> {
        let condition = self.kinds.first().default_condition();
        let filter = Filter::new(appended(self.filter(filter_index)?.conditions(), condition));
        self.replace_filter(filter_index, filter)
    }

    /// Remove a condition from a filter.
    ///
    /// Emptying the only filter is refused with `Ok(false)`; other filters may
    /// be left empty.
    pub fn remove_condition(
        &mut self,
        filter_index: usize,
        index: usize,
    ) -> Result<bool, ConsoleError> {
        let filter = self.filter(filter_index)?;
        if index >= filter.len() {
            return Err(condition_out_of_range(filter, index));
        }
        if filter.len() == 1 && self.query.len() == 1 {
            debug!("Keeping the only condition of the only filter");
            return Ok(false);
        }
        let filter = remove_at(filter.conditions(), index)
            .map(Filter::new)
            .ok_or_else(|| condition_out_of_range(filter, index))?;
        self.replace_filter(filter_index, filter)?;
        Ok(true)
    }

    /// Switch a condition to `kind`, discarding its params
    pub fn change_kind(
        &mut self,
        filter_index: usize,
        index: usize,
        kind: ConditionKind,
    ) -> Result<(), ConsoleError> {
        let filter = filter_with_kind(&self.kinds, self.filter(filter_index)?, index, kind)?;
        self.replace_filter(filter_index, filter)
    }

    pub fn edit(
        &mut self,
        filter_index: usize,
        index: usize,
        edit: ConditionEdit,
    ) -> Result<(), ConsoleError> {
        let filter = filter_with_edit(self.filter(filter_index)?, index, edit)?;
        self.replace_filter(filter_index, filter)
    }

    /// Replace the edited query wholesale; the seed is kept
    pub fn set_query(&mut self, query: Query) {
        self.query = query;
    }

    /// Drop all edits and return to the seed
    pub fn reset(&mut self) {
        self.query = self.seed.clone();
    }

    pub fn into_query(self) -> Query {
        self.query
    }
}
