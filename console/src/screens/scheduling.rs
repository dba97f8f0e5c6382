//! Application scheduling rule screen
//!
//! The rule comes from the backend as raw JSON. It is validated, stripped to
//! the kinds the screen allows, edited, then sent back verbatim as JSON.

use openapi_client::models::Application;
use tracing::info;

use crate::errors::ConsoleError;
use crate::http::api::ConsoleApi;
use crate::query::builder::{FilterEditor, QueryEditor};
use crate::query::codec::scheduling_rule_from_json;
use crate::query::model::{Query, SelectableKinds};
use crate::query::render::{render_chips, FilterChip, RemoveFilter};

pub struct SchedulingRuleScreen {
    application: Application,
    editor: QueryEditor,
    dialog: FilterEditor,
}

impl SchedulingRuleScreen {
    /// Load an application and seed the editors with its current rule
    pub async fn load<A: ConsoleApi + ?Sized>(
        api: &A,
        application_id: &str,
        kinds: SelectableKinds,
    ) -> Result<Self, ConsoleError> {
        let application = api.get_application(application_id).await?;
        Ok(Self::from_application(application, kinds))
    }

    pub fn from_application(application: Application, kinds: SelectableKinds) -> Self {
        let rule = scheduling_rule_from_json(&application.scheduling_rule)
            .retain_kinds(kinds.as_slice());
        info!(
            "Editing scheduling rule of {} with {} filter(s)",
            application.id,
            rule.len()
        );

        Self {
            application,
            editor: QueryEditor::seeded(kinds.clone(), rule),
            dialog: FilterEditor::with_kinds(kinds),
        }
    }

    pub fn application(&self) -> &Application {
        &self.application
    }

    pub fn rule(&self) -> &Query {
        self.editor.query()
    }

    pub fn editor_mut(&mut self) -> &mut QueryEditor {
        &mut self.editor
    }

    pub fn dialog_mut(&mut self) -> &mut FilterEditor {
        &mut self.dialog
    }

    /// Replace the whole rule, dropping conditions of kinds this screen disallows
    pub fn replace_rule(&mut self, rule: Query) {
        let rule = rule.retain_kinds(self.editor.selectable_kinds());
        self.editor.set_query(rule);
    }

    /// Append the dialog's filter to the rule
    pub fn submit_dialog(&mut self) {
        let filter = self.dialog.commit();
        self.editor.append_filter(filter);
    }

    pub fn close_dialog(&mut self) {
        self.dialog.cancel();
    }

    pub fn chips(&self) -> Vec<FilterChip> {
        render_chips(self.editor.query(), true)
    }

    pub fn remove_filter(&mut self, request: RemoveFilter) -> Result<(), ConsoleError> {
        self.editor.remove_filter(request.index)
    }

    /// Send the edited rule to the backend and adopt the stored result
    pub async fn save<A: ConsoleApi + ?Sized>(&mut self, api: &A) -> Result<&Query, ConsoleError> {
        let saved = api
            .update_scheduling_rule(&self.application.id, self.editor.query())
            .await?;
        let kinds = self.editor.kinds().clone();
        *self = Self::from_application(saved, kinds);
        Ok(self.rule())
    }
}
