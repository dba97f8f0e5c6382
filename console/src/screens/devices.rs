//! Device list screen state
//!
//! The address bar is the source of truth: the screen is built from a query
//! string, every change produces a new one, and devices are fetched for it.

use openapi_client::models::{DeviceInfo, DevicePage};
use tracing::info;

use crate::errors::ConsoleError;
use crate::http::api::ConsoleApi;
use crate::query::builder::FilterEditor;
use crate::query::codec::DeviceListState;
use crate::query::model::Filter;
use crate::query::render::{render_chips, FilterChip, RemoveFilter};

pub struct DeviceListScreen {
    state: DeviceListState,
    dialog: FilterEditor,
    page_size: u32,
    page: Option<DevicePage>,
}

impl DeviceListScreen {
    /// Build the screen from the address-bar query string
    pub fn from_url(query_string: &str, page_size: u32) -> Result<Self, ConsoleError> {
        let state = DeviceListState::from_query_string(query_string);
        Ok(Self {
            state,
            dialog: FilterEditor::new(None)?,
            page_size,
            page: None,
        })
    }

    pub fn state(&self) -> &DeviceListState {
        &self.state
    }

    /// Query string reflecting the current state
    pub fn url_query(&self) -> Result<String, ConsoleError> {
        self.state.to_query_string()
    }

    /// The "add filter" dialog
    pub fn dialog(&self) -> &FilterEditor {
        &self.dialog
    }

    pub fn dialog_mut(&mut self) -> &mut FilterEditor {
        &mut self.dialog
    }

    /// Append the dialog's filter to the query and go back to the first page
    pub fn submit_dialog(&mut self) -> Filter {
        let filter = self.dialog.commit();
        self.state.query = self.state.query.with_filter(filter.clone());
        self.state.page = 0;
        filter
    }

    pub fn close_dialog(&mut self) {
        self.dialog.cancel();
    }

    /// Active filters as removable chips
    pub fn chips(&self) -> Vec<FilterChip> {
        render_chips(&self.state.query, true)
    }

    /// Apply a removal requested by a chip
    pub fn remove_filter(&mut self, request: RemoveFilter) -> Result<(), ConsoleError> {
        self.state.query = self.state.query.without_filter(request.index)?;
        self.state.page = 0;
        Ok(())
    }

    pub fn set_page(&mut self, page: u32) {
        self.state.page = page;
    }

    pub fn set_order(&mut self, order_by: Option<String>, order: Option<String>) {
        self.state.order_by = order_by;
        self.state.order = order;
    }

    /// Devices of the last fetched page
    pub fn devices(&self) -> &[DeviceInfo] {
        self.page
            .as_ref()
            .map(|page| page.devices.as_slice())
            .unwrap_or_default()
    }

    pub fn total(&self) -> Option<u64> {
        self.page.as_ref().map(|page| page.total)
    }

    /// Fetch the page of devices for the current state.
    ///
    /// On failure the previously fetched page stays in place.
    pub async fn refresh<A: ConsoleApi + ?Sized>(
        &mut self,
        api: &A,
    ) -> Result<&DevicePage, ConsoleError> {
        let page = api.list_devices(&self.state, self.page_size).await?;
        info!(
            "Fetched {} of {} device(s)",
            page.devices.len(),
            page.total
        );
        Ok(&*self.page.insert(page))
    }
}
