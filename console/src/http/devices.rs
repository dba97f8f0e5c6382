//! Device API client

use openapi_client::models::DevicePage;
use tracing::info;
use url::form_urlencoded;

use crate::errors::ConsoleError;
use crate::http::client::HttpClient;
use crate::query::codec::DeviceListState;

/// Query parameter carrying the page size
pub const PAGE_SIZE_PARAM: &str = "page_size";

/// Query string for `GET /devices`: the list state plus the page size
pub fn devices_query_string(
    state: &DeviceListState,
    page_size: u32,
) -> Result<String, ConsoleError> {
    let mut query = state.to_query_string()?;
    let extra = form_urlencoded::Serializer::new(String::new())
        .append_pair(PAGE_SIZE_PARAM, &page_size.to_string())
        .finish();
    if !query.is_empty() {
        query.push('&');
    }
    query.push_str(&extra);
    Ok(query)
}

impl HttpClient {
    /// List devices matching the filters, ordering and page of `state`
    pub async fn fetch_devices(
        &self,
        state: &DeviceListState,
        page_size: u32,
    ) -> Result<DevicePage, ConsoleError> {
        let query = devices_query_string(state, page_size)?;
        info!(
            "Listing devices: {} filter(s), page {}",
            state.query.len(),
            state.page
        );
        self.get("/devices", Some(&query)).await
    }
}
