//! The backend as seen by the console screens

use async_trait::async_trait;
use openapi_client::models::{Application, DevicePage};

use crate::errors::ConsoleError;
use crate::http::client::HttpClient;
use crate::query::codec::DeviceListState;
use crate::query::model::Query;

/// Backend operations the screens depend on, as a trait for testability
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    /// Fetch one page of devices matching the list state
    async fn list_devices(
        &self,
        state: &DeviceListState,
        page_size: u32,
    ) -> Result<DevicePage, ConsoleError>;

    /// Fetch an application with its scheduling rule
    async fn get_application(&self, application_id: &str) -> Result<Application, ConsoleError>;

    /// Replace an application's scheduling rule
    async fn update_scheduling_rule(
        &self,
        application_id: &str,
        rule: &Query,
    ) -> Result<Application, ConsoleError>;
}

#[async_trait]
impl ConsoleApi for HttpClient {
    async fn list_devices(
        &self,
        state: &DeviceListState,
        page_size: u32,
    ) -> Result<DevicePage, ConsoleError> {
        self.fetch_devices(state, page_size).await
    }

    async fn get_application(&self, application_id: &str) -> Result<Application, ConsoleError> {
        self.fetch_application(application_id).await
    }

    async fn update_scheduling_rule(
        &self,
        application_id: &str,
        rule: &Query,
    ) -> Result<Application, ConsoleError> {
        self.put_scheduling_rule(application_id, rule).await
    }
}
