//! Application API client

use openapi_client::models::{Application, UpdateApplicationRequest};
use tracing::info;

use crate::errors::ConsoleError;
use crate::http::client::HttpClient;
use crate::query::codec::scheduling_rule_to_json;
use crate::query::model::Query;

impl HttpClient {
    /// Get an application with its scheduling rule
    pub async fn fetch_application(&self, application_id: &str) -> Result<Application, ConsoleError> {
        let path = format!("/applications/{}", application_id);
        self.get(&path, None).await
    }

    /// Replace the scheduling rule of an application
    pub async fn put_scheduling_rule(
        &self,
        application_id: &str,
        rule: &Query,
    ) -> Result<Application, ConsoleError> {
        let path = format!("/applications/{}", application_id);
        let request = UpdateApplicationRequest {
            scheduling_rule: scheduling_rule_to_json(rule)?,
        };
        info!(
            "Updating scheduling rule of application {} ({} filter(s))",
            application_id,
            rule.len()
        );
        self.put(&path, &request).await
    }
}
