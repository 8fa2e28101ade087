use crate::error::ApiError;
use crate::http::ApiClient;
use crate::types::DashboardCounts;

impl ApiClient {
    pub async fn dashboard_counts(&self) -> Result<DashboardCounts, ApiError> {
        self.get("/dashboard/count").await
    }
}
