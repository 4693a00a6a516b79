use crate::{resolver::Resolver, utils::ApiTags};
use poem_openapi::{payload::PlainText, OpenApi};
use std::sync::Arc;

pub struct HealthCheck {
    resolver: Arc<Resolver>,
}

#[OpenApi(prefix_path = "/health/", tag = "ApiTags::HealthCheck")]
impl HealthCheck {
    pub fn new(resolver: Arc<Resolver>) -> Self {
        Self { resolver }
    }

    #[oai(path = "/liveness", method = "get")]
    async fn liveness(&self) -> PlainText<String> {
        PlainText("OK".to_string())
    }

    #[oai(path = "/readiness", method = "get")]
    async fn readiness(&self) -> PlainText<String> {
        // scraping strategies still serve every request without an API key
        if self.resolver.official_api_enabled() {
            PlainText("OK".to_string())
        } else {
            PlainText("OK (YouTube API key not configured)".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolverConfig;
    use poem::{test::TestClient, Route};
    use poem_openapi::OpenApiService;

    fn client(api_key: Option<&str>) -> TestClient<Route> {
        let config = ResolverConfig::default().with_youtube_api_key(api_key.map(str::to_string));
        let resolver = Arc::new(Resolver::new(config).unwrap());
        let api = OpenApiService::new(HealthCheck::new(resolver), "test", "1.0");
        TestClient::new(Route::new().nest("/", api))
    }

    #[tokio::test]
    async fn liveness() {
        let resp = client(None).get("/health/liveness").send().await;
        resp.assert_status_is_ok();
        resp.assert_text("OK").await;
    }

    #[tokio::test]
    async fn readiness_reports_missing_key() {
        let resp = client(None).get("/health/readiness").send().await;
        resp.assert_status_is_ok();
        resp.assert_text("OK (YouTube API key not configured)").await;

        let resp = client(Some("key")).get("/health/readiness").send().await;
        resp.assert_text("OK").await;
    }
}
