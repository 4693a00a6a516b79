use super::classifier::classify;
use super::model::{Classification, MetadataRecord, ResolveRequest};
use super::orchestrator::Resolver;
use crate::utils::{ApiTags, JsonError, JsonSuccess, ResponseObject};
use poem_openapi::{
    param::Query,
    payload::Json,
    types::{ParseFromJSON, ToJSON},
    OpenApi,
};
use std::sync::Arc;
use tracing::warn;

pub struct ResolverApi {
    resolver: Arc<Resolver>,
}

#[OpenApi(tag = "ApiTags::Resolver")]
impl ResolverApi {
    pub fn new(resolver: Arc<Resolver>) -> Self {
        Self { resolver }
    }

    /// Resolve a video, clip or channel URL into display metadata
    #[oai(path = "/resolve", method = "get", operation_id = "resolver::resolve")]
    async fn resolve(
        &self,
        url: Query<String>,
    ) -> Result<JsonSuccess<MetadataRecord>, JsonError<String>> {
        self.run(&url.0).await
    }

    /// Resolve a URL sent as a JSON body
    #[oai(
        path = "/resolve",
        method = "post",
        operation_id = "resolver::resolve_body"
    )]
    async fn resolve_body(
        &self,
        payload: Json<ResolveRequest>,
    ) -> Result<JsonSuccess<MetadataRecord>, JsonError<String>> {
        self.run(&payload.url).await
    }

    /// Classify a URL without touching the network
    #[oai(path = "/classify", method = "get", operation_id = "resolver::classify")]
    async fn classify(
        &self,
        url: Query<String>,
    ) -> Result<JsonSuccess<Classification>, JsonError<String>> {
        match Resolver::parse_input(&url.0) {
            Ok(_) => Ok(ResponseObject::ok(classify(&url.0))),
            Err(error) => Err(reject(&url.0, error)),
        }
    }
}

impl ResolverApi {
    async fn run(&self, url: &str) -> Result<JsonSuccess<MetadataRecord>, JsonError<String>> {
        match self.resolver.resolve(url).await {
            Ok(record) => Ok(ResponseObject::ok(record)),
            Err(error) => Err(reject(url, error)),
        }
    }
}

fn reject<T: ParseFromJSON + ToJSON + Send + Sync>(
    url: &str,
    error: anyhow::Error,
) -> JsonError<T> {
    let error = format!("{:#}", error);
    warn!(url = %url, error = %error, "Rejected input");
    ResponseObject::bad_request(error)
}
