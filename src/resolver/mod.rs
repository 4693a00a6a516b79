use std::sync::Arc;

pub mod classifier;
pub mod config;
pub mod format;
mod generic;
mod handler;
mod instagram;
pub mod model;
pub mod orchestrator;
mod scrape;
pub mod strategy;
mod tiktok;
mod youtube;

pub use config::ResolverConfig;
pub use orchestrator::Resolver;

pub async fn resolver_api(resolver: Arc<Resolver>) -> handler::ResolverApi {
    handler::ResolverApi::new(resolver)
}
