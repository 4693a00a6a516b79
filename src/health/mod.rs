use crate::resolver::Resolver;
use std::sync::Arc;

pub mod handler;

pub async fn health_checks(resolver: Arc<Resolver>) -> handler::HealthCheck {
    handler::HealthCheck::new(resolver)
}
