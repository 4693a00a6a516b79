#[deny(clippy::all)]
use color_eyre::eyre::eyre;
use dotenv::dotenv;
use poem::{
    listener::TcpListener,
    middleware::{Cors, Tracing},
    EndpointExt, Route, Server,
};
use poem_openapi::OpenApiService;
use resolver::{Resolver, ResolverConfig};
use std::sync::Arc;
use tokio::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod health;
mod resolver;
mod utils;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenv().ok(); // This line loads the environment variables from the ".env" file.
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_env("RUST_LOG"))
        .init();

    let hostname = utils::get_host();
    let port = utils::get_port();

    let config = ResolverConfig::from_env();
    info!(
        official_api = config.youtube_api_key.is_some(),
        timeout = ?config.timeout,
        proxy = config.proxy.is_some(),
        "Loaded resolver configuration"
    );
    let resolver = Arc::new(Resolver::new(config).map_err(|error| eyre!("{:#}", error))?);

    let resolver_api = resolver::resolver_api(resolver.clone()).await;
    let health_api = health::health_checks(resolver).await;

    let api_service = OpenApiService::new((resolver_api, health_api), "Link Resolver", "1.0")
        .server(format!("{}/api/v1", hostname));
    let ui = api_service.swagger_ui();
    let spec = api_service.spec_endpoint_yaml();

    let route = Route::new()
        .nest("/api/v1", api_service)
        .nest("/swagger", ui)
        .nest("/swagger/spec", spec)
        .with(Cors::new())
        .with(Tracing);

    Server::new(TcpListener::bind(format!("0.0.0.0:{}", port)))
        .run_with_graceful_shutdown(
            route,
            async move {
                let _ = tokio::signal::ctrl_c().await;
            },
            Some(Duration::from_secs(5)),
        )
        .await?;

    Ok(())
}
