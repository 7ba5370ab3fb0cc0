use axum::{
    http::{header::CACHE_CONTROL, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use std::{net::SocketAddr, sync::Arc};

mod credentials;
mod logging;
mod provider;
mod relay;

mod env {
    pub const API_PORT: &str = "VITA_API_PORT";
    pub const PROVIDER_URL: &str = "VITA_PROVIDER_URL";
    pub const CHAT_MODEL: &str = "VITA_CHAT_MODEL";
    pub const KEY_SECRET_ID: &str = "VITA_KEY_SECRET_ID";
    pub const API_KEY: &str = "VITA_API_KEY";
    pub const SYSTEM_PROMPT: &str = "VITA_SYSTEM_PROMPT";
    pub const ALLOWED_ORIGINS: &str = "VITA_ALLOWED_ORIGINS";
}

struct AppState {
    chat: Box<dyn provider::ChatCompletion + Send + Sync>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let app = router(configure_app_state().await?);

    let port = std::env::var(env::API_PORT).ok();
    let port = port.and_then(|x| x.parse().ok()).unwrap_or(3000_u16);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}

fn router(state: Arc<AppState>) -> Router {
    // The browser UI is a plain static page; serve it uncached so deploys
    // show up on refresh.
    let no_store = SetResponseHeaderLayer::overriding(
        CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store"),
    );

    Router::new()
        .route("/", get(index))
        .route("/api/chat", post(relay::chat))
        .nest_service(
            "/app",
            ServiceBuilder::new()
                .layer(no_store)
                .service(ServeDir::new("public")),
        )
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> &'static str {
    "Vita chat backend is running."
}

async fn configure_app_state() -> anyhow::Result<Arc<AppState>> {
    let provider = provider::ProviderClient::from_env().await?;

    Ok(Arc::new(AppState {
        chat: Box::new(provider),
    }))
}

fn cors_layer() -> CorsLayer {
    let origins = std::env::var(env::ALLOWED_ORIGINS)
        .ok()
        .map(|list| {
            list.split(',')
                .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
                .collect::<Vec<_>>()
        })
        .unwrap_or_else(|| {
            vec![
                HeaderValue::from_static("http://localhost:3000"),
                HeaderValue::from_static("http://localhost:5173"),
            ]
        });

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
