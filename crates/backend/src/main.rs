pub mod assistant;
pub mod handlers;
pub mod routes;
pub mod sec;
pub mod shared;

use assistant::Assistant;
use handlers::chat::ChatState;
use sec::SecClient;
use shared::config::{load_config, Config};
use shared::llm::OpenAiProvider;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use axum::middleware::{self, Next};
    use axum::response::Response;
    use std::net::SocketAddr;
    use tokio::net::TcpListener;
    use tower_http::cors::{Any, CorsLayer};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = std::path::Path::new("target").join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("backend.log"))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(log_file))
                .with_ansi(false),
        )
        .init();

    async fn request_logger(req: Request<Body>, next: Next) -> Response {
        let start = std::time::Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let response = next.run(req).await;

        tracing::info!(
            "{} {:>6} {} | {}ms",
            response.status().as_u16(),
            method,
            path,
            start.elapsed().as_millis()
        );
        response
    }

    let config = load_config()?;
    let state = ChatState {
        assistant: build_assistant(&config)?,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let app = routes::configure_routes(state, &config.server.static_dir)
        .layer(middleware::from_fn(request_logger))
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    tracing::info!("Attempting to bind server to http://{}", addr);
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => {
            tracing::info!("Server successfully bound to {}", addr);
            listener
        }
        Err(e) => {
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Error: Port {} is already in use. Please ensure no other process is using this port.",
                    config.server.port
                );
            } else {
                tracing::error!("Failed to bind to port {}. Error: {}", config.server.port, e);
            }
            return Err(e.into());
        }
    };

    axum::serve(listener, app).await?;

    Ok(())
}

/// Without an API key the server still starts; `/chat` then answers 500
fn build_assistant(config: &Config) -> anyhow::Result<Option<Arc<Assistant>>> {
    let Some(api_key) = config.llm.resolve_api_key() else {
        tracing::warn!(
            "No LLM API key configured (set llm.api_key or {})",
            config.llm.api_key_env
        );
        return Ok(None);
    };

    let provider = Arc::new(OpenAiProvider::new(api_key, &config.llm));
    let source = Arc::new(SecClient::new(&config.sec.user_agent)?);
    tracing::info!("Assistant ready with model {}", config.llm.model);

    Ok(Some(Arc::new(Assistant::new(
        provider,
        source,
        &config.llm.system_prompt,
        config.sec.max_tables,
    ))))
}
