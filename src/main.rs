use clap::Parser;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use upload_gateway::config::AppConfig;
use upload_gateway::infrastructure::{database, storage};
use upload_gateway::services::classifier::MimeClassifier;
use upload_gateway::services::contact::ContactRelay;
use upload_gateway::services::file_service::FileService;
use upload_gateway::services::naming::ObjectNamer;
use upload_gateway::services::records::FileRecords;
use upload_gateway::services::storage::StorageGateway;
use upload_gateway::{AppState, create_app};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port for the API server (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "upload_gateway=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting Upload Gateway...");

    let mut config = AppConfig::from_env();
    if let Some(port) = args.port {
        config.port = port;
    }
    info!(
        "🛡️  Limits: Max Size={}MB, {} uploads per {}s window",
        config.max_file_size / 1024 / 1024,
        config.rate_limit_max,
        config.rate_limit_window_secs
    );

    let db = database::setup_database(&config.database_url).await?;
    let object_store = storage::setup_storage(&config.storage).await;

    let file_service = Arc::new(FileService::new(
        FileRecords::new(db.clone()),
        StorageGateway::new(object_store, config.storage.public_domain.clone()),
        MimeClassifier::new(&config.mime_policy),
        ObjectNamer::new(),
    ));

    let http = reqwest::Client::new();
    let contact = Arc::new(ContactRelay::new(http.clone(), config.telegram.clone()));

    let port = config.port;
    let state = AppState {
        db,
        file_service,
        contact,
        http,
        upload_windows: Arc::new(dashmap::DashMap::new()),
        config: Arc::new(config),
    };

    let app = create_app(state).layer(
        TraceLayer::new_for_http()
            .on_request(|request: &axum::http::Request<_>, _span: &tracing::Span| {
                info!("📥 {} {}", request.method(), request.uri());
            })
            .on_response(
                |response: &axum::http::Response<_>,
                 latency: std::time::Duration,
                 _span: &tracing::Span| {
                    info!(
                        "📤 Finished in {:?} with status {}",
                        latency,
                        response.status()
                    );
                },
            ),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("✅ Server ready at http://{}", addr);
    info!("📖 Swagger UI: http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("🛑 Server shut down gracefully.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("⌨️  Ctrl+C received, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("💤 SIGTERM received, starting graceful shutdown...");
        },
    }
}
