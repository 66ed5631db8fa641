use dotenvy::dotenv;
use tracing::{error, info, warn};

use vibeflix::logging::init_tracing;
use vibeflix::metrics::{init_metrics, metrics_app};
use vibeflix::router::init_router;
use vibeflix::state::init_app_state;
use vibeflix_config::ServerConfig;

#[tokio::main]
async fn main() {
    dotenv().ok();

    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize tracing: {}", e);
    }

    let server_config = ServerConfig::from_env();

    match init_metrics() {
        Ok(Some(handle)) => {
            let metrics_address = server_config.metrics_address();
            tokio::spawn(async move {
                match tokio::net::TcpListener::bind(&metrics_address).await {
                    Ok(listener) => {
                        info!(address = %metrics_address, "Metrics listener started");
                        if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                            error!(error = %e, "Metrics listener stopped");
                        }
                    }
                    Err(e) => error!(error = %e, address = %metrics_address, "Failed to bind metrics listener"),
                }
            });
        }
        Ok(None) => info!("Observability disabled, metrics not exported"),
        Err(e) => error!(error = %e, "Failed to install metrics recorder"),
    }

    let state = init_app_state().await;

    if state.jwt_config.uses_default_secret() {
        warn!("Sessions are signed with the development secret; set JWT_SECRET in production");
    }

    if let Err(e) = sqlx::migrate!("./migrations").run(&state.db).await {
        error!(error = %e, "Failed to run database migrations");
        std::process::exit(1);
    }

    let app = init_router(state);

    let bind_address = server_config.bind_address();
    let listener = match tokio::net::TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, address = %bind_address, "Failed to bind server");
            std::process::exit(1);
        }
    };

    info!(address = %bind_address, "🚀 Server running");
    info!("📚 Swagger UI available at http://{}/swagger-ui", bind_address);
    info!("📖 Scalar UI available at http://{}/scalar", bind_address);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server error");
    }

    info!("Server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to register Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
