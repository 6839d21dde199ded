//! shelfcheck HTTP server entrypoint.

use std::net::SocketAddr;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use shelfcheck::cache::TtlCache;
use shelfcheck::config::Config;
use shelfcheck::gateway::{HandlerState, create_router_with_state};
use shelfcheck::judge::{BatchJudgeClient, ConfiguredBackend};
use shelfcheck::validator::Validator;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> anyhow::Result<()> {
    // Checked before any runtime exists; the health check builds its own.
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(serve())
}

async fn serve() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        "shelfcheck starting"
    );

    let backend = ConfiguredBackend::from_config(&config)?;
    let retry = config.retry_config();
    retry.validate().map_err(anyhow::Error::msg)?;
    tracing::info!(
        backend = backend.name(),
        model = %config.judge_model,
        max_retries = retry.max_retries,
        failure_policy = %config.judge_failure_policy,
        "judge configured"
    );
    if matches!(backend, ConfiguredBackend::Disabled) {
        tracing::warn!("judge disabled, rule-indeterminate candidates will stay unsure");
    }

    let judge = BatchJudgeClient::new(backend).with_retry(retry);
    let cache = TtlCache::with_capacity(config.cache_capacity);
    let validator = Validator::new(judge, cache, config.validator_config());

    let app = create_router_with_state(HandlerState::new(validator));

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shelfcheck shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("SHELFCHECK_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    health_check(port)
}

/// Returns the process exit code: `0` when `/healthz` answers with success.
fn health_check(port: u16) -> i32 {
    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::health_check;

    use axum::{Router, routing::get};

    #[test]
    fn test_health_check_fails_when_nothing_listens() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        assert_eq!(health_check(port), 1);
    }

    #[test]
    fn test_health_check_succeeds_against_live_server() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        listener.set_nonblocking(true).unwrap();

        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener).unwrap();
                let app = Router::new().route("/healthz", get(|| async { "ok" }));
                axum::serve(listener, app).await.unwrap();
            });
        });

        assert_eq!(health_check(port), 0);
    }
}
