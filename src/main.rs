use quiz_relay::config::RelayConfig;
use quiz_relay::relay;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = RelayConfig::from_env()?;

    eprintln!("📨 Quiz Relay v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Submit: http://0.0.0.0:{}/api/submit", config.port);
    eprintln!("   Health: http://0.0.0.0:{}/health", config.port);
    eprintln!("   Telegram API: {}", config.api_base);
    eprintln!(
        "   Credentials: {}",
        match config.credentials() {
            Ok(_) => "configured".to_string(),
            Err(e) => format!("incomplete ({e})"),
        }
    );

    let app = relay::router(&config);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    tracing::info!(port = config.port, "Quiz relay listening");
    axum::serve(listener, app).await?;

    Ok(())
}
