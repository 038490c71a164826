//! Callback server for gateway payment notifications.

use std::sync::Arc;

use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wxpay_adapter::adapters::http::{notify_router, NotifyAppState};
use wxpay_adapter::adapters::wxpay::LoggingDecider;
use wxpay_adapter::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let mut state = NotifyAppState::new(Arc::new(LoggingDecider));
    if config.payment.verify_notification_signature {
        state = state.with_verification_key(config.payment.merchant_key());
    } else {
        tracing::warn!("Notification signature verification is disabled");
    }

    let app = notify_router()
        .with_state(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        mch_id = %config.payment.mch_id,
        environment = ?config.server.environment,
        "Notification server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.server.log_level.clone().into());
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
