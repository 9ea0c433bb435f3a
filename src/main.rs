use {
    field_pay::{
        AppState,
        adapters::realtime::RealtimeHub,
        config::Config,
        infra::postgres::PgReconciliationStore,
        services::reconciliation::Reconciler,
    },
    sqlx::postgres::PgPoolOptions,
    std::{sync::Arc, time::Duration},
    tokio::signal,
    tower::ServiceBuilder,
    tower_http::timeout::TimeoutLayer,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::from_env().expect("invalid configuration");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    if config.midtrans_server_key.is_none() {
        tracing::warn!("MIDTRANS_SERVER_KEY not set, webhook signatures are not verified");
    }

    let hub = RealtimeHub::new(1024);
    let reconciler = Reconciler::new(
        Arc::new(PgReconciliationStore::new(pool)),
        Arc::new(hub.clone()),
    );

    let state = AppState {
        reconciler,
        hub,
        midtrans_server_key: config.midtrans_server_key.clone(),
    };

    let app = field_pay::router(state).layer(
        ServiceBuilder::new().layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        ))),
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("failed to bind");
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to listen for ctrl+c");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to listen for SIGTERM")
            .recv()
            .await;
    };

    tokio::select! {
        _ = ctrl_c => tracing::info!("received ctrl+c, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
