//! Service entrypoint: wires the adapters together, exposes the
//! application context, and runs the notification consumer until shutdown.

use std::sync::Arc;

use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use taskline::adapters::auth::JwtIdentityVerifier;
use taskline::adapters::broker::{BoundedConsumer, BrokerConnection, NatsEventPublisher};
use taskline::adapters::cache::RedisListCache;
use taskline::adapters::postgres::{
    self, PostgresNotificationRepository, PostgresTaskRepository,
};
use taskline::application::notifications::RecordNotificationHandler;
use taskline::application::AppContext;
use taskline::config::AppConfig;
use taskline::ports::EventHandler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    // The database is the system of record: unreachable at startup is
    // fatal, unlike the broker.
    let pool = postgres::connect(&config.database).await?;
    postgres::ensure_schema(&pool).await?;

    let cache = Arc::new(RedisListCache::new(&config.redis.url)?);
    let connection = BrokerConnection::connect(config.broker.clone()).await;
    let publisher = Arc::new(NatsEventPublisher::new(
        connection.clone(),
        config.broker.publish_attempts,
    ));

    let tasks = Arc::new(PostgresTaskRepository::new(pool.clone()));
    let notifications = Arc::new(PostgresNotificationRepository::new(pool.clone()));

    // Handler surface an embedding transport layer serves from; kept
    // alive for the life of the process.
    let _app = AppContext::new(
        tasks,
        notifications.clone(),
        cache,
        publisher,
        Arc::new(JwtIdentityVerifier::new(&config.auth)),
        config.redis.cache_ttl(),
    );

    let handler: Arc<dyn EventHandler> = Arc::new(RecordNotificationHandler::new(notifications));
    let consumer = BoundedConsumer::new(connection, config.broker.clone(), handler);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let consumer_task = tokio::spawn(async move {
        consumer.run(shutdown_rx).await;
    });

    info!("taskline running; ctrl-c to stop");
    if let Err(err) = signal::ctrl_c().await {
        error!(%err, "failed to listen for shutdown signal");
    }

    info!("shutting down");
    let _ = shutdown_tx.send(true);
    let _ = consumer_task.await;

    Ok(())
}
