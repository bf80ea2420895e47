use std::sync::Arc;
use std::time::Duration;

use auth::ClaimsCodec;
use auth::PasswordHasher;
use identity_service::config::Config;
use identity_service::identity::emails::EmailTemplates;
use identity_service::identity::models::EmailAddress;
use identity_service::identity::models::Password;
use identity_service::identity::ports::AuthServicePort;
use identity_service::identity::ports::FallbackNotifier;
use identity_service::identity::service::AuthService;
use identity_service::identity::service::AuthSettings;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::email::HttpEmailClient;
use identity_service::outbound::events::ClinicEventsConsumer;
use identity_service::outbound::events::KafkaEventProducer;
use identity_service::outbound::notifiers::HttpFallbackNotifier;
use identity_service::outbound::repositories::PostgresTokenRepository;
use identity_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        kafka_brokers = %config.kafka.brokers,
        kafka_topic = %config.kafka.topic,
        clinic_events_topic = %config.kafka.clinic_events_topic,
        verification_ttl_minutes = config.tokens.verification_ttl_minutes,
        reset_ttl_minutes = config.tokens.reset_ttl_minutes,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let claims_codec = Arc::new(ClaimsCodec::new(
        config.jwt.secret.as_bytes(),
        chrono::Duration::hours(config.jwt.expiration_hours),
    )?);

    let password_hasher = match &config.hashing {
        Some(hashing) => {
            PasswordHasher::with_params(hashing.memory_kib, hashing.iterations, hashing.parallelism)?
        }
        None => PasswordHasher::new(),
    };

    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
    let token_repository = Arc::new(PostgresTokenRepository::new(pg_pool));
    let event_producer = Arc::new(KafkaEventProducer::new(&config)?);

    let notifier_timeout = Duration::from_secs(config.notifiers.timeout_secs);
    let fallbacks: Vec<Arc<dyn FallbackNotifier>> = vec![
        Arc::new(HttpFallbackNotifier::new(
            "profile-service",
            &config.notifiers.profile_service_url,
            notifier_timeout,
        )?),
        Arc::new(HttpFallbackNotifier::new(
            "appointments-service",
            &config.notifiers.appointments_service_url,
            notifier_timeout,
        )?),
    ];

    let email_client = Arc::new(HttpEmailClient::new(
        config.email.api_url.clone(),
        EmailAddress::new(config.email.sender.clone())?,
        config.email.api_token.clone(),
        reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?,
    ));

    let settings = AuthSettings {
        verification_ttl: chrono::Duration::minutes(config.tokens.verification_ttl_minutes),
        reset_ttl: chrono::Duration::minutes(config.tokens.reset_ttl_minutes),
        templates: EmailTemplates::new(
            config.email.product_name.clone(),
            config.links.verify_base_url.clone(),
            config.links.reset_base_url.clone(),
        ),
    };

    let auth_service = Arc::new(
        AuthService::new(
            user_repository,
            token_repository,
            event_producer,
            email_client,
            claims_codec,
            settings,
        )
        .with_fallbacks(fallbacks)
        .with_password_hasher(password_hasher),
    );

    if let Some((email, password)) = config.bootstrap_admin() {
        let created = auth_service
            .ensure_sys_admin(
                &EmailAddress::new(email.to_string())?,
                Password::new(password.to_string())?,
            )
            .await?;
        tracing::info!(created, "System admin bootstrap checked");
    }

    let clinic_consumer = ClinicEventsConsumer::new(&config, Arc::clone(&auth_service))?;
    let consumer_task = tokio::spawn(clinic_consumer.start_consuming());

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(Arc::clone(&auth_service));
    let http_server =
        tokio::spawn(async move { axum::serve(http_listener, http_application).await });

    tokio::select! {
        result = http_server => match result {
            Ok(Ok(())) => tracing::info!("Http server exited"),
            Ok(Err(e)) => tracing::error!(error = %e, "Http server error"),
            Err(e) => tracing::error!(error = %e, "Http server task failed"),
        },
        result = consumer_task => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Clinic events consumer task failed");
            }
        }
    }

    Ok(())
}
