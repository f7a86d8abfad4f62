use institute_api_rust::config;
use institute_api_rust::router::build_router;
use institute_api_rust::services::user_service::NewUserInput;
use institute_api_rust::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, APP_ENV, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "institute_api_rust=info,tower_http=info".into()),
        )
        .init();

    let config = config::config();
    tracing::info!("Starting institute API in {:?} mode", config.environment);

    let state = AppState::new();
    seed_super_admin(&state).await;

    let app = build_router(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("INSTITUTE_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3001);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Institute API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Bootstrap the first SUPER_ADMIN from env. Every other principal is
/// created through the API, which needs an authenticated super admin to
/// exist first.
async fn seed_super_admin(state: &AppState) {
    let (Ok(email), Ok(password)) = (
        std::env::var("SUPER_ADMIN_EMAIL"),
        std::env::var("SUPER_ADMIN_PASSWORD"),
    ) else {
        tracing::warn!(
            "SUPER_ADMIN_EMAIL / SUPER_ADMIN_PASSWORD not set; no super admin seeded"
        );
        return;
    };

    let input = NewUserInput {
        first_name: "Super".to_string(),
        last_name: "Admin".to_string(),
        email,
        password,
        country_code: None,
        phone_no: None,
        gender: None,
        dob: None,
        address: None,
        profile_url: None,
    };

    match state.user_service().create_super_admin(input, None).await {
        Ok(user) => tracing::info!("Seeded super admin {}", user.email),
        Err(e) => tracing::error!("Failed to seed super admin: {}", e),
    }
}
