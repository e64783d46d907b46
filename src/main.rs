use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use veggie_members::config::Config;
use veggie_members::db::{self, try_lock};
use veggie_members::domain::Role;
use veggie_members::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "veggie_members=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::load()?;
  tracing::info!("Using database at {}", config.database_path.display());

  let pool = db::init_db(&config.database_path)?;

  {
    let conn = try_lock(&pool)?;
    tracing::info!("{} registered users", db::count_users(&conn)?);

    if let Some(name) = &config.bootstrap_admin {
      match db::set_role(&conn, name, Role::Admin)? {
        0 => tracing::warn!("BOOTSTRAP_ADMIN {} has not signed up yet", name),
        _ => tracing::info!("Promoted {} to admin", name),
      }
    }
  }

  let bind_addr = config.bind_address();
  let app = veggie_members::app(AppState::new(pool, config));

  let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
  tracing::info!("Server running on http://{}", bind_addr);

  axum::serve(listener, app).await?;
  Ok(())
}
