use std::io;

use dotenvy::dotenv;
use storefront_checkout::{build_server, create_pool, run_migrations, AppConfig, AuthKeys};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(io::Error::other)?;

    let pool = create_pool(&config.database_url, config.db_pool_size).map_err(io::Error::other)?;
    run_migrations(&pool).map_err(io::Error::other)?;

    log::info!(
        "Starting server at http://{}:{} (pool size {})",
        config.host,
        config.port,
        config.db_pool_size
    );

    build_server(
        pool,
        AuthKeys::from_secret(&config.jwt_secret),
        &config.host,
        config.port,
    )?
    .await
}
