pub mod application;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::cart_service::CartService;
use application::order_service::OrderService;
use handlers::{cart, health, orders, ApiDoc};
use infrastructure::cart_repo::DieselCartRepository;
use infrastructure::order_repo::DieselOrderRepository;

pub use auth::AuthKeys;
pub use config::AppConfig;
pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), BoxError> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    if !applied.is_empty() {
        log::info!("applied {} database migration(s)", applied.len());
    }
    Ok(())
}

/// Registers services, extractor configs and routes.
///
/// Returned as a cloneable closure so the same wiring serves every worker of
/// `HttpServer` and `actix_web::test::init_service` alike.
pub fn configure_app(pool: DbPool, keys: AuthKeys) -> impl Fn(&mut web::ServiceConfig) + Clone {
    let carts = web::Data::new(CartService::new(DieselCartRepository::new(pool.clone())));
    let order_service = web::Data::new(OrderService::new(DieselOrderRepository::new(pool)));
    let keys = web::Data::new(keys);

    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(handlers::json_config())
            .app_data(handlers::path_config())
            .app_data(handlers::query_config())
            .app_data(carts.clone())
            .app_data(order_service.clone())
            .app_data(keys.clone())
            .route("/health", web::get().to(health::health))
            .service(
                web::scope("/cart")
                    .route("/add", web::post().to(cart::add_to_cart))
                    .route("/update", web::patch().to(cart::update_cart_item))
                    .route("/remove/{cartItemId}", web::delete().to(cart::remove_cart_item))
                    .route("/clear/{userId}", web::delete().to(cart::clear_cart))
                    .route("/{userId}", web::get().to(cart::get_cart)),
            )
            .route("/checkout", web::post().to(orders::checkout))
            .service(
                web::scope("/orders")
                    .route("/user/{userId}", web::get().to(orders::get_orders_for_user))
                    .route("/{orderId}", web::get().to(orders::get_order))
                    .route("/{orderId}/status", web::patch().to(orders::update_order_status)),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            );
    }
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    keys: AuthKeys,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let configure = configure_app(pool, keys);
    Ok(HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(configure.clone())
    })
    .bind((host.to_string(), port))?
    .run())
}
