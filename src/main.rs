use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use sqlx::PgPool;

use taskdeck::auth::{AuthGate, TokenService};
use taskdeck::config::Config;
use taskdeck::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = PgPool::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    // One token service for the whole process; the secret never leaves it.
    let tokens = web::Data::new(TokenService::new(&config.jwt_secret));

    let address = format!("{}:{}", config.server_host, config.server_port);
    log::info!("Starting server at http://{}", address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(tokens.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(web::scope("/api").wrap(AuthGate).configure(routes::config))
    })
    .bind(&address)?
    .run()
    .await
}
