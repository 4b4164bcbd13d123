use std::net::SocketAddr;

use dotenvy::dotenv;
use inkwell::cli::{CREATE_ADMIN_COMMAND, create_admin, parse_create_admin_args};
use inkwell::logging::init_tracing;
use inkwell::metrics::init_metrics;
use inkwell::router::init_router_with_metrics;
use inkwell::state::init_app_state;
use inkwell_db::init_db_pool;
use tracing::{error, info};

const DEFAULT_PORT: u16 = 5100;

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.get(1).map(String::as_str) == Some(CREATE_ADMIN_COMMAND) {
        handle_create_admin(&args).await;
        return;
    }

    let state = match init_app_state().await {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "Failed to initialize application state");
            std::process::exit(1);
        }
    };

    state.rate_limiters.spawn_sweeper();
    let app = init_router_with_metrics(state, init_metrics());

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %addr, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    info!("Server running on http://localhost:{port}");
    info!("Scalar UI available at http://localhost:{port}/scalar");

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

async fn handle_create_admin(args: &[String]) {
    let dto = match parse_create_admin_args(args) {
        Ok(dto) => dto,
        Err(usage) => {
            eprintln!("{usage}");
            std::process::exit(1);
        }
    };

    let pool = match init_db_pool().await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    match create_admin(&pool, dto).await {
        Ok(user) => {
            println!("Admin created successfully!");
            println!("   Id: {}", user.id);
            println!("   Username: {}", user.username);
            println!("   Email: {}", user.email);
        }
        Err(e) => {
            eprintln!("Error creating admin: {}", e.error);
            std::process::exit(1);
        }
    }
}
