use drinkmap::app_state::AppState;
use drinkmap::configuration::get_configuration;
use drinkmap::create_app;
use drinkmap::errors::Error;
use std::net::IpAddr;
use std::net::SocketAddr;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

fn bind_address(host: &str, port: u16) -> Result<SocketAddr, Error> {
    let host = IpAddr::from_str(host)?;
    Ok(SocketAddr::from((host, port)))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let configuration = get_configuration().expect("Failed to read configuration");
    let addr = bind_address(
        &configuration.application.host,
        configuration.application.port,
    )
    .expect("Failed to create socket address");
    let app_state = AppState::try_init(&configuration).expect("Failed to create app state");
    let app = create_app(app_state).expect("Failed to start server");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");
    tracing::info!("listening on {addr}");
    axum::serve(listener, app).await.unwrap();
}
