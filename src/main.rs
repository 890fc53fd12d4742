use crate::app::App;
use crate::auth::GoTrueClient;
use crate::backend::SupabaseClient;
use crate::config::AppConfig;
use crate::responses::error_to_response;
use crate::router::handle;
use astra::Server;
use std::sync::Arc;
use tracing::{error, info};

mod app;
mod auth;
mod backend;
mod browse;
mod config;
mod domain;
mod errors;
mod forms;
mod logging;
mod map;
mod repository;
mod responses;
mod router;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    // 1️⃣ Environment and logging
    let _ = dotenvy::dotenv();
    logging::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };

    // 2️⃣ Hosted backend client, shared by data access and auth
    let client = match SupabaseClient::new(&config.backend) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!(error = %e, "could not build backend client");
            std::process::exit(1);
        }
    };
    let auth = Arc::new(GoTrueClient::new(client.clone()));
    let app = Arc::new(App::new(config, client, auth));

    // 3️⃣ Start the server
    let addr = app.config.bind_addr;
    info!(%addr, provider = app.config.map.provider.as_str(), "starting server");

    let server = Server::bind(&addr).max_workers(app.config.max_workers);

    let shared = app.clone();
    let result = server.serve(move |req, _info| match handle(req, &shared) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        error!(error = %e, "server ended with error");
    }

    app.sessions.shutdown();
    info!("server shut down cleanly");
}
