use crate::app::{App, Dashboard};
use crate::config::{Config, Listen};
use crate::fetcher::WpExportFetcher;
use crate::router::handle;
use astra::Server;
use tracing::{error, info};

mod app;
mod auth;
mod cache;
mod config;
mod data;
mod domain;
mod errors;
mod fetcher;
mod logging;
mod responses;
mod router;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    // 1️⃣ Environment (.env is optional) and logging
    let dotenv = dotenvy::dotenv();
    logging::init_logging();
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "loaded environment file");
    }

    // 2️⃣ Configuration; a bad config still serves, but only the error page
    let app = match Config::from_env() {
        Ok(config) => {
            let fetcher = WpExportFetcher::from_config(&config);
            App::Ready(Dashboard::new(config, fetcher))
        }
        Err(e) => {
            error!(error = %e, "configuration invalid, serving error page only");
            App::Misconfigured(e)
        }
    };

    // Bind target is read on its own so a misconfigured process still answers there
    let Listen { addr, workers } = match &app {
        App::Ready(dash) => Listen {
            addr: dash.config.addr,
            workers: dash.config.workers,
        },
        App::Misconfigured(_) => Listen::from_env().unwrap_or_else(|e| {
            error!(error = %e, "listen settings invalid, using defaults");
            Listen::fallback()
        }),
    };

    // 3️⃣ Start the server
    info!("Starting server at http://{addr}");
    let server = Server::bind(&addr).max_workers(workers);

    // 4️⃣ Serve requests, passing the app into the closure
    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => {
            error!(error = %err, "request failed");
            templates::html_error_response(err)
        }
    });

    if let Err(e) = result {
        error!(error = %e, "Server ended with error");
    }

    info!("Server shut down cleanly.");
}
