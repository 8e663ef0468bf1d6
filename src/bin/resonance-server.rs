use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use clap::Parser;
use tracing::{error, info, warn};

use resonance::catalog::{CatalogSearch, SearchParams};
use resonance::config::{ClientCredentials, UpstreamConfig};
use resonance::credentials::{CredentialProvider, SystemClock};
use resonance::error::SearchError;

#[path = "resonance_server/runtime.rs"]
mod runtime;
use self::runtime::*;
#[path = "resonance_server/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "resonance_server/handlers.rs"]
mod handlers;
use self::handlers::*;
#[path = "resonance_server/routes.rs"]
mod routes;
use self::routes::*;

#[derive(Clone)]
struct AppState {
    search: Arc<CatalogSearch>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
