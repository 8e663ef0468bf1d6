use std::time::Duration;

use resonance::config::{DEFAULT_ACCOUNTS_URL, DEFAULT_SEARCH_URL};
use tracing_subscriber::EnvFilter;

use super::*;

#[derive(Parser)]
#[command(name = "resonance-server")]
#[command(about = "Catalog search proxy for Resonance jam sessions", long_about = None)]
pub(super) struct Args {
    /// Address to listen on
    #[arg(long, env = "RESONANCE_ADDR", default_value = "127.0.0.1:3000")]
    pub(super) addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    pub(super) addr_file: Option<PathBuf>,

    /// Catalog API client id
    #[arg(long, env = "SPOTIFY_CLIENT_ID", hide_env_values = true)]
    pub(super) client_id: Option<String>,

    /// Catalog API client secret
    #[arg(long, env = "SPOTIFY_CLIENT_SECRET", hide_env_values = true)]
    pub(super) client_secret: Option<String>,

    /// Token endpoint for the client-credentials exchange
    #[arg(long, default_value = DEFAULT_ACCOUNTS_URL)]
    pub(super) accounts_url: String,

    /// Catalog search endpoint
    #[arg(long, default_value = DEFAULT_SEARCH_URL)]
    pub(super) search_url: String,

    /// Timeout for each outbound call, in seconds
    #[arg(long, default_value_t = 10)]
    pub(super) request_timeout_secs: u64,
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let state = build_state(&args)?;
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;

    let local_addr = listener.local_addr().context("read listener local addr")?;
    info!(%local_addr, "resonance-server listening");

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("resonance-server stopped");
    Ok(())
}

pub(super) fn build_state(args: &Args) -> Result<Arc<AppState>> {
    let credentials = ClientCredentials::new(
        args.client_id.clone().unwrap_or_default(),
        args.client_secret.clone().unwrap_or_default(),
    )
    .context("set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET (or --client-id/--client-secret)")?;

    let config = UpstreamConfig::default()
        .with_accounts_url(args.accounts_url.clone())
        .with_search_url(args.search_url.clone())
        .with_request_timeout(Duration::from_secs(args.request_timeout_secs));
    let http = config.http_client()?;

    info!(
        client_id = %credentials.client_id(),
        accounts_url = %config.accounts_url,
        search_url = %config.search_url,
        "catalog upstream configured"
    );

    let provider = Arc::new(CredentialProvider::new(
        http.clone(),
        &config,
        credentials,
        Arc::new(SystemClock),
    ));
    let search = Arc::new(CatalogSearch::new(http, &config, provider));

    Ok(Arc::new(AppState { search }))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
        info!("received ctrl-c, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("received terminate signal, shutting down");
            }
            Err(err) => {
                warn!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
