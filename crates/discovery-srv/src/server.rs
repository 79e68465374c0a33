//! HTTP front end: one handler answering discovery requests.
//!
//! Every request, whatever its method, is evaluated against the policy
//! snapshot current when it arrives and answered with an XML document.

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{CONTENT_TYPE, HOST};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use discovery_client::PolicyClient;
use discovery_core::credentials::{decode_param_pack, read_service_token};
use discovery_core::{DiscoveryResult, ServiceToken, ERROR_CODE_SERVER};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::timeout::TimeoutLayer;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::encoding::{encode_result, FALLBACK_BODY};
use crate::policy::{Fabricator, PolicyStore};
use crate::sync::Refresher;
use crate::SrvError;

/// Header carrying the console's service token.
pub const SERVICE_TOKEN_HEADER: &str = "x-nintendo-servicetoken";

/// Header carrying the console's parameter pack.
pub const PARAM_PACK_HEADER: &str = "x-nintendo-parampack";

/// Client address as reported by a fronting proxy.
const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

const XML_CONTENT_TYPE: &str = "application/xml";

/// Shared state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current policy
    pub store: PolicyStore,
    /// Evaluation settings
    pub fabricator: Fabricator,
}

impl AppState {
    /// Create handler state
    pub const fn new(store: PolicyStore, fabricator: Fabricator) -> Self {
        Self { store, fabricator }
    }
}

/// Build the router with the discovery handler mounted on `route`.
///
/// Requests still running after `request_timeout` are answered with
/// `408 Request Timeout`.
pub fn router(state: Arc<AppState>, route: &str, request_timeout: Duration) -> Router {
    with_request_timeout(
        Router::new()
            .route(route, any(discovery_handler))
            .with_state(state),
        request_timeout,
    )
}

fn with_request_timeout(router: Router, timeout: Duration) -> Router {
    router.layer(TimeoutLayer::new(timeout))
}

async fn discovery_handler(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let (parts, _) = request.into_parts();
    let headers = &parts.headers;
    let host = request_host(&parts);
    let peer = parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string());
    let forwarded_for = header_str(headers, FORWARDED_FOR_HEADER).map(str::to_string);

    let token = read_service_token(header_str(headers, SERVICE_TOKEN_HEADER).unwrap_or_default());
    if let ServiceToken::Undecodable { error, .. } = &token {
        warn!(error = %error, raw = token.raw(), "service token could not be decoded");
    }

    let (pack, pack_error) =
        decode_param_pack(header_str(headers, PARAM_PACK_HEADER).unwrap_or_default());
    if let Some(e) = pack_error {
        warn!(error = %e, "parameter pack could not be decoded");
    }

    let identity = token.display_identity().to_string();
    let snapshot = state.store.current();
    let fabricator = state.fabricator;
    let evaluated_host = host.clone();

    // bcrypt verification is CPU bound.
    let result = match tokio::task::spawn_blocking(move || {
        fabricator.evaluate(&token, &evaluated_host, &snapshot)
    })
    .await
    {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "policy evaluation task failed");
            DiscoveryResult::server_error()
        }
    };

    info!(
        token = %identity,
        host = %host,
        peer = peer.as_deref().unwrap_or("-"),
        forwarded_for = forwarded_for.as_deref().unwrap_or("-"),
        pack = ?pack,
        outcome = result.outcome(),
        "discovery request"
    );

    xml_response(&result)
}

/// The requested host: the `Host` header, else the URI authority, else "".
fn request_host(parts: &Parts) -> String {
    header_str(&parts.headers, HOST.as_str())
        .or_else(|| parts.uri.authority().map(|authority| authority.as_str()))
        .unwrap_or_default()
        .to_string()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn xml_response(result: &DiscoveryResult) -> Response {
    let status = match result {
        DiscoveryResult::Error { code, .. } if *code == ERROR_CODE_SERVER => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::OK,
    };

    match encode_result(result) {
        Ok(body) => (status, [(CONTENT_TYPE, XML_CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode response");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, XML_CONTENT_TYPE)],
                FALLBACK_BODY,
            )
                .into_response()
        }
    }
}

/// Serve discovery requests until Ctrl-C or SIGTERM.
///
/// Builds the policy store from `config`, starts one refresh task per
/// remote policy source, then binds `options.listen`.
pub async fn run(config: &ServerConfig) -> crate::Result<()> {
    for warning in config.warnings() {
        warn!("{warning}");
    }

    let store = PolicyStore::new(config.initial_state()?);

    let client = PolicyClient::builder()
        .timeout(config.fetch_timeout())
        .build()?;
    let refresher = Refresher::new(store.clone(), Arc::new(client));
    let refresh_handles = refresher.spawn_all(config.refresh_tasks());

    let state = Arc::new(AppState::new(
        store,
        Fabricator::new(config.options.override_discovery),
    ));
    let app = router(state, &config.options.endpoint, config.request_timeout());

    let listen = config.options.listen;
    let listener = TcpListener::bind(listen)
        .await
        .map_err(|e| SrvError::Server(format!("bind {listen}: {e}")))?;

    info!(
        addr = %listen,
        endpoint = %config.options.endpoint,
        override_discovery = config.options.override_discovery,
        token_keys = %config.options.token_keys,
        request_timeout_secs = config.options.request_timeout,
        refresh_tasks = refresh_handles.len(),
        "discovery server running"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| SrvError::Server(format!("server error: {e}")))?;

    for handle in refresh_handles {
        handle.abort();
    }
    info!("discovery server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
