pub mod relay;
pub mod store_api;

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ Request, State },
    http::StatusCode,
    middleware::{ self, Next },
    response::{ IntoResponse, Response },
    routing::{ delete, get, post },
    Json,
    Router,
};
use log::{ info, warn };
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::cors::{ Any, CorsLayer };

use crate::cli::Args;
use crate::llm::chat::{ new_adapter, ProviderAdapter };
use crate::llm::ProviderConfig;
use crate::models::chat::ClipboardRecord;
use crate::store::{ new_conversation_store, ClipboardStore, ConversationStore, Debouncer };

#[derive(Clone)]
pub struct AppState {
    pub adapter: Arc<dyn ProviderAdapter>,
    pub http: reqwest::Client,
    pub upstream_timeout: Duration,
    pub clipboard: Arc<ClipboardStore>,
    pub clipboard_writer: Arc<Mutex<Debouncer<ClipboardRecord>>>,
    pub conversations: Arc<dyn ConversationStore>,
    pub server_api_key: Option<String>,
}

pub fn build_state(args: &Args) -> Result<AppState, Box<dyn Error + Send + Sync>> {
    let config = ProviderConfig::from_args(args)?;
    let adapter = new_adapter(&config);
    if !adapter.has_credentials() {
        warn!(
            "No CHAT_API_KEY configured for provider '{}'; relay requests will fail with missing_credentials",
            adapter.name()
        );
    }

    let upstream_timeout = Duration::from_secs(args.upstream_timeout_secs);
    let http = reqwest::Client::builder().timeout(upstream_timeout).build()?;

    let clipboard = Arc::new(ClipboardStore::new());
    let committer = Arc::clone(&clipboard);
    let clipboard_writer = Arc::new(
        Mutex::new(
            Debouncer::new(Duration::from_millis(args.debounce_ms), move |record| {
                committer.put(record)
            })
        )
    );

    Ok(AppState {
        adapter,
        http,
        upstream_timeout,
        clipboard,
        clipboard_writer,
        conversations: new_conversation_store(),
        server_api_key: args.server_api_key.clone(),
    })
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/relay", post(relay::relay_handler).fallback(relay::method_not_allowed))
        .route("/api/ask", post(relay::relay_handler).fallback(relay::method_not_allowed))
        .route("/api/chat", post(relay::relay_handler).fallback(relay::method_not_allowed))
        .route("/clipboard", get(store_api::get_clipboard).put(store_api::put_clipboard))
        .route("/clipboard/clear", post(store_api::clear_clipboard))
        .route("/clipboard/watch", get(store_api::watch_clipboard))
        .route(
            "/conversations",
            get(store_api::list_conversations).post(store_api::create_conversation)
        )
        .route("/conversations/{id}", delete(store_api::delete_conversation))
        .route(
            "/conversations/{id}/messages",
            get(store_api::list_messages).post(store_api::append_message)
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key))
        .route("/healthz", get(store_api::healthz))
        .layer(cors)
        .with_state(state)
}

pub async fn start_http_server(
    args: &Args,
    state: AppState
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let addr = args.server_addr.parse::<SocketAddr>()?;
    let app = build_router(state);

    if args.enable_tls && args.tls_cert_path.is_some() && args.tls_key_path.is_some() {
        let cert_path = args.tls_cert_path.as_ref().unwrap();
        let key_path = args.tls_key_path.as_ref().unwrap();

        let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
            cert_path,
            key_path
        ).await?;

        info!("Starting HTTPS server on: https://{}", addr);
        axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service()).await?;
    } else {
        info!("Starting HTTP server on: http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

/// Shared-secret login gate. When SERVER_API_KEY is set, every request
/// except the health probe must carry it in `x-api-key`.
async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(expected) = &state.server_api_key {
        let provided = request
            .headers()
            .get("x-api-key")
            .and_then(|value| value.to_str().ok());
        if provided != Some(expected.as_str()) {
            warn!("Rejected request to {} with missing or wrong API key", request.uri().path());
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "unauthorized" })),
            ).into_response();
        }
    }
    next.run(request).await
}
