pub mod cli;
pub mod error;
pub mod llm;
pub mod models;
pub mod server;
pub mod store;

use cli::Args;
use log::info;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat LLM Type: {}", args.chat_llm_type);
    info!("Chat Model: {}", args.chat_model.as_deref().unwrap_or("(provider default)"));
    info!("Chat Base URL: {}", args.chat_base_url.as_deref().unwrap_or("(provider default)"));
    info!("Upstream Timeout: {}s", args.upstream_timeout_secs);
    info!("Clipboard Debounce: {}ms", args.debounce_ms);
    info!("Client API Key Required: {}", args.server_api_key.is_some());
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let state = server::build_state(&args)?;
    server::start_http_server(&args, state).await
}
