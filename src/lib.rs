pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod models;
pub mod proxy;
pub mod server;

use cli::Args;
use config::ProxyConfig;
use log::info;
use proxy::ChatProxy;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Chat Base URL: {}", args.chat_base_url);
    info!("Chat Model: {}", args.chat_model);
    info!("Chat API Key: {}", if args.chat_api_key.is_empty() { "not set" } else { "set" });
    info!("Provider Timeout: {:?}", args.provider_timeout_secs);
    info!("Max History Turns: {:?}", args.max_history_turns);
    info!("Max Body Bytes: {:?}", args.max_body_bytes);
    info!("Prompts Path: {}", args.prompts_path.as_deref().unwrap_or("built-in"));
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let config = ProxyConfig::from_args(&args)?;
    let proxy = Arc::new(ChatProxy::from_config(&config)?);
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, proxy, args);
    server.run().await?;

    Ok(())
}
