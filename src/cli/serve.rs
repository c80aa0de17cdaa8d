use clap::Args;
use tracing::info;

use crate::config::validation::ConfigValidator;
use crate::error::Result;
use crate::server;
use crate::services::SimpleServices;

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides VERSEEN_BIND_ADDRESS)
    #[arg(short, long, value_name = "ADDR")]
    bind: Option<String>,
}

pub async fn execute(args: ServeArgs, services: &SimpleServices) -> Result<()> {
    let config = services.config();
    let bind_address = args.bind.unwrap_or_else(|| config.bind_address.clone());
    ConfigValidator::validate_bind_address(&bind_address)?;

    // Fail before binding when the LLM key is missing
    let interpreter = services.create_interpreter()?;

    info!("Using model {} at {}", config.groq_model, config.groq_api_url);
    server::run_server(interpreter, &bind_address).await
}
