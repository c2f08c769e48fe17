use pawsbot::bot::{run_bot, BotConfig};

#[tokio::main]
pub async fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting Paws bot...");

    let config = match BotConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run_bot(config).await {
        log::error!("Paws bot stopped: {err}");
        std::process::exit(1);
    }

    log::info!("Paws bot shut down.");
}
