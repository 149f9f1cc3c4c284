use tracing::error;

use dronebridge::bridge::BridgeService;
use dronebridge::config::load_config;
use dronebridge::utils::{BridgeError, logging};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init("info");

    let settings = match load_config().map_err(BridgeError::Config) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };

    if let Err(e) = BridgeService::new().run(settings).await {
        error!(error = %e, "bridge terminated");
        std::process::exit(1);
    }
}
