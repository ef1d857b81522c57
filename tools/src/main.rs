mod config;
mod logview;
mod replay;
mod time_stamper;

use flexi_logger::{FileSpec, Logger};

use config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Log to a file so stdout only carries the document
    let _logger = Logger::try_with_env_or_str("info")
        .and_then(|logger| logger.log_to_file(FileSpec::default().directory(std::env::temp_dir())).start())
        .map_err(|e| eprintln!("Warning: logging disabled: {e}"))
        .ok();

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {}.", e);
            std::process::exit(1);
        }
    };
    log::info!("Init config: {:?}", cfg);

    if let Err(e) = logview::logview_cmd(cfg).await {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
