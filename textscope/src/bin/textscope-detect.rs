use clap::Parser;
use human_panic::setup_panic;
use textscope::prelude::*;
use tracing::{error, info};

/// textscope-detect
///
/// Minimal variant of textscope: detects the language of each line of input
/// with a single raw POST against the language-detection route.
#[derive(Parser)]
#[clap(author, version, about)]
struct Cli {
    #[clap(flatten)]
    logging: LoggingOpts,

    #[clap(flatten)]
    config: ConfigOptions,
}

#[tokio::main]
async fn main() {
    setup_panic!();
    dotenvy::dotenv().ok();
    let opts = Cli::parse();

    let (_guard, file_location) = opts
        .logging
        .configure_logging(&opts.config.get_run_id(), "detect")
        .await;
    let error_code = run_detector(opts).await;

    if error_code != 0 {
        info!(target: "user", "More detailed logs at {}", file_location);
    }

    std::process::exit(error_code);
}

async fn run_detector(opts: Cli) -> i32 {
    let config = match opts.config.load_config() {
        Err(e) => {
            error!(target: "user", "Failed to load configuration: {}", e);
            return 2;
        }
        Ok(c) => c,
    };

    let detector = RawLanguageDetection::new(config);
    match interactive_loop(&detector, tokio::io::stdin()).await {
        Ok(()) => 0,
        Err(e) => {
            error!(target: "user", "Critical Error. {}", e);
            1
        }
    }
}
