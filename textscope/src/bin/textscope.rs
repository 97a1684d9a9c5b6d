use clap::Parser;
use human_panic::setup_panic;
use std::sync::Arc;
use textscope::prelude::*;
use tracing::{error, info};

/// textscope
///
/// Interactive console analyzer. Each line of input is sent to a hosted
/// text-analytics service, and the detected language, sentiment, key
/// phrases, named entities, and an extractive summary are reported back.
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
        .configure_logging(&opts.config.get_run_id(), "analyze")
        .await;
    let error_code = run_analyzer(opts).await;

    if error_code != 0 {
        info!(target: "user", "More detailed logs at {}", file_location);
    }

    std::process::exit(error_code);
}

async fn run_analyzer(opts: Cli) -> i32 {
    let config = match opts.config.load_config() {
        Err(e) => {
            error!(target: "user", "Failed to load configuration: {}", e);
            return 2;
        }
        Ok(c) => c,
    };

    let analyzer = TextAnalyzer::new(Arc::new(HttpTextAnalytics::new(config)));
    match interactive_loop(&analyzer, tokio::io::stdin()).await {
        Ok(()) => 0,
        Err(e) => {
            error!(target: "user", "Critical Error. {}", e);
            1
        }
    }
}
