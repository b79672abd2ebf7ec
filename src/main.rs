mod common;
mod config;
mod lifecycle;
mod overlay;
mod storage;
mod timestamp;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;

use common::ScraperError;
use config::AppConfig;
use lifecycle::StopSignal;
use overlay::{ChatPoller, PollSummary, WebDriverPage};

const EXAMPLE_URL: &str = "https://kicktools.app/fusion_chat/fusion-chat.html?kick=communitycontroller&twitch=&font=Inter&fontSize=Large&fontShadow=shadow-na&fontColor=%23ffffff&theme=basic&fontCase=none&timestamp=on&userBadges=on&fadeTime=1";

#[derive(Parser)]
#[command(
    name = "fusion_chat_logger",
    version,
    about = "Records chat messages from a Fusion Chat overlay into a JSON file",
    after_help = format!("Example:\n  fusion_chat_logger \"{EXAMPLE_URL}\"\n\nCreate the stop file (default `stop.txt`) or press Ctrl+C to stop.")
)]
struct Cli {
    /// Fusion Chat overlay URL
    url: String,
    /// Path to JSON config file
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: String,
    /// Where to write the collected messages
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
    /// File whose appearance stops the logger
    #[arg(long, value_name = "FILE")]
    stop_file: Option<PathBuf>,
    /// WebDriver endpoint (e.g. chromedriver)
    #[arg(long, value_name = "URL")]
    webdriver: Option<String>,
    /// Run the browser without a window
    #[arg(long)]
    headless: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(output) = &self.output {
            config.output_file = output.clone();
        }
        if let Some(stop_file) = &self.stop_file {
            config.stop_file = stop_file.clone();
        }
        if let Some(webdriver) = &self.webdriver {
            config.webdriver_url = webdriver.clone();
        }
        if self.headless {
            config.headless = true;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let mut app_config = config::load_config(&cli.config);
    cli.apply_overrides(&mut app_config);

    if let Err(err) = overlay::validate_overlay_url(&cli.url, &app_config.overlay_path) {
        log::error!("{err}");
        eprintln!("Error: {err}");
        return ExitCode::FAILURE;
    }
    log::info!("Starting chat parsing for URL: {}", cli.url);

    let stop = StopSignal::new();
    lifecycle::install_interrupt_handler(stop.clone());

    let worker = tokio::spawn(run_parser(cli.url.clone(), app_config.clone(), stop.clone()));

    lifecycle::watch_stop_file(&app_config.stop_file, &stop, app_config.stop_poll()).await;

    match worker.await {
        Ok(Ok(summary)) => {
            report_summary(&summary);
            ExitCode::SUCCESS
        }
        Ok(Err(err)) => {
            log::error!("{err}");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
        Err(err) => {
            log::error!("Parser task failed: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Opens the browser session and polls it until stopped.
///
/// Triggers `stop` on return so the stop-file watcher ends with it.
async fn run_parser(
    url: String,
    app_config: AppConfig,
    stop: StopSignal,
) -> Result<PollSummary, ScraperError> {
    let result = match WebDriverPage::open(&app_config, &url).await {
        Ok(page) => Ok(ChatPoller::new(&app_config, stop.clone()).run(page).await),
        Err(err) => Err(err),
    };
    log::info!("Stopped parsing for URL: {url}");
    stop.trigger();
    result
}

fn report_summary(summary: &PollSummary) {
    if summary.saved > 0 {
        log::info!(
            "Saved {} messages to {}",
            summary.saved,
            summary.output.display()
        );
        println!(
            "Saved {} messages to {}",
            summary.saved,
            summary.output.display()
        );
    } else {
        log::info!("No messages parsed");
        println!("No messages parsed");
    }
}
