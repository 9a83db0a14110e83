use clap::Parser;
use janeway_geo::client::DEFAULT_BASE_URL;
use janeway_geo::harvest::{
    self, DEFAULT_CONFIG_PATH, DEFAULT_FIRST_MONTH, DEFAULT_LAST_MONTH, DEFAULT_OUT_DIR,
    HarvestOptions,
};
use janeway_geo::ReportMonth;
use log::{error, info};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(
    name = "janeway-geo",
    about = "Download monthly geo usage reports from a Janeway site"
)]
struct Cli {
    /// YAML file holding the user_* login fields
    #[arg(long, env = "JANEWAY_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Site root, e.g. https://bok.idpro.org
    #[arg(long, env = "JANEWAY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Directory receiving bok_geo_use_YYYYMM.csv files
    #[arg(long, default_value = DEFAULT_OUT_DIR)]
    out_dir: PathBuf,

    /// First month YYYY-MM (inclusive)
    #[arg(long, value_parser = parse_month)]
    from: Option<ReportMonth>,

    /// Last month YYYY-MM (inclusive)
    #[arg(long, value_parser = parse_month)]
    to: Option<ReportMonth>,

    /// Per-request timeout in seconds; requests wait indefinitely when unset
    #[arg(long)]
    timeout_secs: Option<u64>,
}

fn parse_month(raw: &str) -> Result<ReportMonth, String> {
    raw.parse().map_err(|e: janeway_geo::ReportError| e.to_string())
}

impl From<Cli> for HarvestOptions {
    fn from(cli: Cli) -> Self {
        Self {
            config_path: cli.config,
            base_url: cli.base_url,
            out_dir: cli.out_dir,
            from: cli.from.unwrap_or(DEFAULT_FIRST_MONTH),
            to: cli.to.unwrap_or(DEFAULT_LAST_MONTH),
            timeout: cli.timeout_secs.map(Duration::from_secs),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = HarvestOptions::from(Cli::parse());
    info!(
        "Fetching reports {} to {} from {}",
        options.from, options.to, options.base_url
    );
    match harvest::run(&options).await {
        Ok(written) => {
            info!("Done, {} files written", written.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
