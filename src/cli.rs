use clap::Parser;
use js_param_miner::config::DEFAULT_OUTPUT;
use js_param_miner::DedupMode;

#[derive(clap::Parser, Debug)]
#[command(author, version, about = "Extract endpoints or parameter names from JavaScript files", long_about = None)]
#[command(group(clap::ArgGroup::new("input").required(true).args(["single_url", "urls_list"])))]
pub struct Cli {
    /// Single URL to grep endpoints from
    #[arg(short = 'u', value_name = "URL")]
    pub single_url: Option<String>,

    /// File with one .js URL per line
    #[arg(short = 'l', value_name = "FILE")]
    pub urls_list: Option<String>,

    /// Output file (endpoint mode only; parameter mode writes params.txt)
    #[arg(short = 'o', default_value = DEFAULT_OUTPUT)]
    pub output: String,

    /// Show the source URL next to each extracted item
    #[arg(short = 'p', default_value_t = false)]
    pub show_source: bool,

    /// Number of workers for list mode
    #[arg(short = 't', default_value_t = 1_usize)]
    pub threads: usize,

    /// Extract only parameters and save to params.txt
    #[arg(long = "only-params", default_value_t = false)]
    pub only_params: bool,

    /// How concurrent workers deduplicate discoveries
    #[arg(long, value_enum, default_value_t = DedupMode::Locked)]
    pub dedup: DedupMode,

    /// Enable detailed debug logging
    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
