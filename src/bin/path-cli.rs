use std::path::PathBuf;

use clap::{Parser, Subcommand};
use recursive_delay::path::{PathSpec, SiteSpec};

#[derive(Parser)]
#[command(name = "path-cli")]
#[command(about = "Submit paths to recursive-delay sites", long_about = None)]
struct Cli {
    /// Site that receives the path (normally the first hop).
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a path and print the per-hop report
    Submit {
        /// JSON file holding a full path ({"id": ..., "sites": [...]})
        #[arg(short, long, conflicts_with = "hop")]
        file: Option<PathBuf>,

        /// Path id used with --hop
        #[arg(long, default_value = "cli")]
        id: String,

        /// Hop as ADDR or ADDR=SERVICE_TIME, in order; repeatable
        #[arg(long)]
        hop: Vec<String>,
    },
    /// Print the site's live worker count
    Workers,
}

fn parse_hop(raw: &str) -> SiteSpec {
    match raw.split_once('=') {
        Some((addr, service_time)) => SiteSpec::new(addr).with_service_time(service_time),
        None => SiteSpec::new(raw),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Submit { file, id, hop } => {
            let path = match file {
                Some(file) => serde_json::from_str::<PathSpec>(&std::fs::read_to_string(file)?)?,
                None => PathSpec::new(id, hop.iter().map(|h| parse_hop(h)).collect()),
            };
            if path.is_empty() {
                return Err("a path needs at least one site (--file or --hop)".into());
            }
            eprint!("{}", path);

            let res = client.post(&cli.url).json(&path).send().await?;
            print_response(res).await?;
        }
        Commands::Workers => {
            let res = client
                .get(format!("{}/nrservers", cli.url.trim_end_matches('/')))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        eprintln!("Error: site returned status {}", status);
    }
    print!("{}", text);
    Ok(())
}
