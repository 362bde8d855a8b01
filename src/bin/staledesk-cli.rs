use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "staledesk-cli")]
#[command(about = "Client for the staledesk contacts API", long_about = None)]
struct Cli {
    #[arg(short, long, env = "STALE_URL", default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List contacts, optionally filtered by exact email/phone/mobile
    List {
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        mobile: Option<String>,
    },
    /// Show a single contact
    Get { id: String },
    /// Create a contact from a JSON file ("-" reads stdin)
    Create { file: PathBuf },
    /// Patch a contact from a JSON file ("-" reads stdin)
    Update { id: String, file: PathBuf },
    /// Delete a contact
    Delete { id: String },
    /// Search by people ID, e.g. "people_id:'abc' OR people_id:'xyz'"
    Search { query: String },
    /// Check server health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = format!("{}/api/v2", cli.url.trim_end_matches('/'));

    let res = match cli.command {
        Commands::List { email, phone, mobile } => {
            let filters: Vec<(&str, String)> = [("email", email), ("phone", phone), ("mobile", mobile)]
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key, v)))
                .collect();
            client.get(format!("{api}/contacts")).query(&filters).send().await?
        }
        Commands::Get { id } => client.get(format!("{api}/contacts/{id}")).send().await?,
        Commands::Create { file } => {
            let body = read_body(&file)?;
            client.post(format!("{api}/contacts")).json(&body).send().await?
        }
        Commands::Update { id, file } => {
            let body = read_body(&file)?;
            client.put(format!("{api}/contacts/{id}")).json(&body).send().await?
        }
        Commands::Delete { id } => client.delete(format!("{api}/contacts/{id}")).send().await?,
        Commands::Search { query } => {
            client
                .get(format!("{api}/search/contacts"))
                .query(&[("query", query)])
                .send()
                .await?
        }
        Commands::Health => client.get(format!("{}/health", cli.url.trim_end_matches('/'))).send().await?,
    };

    print_response(res).await
}

fn read_body(file: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let mut content = String::new();
    if file.as_os_str() == "-" {
        std::io::stdin().read_to_string(&mut content)?;
    } else {
        content = std::fs::read_to_string(file)?;
    }
    Ok(serde_json::from_str(&content)?)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
    } else {
        println!("Status: {}", status);
    }

    if text.is_empty() {
        return Ok(());
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
