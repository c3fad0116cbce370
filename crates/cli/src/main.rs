//! Waitline CLI - Command-line client for the Waitline HTTP API

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tabled::{Table, Tabled};

const DEFAULT_URL: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "waitline")]
#[command(about = "Waitline queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Server URL
    #[arg(long, global = true, env = "WAITLINE_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Shared API key sent in the Authorization header
    #[arg(long, global = true, env = "WAITLINE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server is reachable
    Status,

    /// List people still waiting
    List,

    /// Show one entry
    Show {
        /// Entry ID
        id: i64,
    },

    /// Add a person to the line
    Join {
        /// Person name (1-20 characters)
        #[arg(short, long)]
        name: String,

        /// Class: P (preferential) or N (normal)
        #[arg(short, long)]
        class: String,
    },

    /// Serve the front of a class and move everyone else up
    Advance {
        /// Class: P or N
        class: String,
    },

    /// Remove a waiting person from the line
    Remove {
        /// Entry ID
        id: i64,
    },
}

#[derive(Deserialize, Tabled)]
struct EntryRow {
    id: i64,
    name: String,
    class_code: String,
    position: i64,
    served: bool,
    joined_at: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Value,
}

struct Client {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl Client {
    fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value> {
        let mut request = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", key);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .context("Failed to connect to server")?;
        let status = response.status();
        let text = response.text().await.context("Failed to read response")?;

        if !status.is_success() {
            anyhow::bail!("{} ({})", error_detail(&text), status_label(status));
        }

        serde_json::from_str(&text).context("Failed to parse response")
    }
}

fn error_detail(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: Value::String(s),
        }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.is_empty() => "request failed".to_string(),
        Err(_) => body.to_string(),
    }
}

fn status_label(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

fn print_entries(entries: Vec<EntryRow>) {
    println!("{}", Table::new(entries));
}

fn message_of(value: &Value) -> &str {
    value["message"].as_str().unwrap_or("OK")
}

async fn run(cli: Cli) -> Result<()> {
    let client = Client::new(&cli.url, cli.api_key);

    match cli.command {
        Commands::Status => {
            println!("{}", "Server Status".cyan().bold());
            println!();

            match client.call(Method::GET, "/", None).await {
                Ok(result) => {
                    println!("  {} {}", "URL:".bold(), cli.url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!("  {} {}", "Message:".bold(), message_of(&result));
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }

        Commands::List => {
            let result = client.call(Method::GET, "/queue", None).await?;
            let entries: Vec<EntryRow> = serde_json::from_value(result)?;

            println!(
                "{}",
                format!("{} waiting", entries.len()).cyan().bold()
            );
            print_entries(entries);
        }

        Commands::Show { id } => {
            let result = client
                .call(Method::GET, &format!("/queue/{}", id), None)
                .await?;
            let entry: EntryRow = serde_json::from_value(result)?;
            print_entries(vec![entry]);
        }

        Commands::Join { name, class } => {
            let body = json!({ "name": name, "class_code": class });
            let result = client.call(Method::POST, "/queue", Some(body)).await?;
            let entry: EntryRow = serde_json::from_value(result["data"].clone())?;

            println!("{}", format!("✓ {}", message_of(&result)).green().bold());
            println!();
            print_entries(vec![entry]);
        }

        Commands::Advance { class } => {
            let result = client
                .call(Method::PUT, &format!("/queue/{}", class), None)
                .await?;
            println!("{}", format!("✓ {}", message_of(&result)).green().bold());
        }

        Commands::Remove { id } => {
            let result = client
                .call(Method::DELETE, &format!("/queue/{}", id), None)
                .await?;
            println!("{}", format!("✓ {}", message_of(&result)).green().bold());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "✗".red(), e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_detail_from_body() {
        assert_eq!(
            error_detail(r#"{"detail":"Person does not exist"}"#),
            "Person does not exist"
        );
        assert_eq!(error_detail(""), "request failed");
        assert_eq!(error_detail("bad gateway"), "bad gateway");
    }

    #[test]
    fn test_status_label() {
        assert_eq!(status_label(StatusCode::FORBIDDEN), "403 Forbidden");
    }

    #[test]
    fn test_parse_join_command() {
        let cli = Cli::parse_from([
            "waitline", "--api-key", "k", "join", "--name", "Alice", "--class", "P",
        ]);
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert!(matches!(
            cli.command,
            Commands::Join { ref name, ref class } if name == "Alice" && class == "P"
        ));
    }

    #[test]
    fn test_entry_row_from_server_json() {
        let row: EntryRow = serde_json::from_value(json!({
            "id": 1,
            "name": "Alice",
            "class_code": "P",
            "served": false,
            "joined_at": "05/03/2024 14:07:09",
            "position": 1
        }))
        .unwrap();
        assert_eq!(row.position, 1);
    }
}
