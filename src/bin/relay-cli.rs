use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "relay-cli")]
#[command(about = "Management CLI for the VisionFlux relay", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check relay liveness
    Status,
    /// Test that a Colab URL is reachable through the relay
    Test { colab_url: String },
    /// Forward a generation prompt through the relay
    Generate { colab_url: String, prompt: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Test { colab_url } => {
            let res = client
                .post(format!("{}/proxy/test", cli.url))
                .json(&json!({ "prompt": "", "colab_url": colab_url }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Generate { colab_url, prompt } => {
            let res = client
                .post(format!("{}/proxy/generate", cli.url))
                .json(&json!({ "prompt": prompt, "colab_url": colab_url }))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: relay returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
