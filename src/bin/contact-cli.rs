use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "contact-cli")]
#[command(about = "Client for the contact intake service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3001")]
    url: String,

    /// Send an Origin header, as a browser would.
    #[arg(short, long)]
    origin: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the liveness endpoint
    Health,
    /// Submit a contact form
    Submit {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        work_email: String,
        #[arg(long)]
        company_name: Option<String>,
        #[arg(long)]
        job_title: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(origin) = &cli.origin {
        headers.insert(ORIGIN, HeaderValue::from_str(origin)?);
    }

    match cli.command {
        Commands::Health => {
            let res = client.get(&cli.url).headers(headers).send().await?;
            let status = res.status();
            println!("{} {}", status, res.text().await?);
        }
        Commands::Submit {
            full_name,
            work_email,
            company_name,
            job_title,
        } => {
            let body = json!({
                "fullName": full_name,
                "workEmail": work_email,
                "companyName": company_name,
                "jobTitle": job_title,
            });
            let res = client
                .post(format!("{}/contact", cli.url.trim_end_matches('/')))
                .headers(headers)
                .json(&body)
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

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}\n{}", status, serde_json::to_string_pretty(&json)?),
        Err(_) if text.is_empty() => println!("{}", status),
        Err(_) => println!("{}\n{}", status, text),
    }

    if !status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
