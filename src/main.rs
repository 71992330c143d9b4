use clap::Parser;
use classifieds_api::cli::Cli;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up JWT_KEY, DATABASE_*, etc.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(e) = classifieds_api::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }
}
