use clap::Parser;
use std::{
    io::{self, Read},
    path::PathBuf,
};
use tokenweave::{config::TokenizerConfig, Error};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input file, stdin when omitted
    input: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, default_value = "tokenweave.json")]
    config: PathBuf,

    /// Print the token tree as JSON instead of the expanded text
    #[arg(long)]
    tokens: bool,

    /// Combine without running transforms
    #[arg(long, conflicts_with = "tokens")]
    raw: bool,

    /// Enable debug mode
    #[arg(short, long)]
    verbose: bool,
}

fn read_input(input: Option<&PathBuf>) -> Result<String, Error> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| Error::internal(format!("Failed to read {}: {}", path.display(), e))),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| Error::internal(format!("Failed to read stdin: {}", e)))?;
            Ok(text)
        }
    }
}

async fn run(cli: &Cli) -> Result<(), Error> {
    let config = if cli.config.exists() {
        TokenizerConfig::from_file(&cli.config)?
    } else {
        TokenizerConfig::default()
    };
    info!("config loaded.");
    debug!("config: {:?}", config);

    let tokenizer = config.build_tokenizer();
    let text = read_input(cli.input.as_ref())?;
    let mut tokens = tokenizer.get_tokens(&text);

    if cli.tokens {
        let json = serde_json::to_string_pretty(&tokens)
            .map_err(|e| Error::internal(format!("Failed to serialize tokens: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    let output = tokenizer.combine(&mut tokens, !cli.raw).await?;
    print!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
