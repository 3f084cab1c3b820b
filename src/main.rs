use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

use postfit::config::Config;
use postfit::text::{
    compose_post, truncate_detailed, validate_with, Truncation, ValidateOptions, ValidationResult,
};

#[derive(Parser, Debug)]
#[command(
    name = "postfit",
    about = "Check and fit post text to the weighted character limit"
)]
struct Cli {
    /// Config file (defaults to ~/.config/postfit/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct FitArgs {
    /// Weighted length limit (overrides config)
    #[arg(long)]
    limit: Option<usize>,

    /// Truncation marker (overrides config)
    #[arg(long)]
    ellipsis: Option<char>,

    /// Print the validation breakdown to stderr
    #[arg(long)]
    debug: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report the weighted length of TEXT; exits 1 if it should not be posted
    Validate {
        /// Post text (read from stdin when omitted)
        text: Option<String>,
        #[command(flatten)]
        fit: FitArgs,
    },
    /// Fit TEXT to the limit, keeping a trailing link
    Truncate {
        /// Post text (read from stdin when omitted)
        text: Option<String>,
        #[command(flatten)]
        fit: FitArgs,
    },
    /// Join BODY and LINK into a post that fits the limit
    Compose {
        /// Article link appended on its own line
        #[arg(long, value_name = "URL")]
        link: String,
        /// Summary text (read from stdin when omitted)
        body: Option<String>,
        #[command(flatten)]
        fit: FitArgs,
    },
}

/// Returns the argument, or all of stdin decoded lossily.
fn read_input(text: Option<String>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .context("Failed to read post text from stdin")?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let Some(path) = path.or_else(Config::default_path) else {
        tracing::debug!("HOME not set, using default configuration");
        return Ok(Config::default());
    };
    Config::load(&path).with_context(|| format!("Failed to load config '{}'", path.display()))
}

fn options_for(config: &Config, fit: &FitArgs) -> ValidateOptions {
    let mut options = config.options();
    if let Some(limit) = fit.limit {
        options.limit = limit;
    }
    if let Some(ellipsis) = fit.ellipsis {
        options.ellipsis = ellipsis;
    }
    options.debug |= fit.debug;
    options
}

/// Stdout form of a validation result. The debug report never goes here.
fn validation_output(result: &ValidationResult, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(result)?);
    }
    Ok(result.report().to_string())
}

/// Stdout form of fitted text.
fn fitted_output(fitted: &Truncation, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(fitted)?);
    }
    Ok(fitted.text.clone())
}

fn print_fitted(fitted: &Truncation, fit: &FitArgs, options: &ValidateOptions) -> Result<()> {
    if options.debug {
        let check = validate_with(&fitted.text, options)?;
        eprintln!("{}", check.report());
    }
    println!("{}", fitted_output(fitted, fit.json)?);
    Ok(())
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for the post text
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config)?;

    match cli.command {
        Command::Validate { text, fit } => {
            let options = options_for(&config, &fit);
            let text = read_input(text)?;
            let result = validate_with(&text, &options)?;
            if options.debug {
                eprintln!("{}", result.report());
            }
            println!("{}", validation_output(&result, fit.json)?);
            if !result.should_publish() {
                std::process::exit(1);
            }
        }
        Command::Truncate { text, fit } => {
            let options = options_for(&config, &fit);
            let text = read_input(text)?;
            let fitted = truncate_detailed(&text, &options)?;
            print_fitted(&fitted, &fit, &options)?;
        }
        Command::Compose { link, body, fit } => {
            let options = options_for(&config, &fit);
            let body = read_input(body)?;
            let fitted = compose_post(&body, &link, &options)?;
            print_fitted(&fitted, &fit, &options)?;
        }
    }

    Ok(())
}
