use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bitman_client::service_from_settings;
use bitman_core::models::{AskResponse, ProviderOutcome};
use bitman_core::{Settings, build_prompt, extract_options};

#[derive(Parser)]
#[command(name = "bitman", version, about = "Ask OpenAI and Gemini to pick the answer to a quiz question")]
struct Cli {
    /// Path to the JSON settings file
    #[arg(long, global = true, env = "BITMAN_SETTINGS", default_value = "bitman.json")]
    settings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the configured providers to answer a question
    Ask {
        /// Question text (defaults to the selection itself)
        #[arg(short, long)]
        question: Option<String>,

        #[command(flatten)]
        selection: SelectionArgs,

        /// Print the full response as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Show the options extracted from a selection, without calling any provider
    Options {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Also print the prompt that would be sent
        #[arg(long, default_value_t = false)]
        prompt: bool,

        /// Question used when printing the prompt (defaults to the selection)
        #[arg(short, long)]
        question: Option<String>,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Args)]
struct SelectionArgs {
    /// Selected text (reads stdin if neither this nor --selection-file is given)
    #[arg(short, long, conflicts_with = "selection_file")]
    selection: Option<String>,

    /// File containing the selected text
    #[arg(long)]
    selection_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print effective settings (file + environment), keys masked
    Show,

    /// Update values in the settings file
    Set {
        #[arg(long)]
        openai_key: Option<String>,
        #[arg(long)]
        gemini_key: Option<String>,
        #[arg(long)]
        model_openai: Option<String>,
        #[arg(long)]
        model_gemini: Option<String>,
        #[arg(long)]
        openai_org: Option<String>,
        #[arg(long)]
        openai_project: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("bitman=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ask {
            question,
            selection,
            json,
        } => {
            let selection = read_selection(&selection)?;
            let question = question.unwrap_or_else(|| selection.clone());
            cmd_ask(&cli.settings, &question, &selection, json).await?;
        }
        Commands::Options {
            selection,
            prompt,
            question,
        } => {
            let selection = read_selection(&selection)?;
            let question = question.unwrap_or_else(|| selection.clone());
            cmd_options(&question, &selection, prompt);
        }
        Commands::Settings { command } => match command {
            SettingsCommand::Show => cmd_settings_show(&cli.settings)?,
            SettingsCommand::Set {
                openai_key,
                gemini_key,
                model_openai,
                model_gemini,
                openai_org,
                openai_project,
            } => {
                let mut settings = if cli.settings.exists() {
                    Settings::from_file(&cli.settings).map_err(|e| anyhow::anyhow!(e))?
                } else {
                    Settings::default()
                };
                let updates = [
                    (&mut settings.openai_key, openai_key),
                    (&mut settings.gemini_key, gemini_key),
                    (&mut settings.model_openai, model_openai),
                    (&mut settings.model_gemini, model_gemini),
                    (&mut settings.openai_org, openai_org),
                    (&mut settings.openai_project, openai_project),
                ];
                for (field, value) in updates {
                    if let Some(value) = value {
                        *field = value.trim().to_string();
                    }
                }
                settings
                    .save(&cli.settings)
                    .map_err(|e| anyhow::anyhow!(e))?;
                println!("Saved settings to {}", cli.settings.display());
            }
        },
    }

    Ok(())
}

/// Selection from `--selection`, `--selection-file`, or stdin.
fn read_selection(args: &SelectionArgs) -> Result<String> {
    if let Some(text) = &args.selection {
        return Ok(text.clone());
    }
    if let Some(path) = &args.selection_file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read selection file: {}", path.display()));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read selection from stdin")?;
    Ok(buf)
}

async fn cmd_ask(settings_path: &Path, question: &str, selection: &str, json: bool) -> Result<()> {
    let settings = Settings::load(Some(settings_path)).map_err(|e| anyhow::anyhow!(e))?;
    let service = service_from_settings(&settings).context("Failed to create HTTP client")?;

    let response = service
        .ask(question, selection)
        .await
        .map_err(|e| anyhow::anyhow!(e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_response(&response);
    }

    Ok(())
}

fn print_response(response: &AskResponse) {
    let line = |name: &str, outcome: &Option<ProviderOutcome>| match outcome {
        Some(outcome) => println!("{name:<8} {}", outcome.display_text()),
        None => println!("{name:<8} (not configured)"),
    };
    line("OpenAI", &response.openai_answer);
    line("Gemini", &response.gemini_answer);

    if response.options.is_empty() {
        println!("\nNo structured options detected.");
    } else {
        println!("\nOptions:");
        for (i, option) in response.options.iter().enumerate() {
            println!("  {}. {}", i + 1, option);
        }
    }
}

fn cmd_options(question: &str, selection: &str, show_prompt: bool) {
    let options = extract_options(selection);

    if options.is_empty() {
        println!("No structured options detected.");
    } else {
        for (i, option) in options.iter().enumerate() {
            println!("{}. {}", i + 1, option);
        }
    }

    if show_prompt {
        println!("\n{}", build_prompt(question, &options));
    }
}

fn cmd_settings_show(path: &Path) -> Result<()> {
    let settings = Settings::load(Some(path)).map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(
        file = %path.display(),
        exists = path.exists(),
        "Effective settings"
    );
    println!("{}", serde_json::to_string_pretty(&settings.redacted())?);
    Ok(())
}
