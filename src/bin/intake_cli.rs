//! Registration intake CLI
//!
//! Plays the UI-layer role over a JSON-file record store: collects field
//! values, runs them through the validation engine and the simulated
//! submission pipeline, and renders the outcome.
//!
//! # Usage
//!
//! ```bash
//! # Register a cricket player
//! intake_cli register --form cricket \
//!     --set playerName="Rahul Sharma" --set phone=9876543210 \
//!     --set position=batsman --set experience=intermediate \
//!     --set age=25 --set location=Mumbai --set terms=yes --set availability=yes
//!
//! # Inspect and maintain the store
//! intake_cli list --form cricket
//! intake_cli find --form cricket 9876543210
//! intake_cli clear --form cricket
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use reg_intake::{
    forms::position_display_name, phone, Attachment, FormInput, FormVariant, IntakeConfig,
    JsonFileStore, Outcome, RecordStore, SubmissionPipeline,
};

#[derive(Parser)]
#[command(name = "intake_cli")]
#[command(version = "0.1.0")]
#[command(about = "Registration intake over a JSON-file record store")]
struct Cli {
    /// Store file path
    #[arg(long, global = true, env = "INTAKE_STORE", default_value = "intake-store.json")]
    store: PathBuf,

    /// Form variant: cricket, signup, or spl
    #[arg(long, global = true, default_value = "cricket")]
    form: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and submit a registration
    Register {
        /// Field values as NAME=VALUE (repeatable)
        #[arg(long = "set", value_name = "NAME=VALUE")]
        set: Vec<String>,

        /// Attach an image file to the "photo" field
        #[arg(long)]
        photo: Option<PathBuf>,
    },

    /// List every record in the form's partition
    List,

    /// Find a record by phone number
    Find {
        /// Phone number in any common format
        phone: String,
    },

    /// Remove every record in the form's partition
    Clear,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let variant = parse_variant(&cli.form)?;
    let store = Arc::new(
        JsonFileStore::open(&cli.store)
            .await
            .with_context(|| format!("opening store {}", cli.store.display()))?,
    );

    match cli.command {
        Commands::Register { set, photo } => cmd_register(variant, store, set, photo).await,
        Commands::List => cmd_list(variant, store).await,
        Commands::Find { phone } => cmd_find(variant, store, &phone).await,
        Commands::Clear => cmd_clear(variant, store).await,
    }
}

fn parse_variant(name: &str) -> Result<FormVariant> {
    match name {
        "cricket" => Ok(FormVariant::CricketAuction),
        "signup" => Ok(FormVariant::UserSignup),
        "spl" => Ok(FormVariant::SplPlayer),
        other => bail!("unknown form variant '{other}' (expected cricket, signup, or spl)"),
    }
}

async fn cmd_register(
    variant: FormVariant,
    store: Arc<dyn RecordStore>,
    set: Vec<String>,
    photo: Option<PathBuf>,
) -> Result<()> {
    let mut input = FormInput::new();
    for pair in &set {
        let (name, value) = pair
            .split_once('=')
            .ok_or_else(|| anyhow!("expected NAME=VALUE, got '{pair}'"))?;
        input.set(name, value);
    }
    if let Some(path) = photo {
        let attachment = Attachment::from_path(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        input.attach("photo", attachment);
    }

    let config = IntakeConfig::from_env()?;
    let pipeline = SubmissionPipeline::new(variant.spec(), store, config);

    println!("Submitting registration...");
    match pipeline.submit(&input).await? {
        Outcome::Rejected(report) => {
            println!("{}", "Registration rejected:".red().bold());
            for (field, result) in report.failures() {
                let message = result.message.as_deref().unwrap_or("invalid");
                println!("  {} {}: {}", "✗".red(), field, message);
            }
        }
        Outcome::DuplicateFound(existing) => {
            println!("{}", "Already registered:".yellow().bold());
            if let Some(name) = existing.field(variant.name_field()) {
                println!("  Name:       {name}");
            }
            if let Some(position) = existing.field("position") {
                println!("  Position:   {}", position_display_name(position));
            }
            println!("  Registered: {}", existing.submitted_at.format("%Y-%m-%d"));
            println!("  Id:         {}", existing.id);
        }
        Outcome::Succeeded(record) => {
            println!("{}", "Registration confirmed!".green().bold());
            if let Some(name) = record.field(variant.name_field()) {
                println!("  Name:  {name}");
            }
            if let Some(raw) = record.field(variant.unique_key_field()) {
                println!("  Phone: {}", phone::format_display(raw));
            }
            println!("  Id:    {}", record.id.bold());
        }
        Outcome::Failed { message } => {
            println!("{} {message}", "Registration failed:".red().bold());
        }
    }
    Ok(())
}

async fn cmd_list(variant: FormVariant, store: Arc<dyn RecordStore>) -> Result<()> {
    let records = store.get_all(variant.partition()).await?;
    if records.is_empty() {
        println!("No registrations in '{}'.", variant.partition());
        return Ok(());
    }
    println!("Registrations in '{}':", variant.partition());
    for (index, record) in records.iter().enumerate() {
        let name = record.field(variant.name_field()).unwrap_or("<unnamed>");
        let contact = record
            .field(variant.unique_key_field())
            .map(phone::format_display)
            .unwrap_or_default();
        match record.field("position") {
            Some(position) => println!(
                "{}. {} ({}) - {}",
                index + 1,
                name,
                position_display_name(position),
                contact
            ),
            None => println!("{}. {} - {}", index + 1, name, contact),
        }
    }
    Ok(())
}

async fn cmd_find(variant: FormVariant, store: Arc<dyn RecordStore>, raw: &str) -> Result<()> {
    let key = phone::canonical_key(raw);
    match store.find_by_key(variant.partition(), &key).await? {
        Some(record) => {
            let name = record.field(variant.name_field()).unwrap_or("<unnamed>");
            match record.field("position") {
                Some(position) => println!(
                    "{} {name} ({})",
                    "Found:".green().bold(),
                    position_display_name(position)
                ),
                None => println!("{} {name}", "Found:".green().bold()),
            }
            println!("  Id:         {}", record.id);
            println!("  Registered: {}", record.submitted_at.format("%Y-%m-%d"));
        }
        None => println!(
            "No registration found for this phone number. Please check and try again."
        ),
    }
    Ok(())
}

async fn cmd_clear(variant: FormVariant, store: Arc<dyn RecordStore>) -> Result<()> {
    store.clear(variant.partition()).await?;
    println!("Cleared all registrations in '{}'.", variant.partition());
    Ok(())
}
