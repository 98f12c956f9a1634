//! GDM Screen
//!
//! Command line front end for the screening services.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use gdm_screen::app::HealthSummary;
use gdm_screen::config;
use gdm_screen::core::recommendations::Assessment;
use gdm_screen::core::report::Report;
use gdm_screen::core::upload::SelectedFile;
use gdm_screen::logging;
use gdm_screen::models::{ClinicalField, ServiceHealth};
use gdm_screen::ui;
use gdm_screen::workflow::{
    ChatEvent, ChatSession, ClinicalEvent, ClinicalWorkflow, ConsoleNotifier, EcgEvent,
    EcgWorkflow,
};
use gdm_screen::App;

#[derive(Parser)]
#[command(name = "gdm-screen", about = "Gestational diabetes risk screening client")]
struct Cli {
    /// Configuration file stem, loaded after `config/default`.
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clinical risk assessment from the fifteen form fields.
    Predict {
        /// `field=value`, by wire name or snake case name. Repeatable.
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
        /// JSON object of field values, applied before `--set`.
        #[arg(long)]
        input: Option<PathBuf>,
        /// Write the text report after the result.
        #[arg(long)]
        report: bool,
    },
    /// ECG image assessment.
    Ecg {
        path: PathBuf,
        #[arg(long)]
        report: bool,
    },
    /// Talk to the GDM assistant. Interactive unless `--message` is given.
    Chat {
        #[arg(long)]
        message: Option<String>,
    },
    /// Probe all three services.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(stem) => config::load_from(&["config/default".to_string(), stem.clone()]),
        None => config::load_config(),
    }
    .context("Failed to load configuration")?;
    logging::init(&config.log);

    let app = App::from_config(config, Arc::new(ConsoleNotifier))
        .context("Failed to set up service clients")?;

    match cli.command {
        Commands::Predict { set, input, report } => {
            predict(&app, &set, input.as_deref(), report).await
        }
        Commands::Ecg { path, report } => ecg(&app, &path, report).await,
        Commands::Chat { message } => chat(&app, message).await,
        Commands::Health => {
            print_health(&app.probe_all().await);
            Ok(())
        }
    }
}

fn parse_assignment(raw: &str) -> Result<(ClinicalField, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected FIELD=VALUE, got {:?}", raw))?;
    let field = key
        .trim()
        .parse::<ClinicalField>()
        .map_err(|e| anyhow!("{}", e))?;
    Ok((field, value.trim().to_string()))
}

async fn read_input_file(path: &Path) -> Result<Vec<(ClinicalField, String)>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a JSON object", path.display()))?;

    object
        .into_iter()
        .map(|(key, value)| {
            let field = ClinicalField::from_key(&key)
                .ok_or_else(|| anyhow!("Unknown field {:?} in {}", key, path.display()))?;
            let value = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            Ok((field, value))
        })
        .collect()
}

async fn predict(app: &App, set: &[String], input: Option<&Path>, report: bool) -> Result<()> {
    let mut assignments = match input {
        Some(path) => read_input_file(path).await?,
        None => Vec::new(),
    };
    for raw in set {
        assignments.push(parse_assignment(raw)?);
    }

    let mut workflow = ClinicalWorkflow::new();
    for (field, value) in assignments {
        debug!(field = %field, "Setting field");
        app.drive_clinical(&mut workflow, ClinicalEvent::FieldChanged(field, value))
            .await;
    }
    app.drive_clinical(&mut workflow, ClinicalEvent::Submit).await;

    let Some(result) = workflow.result() else {
        if !workflow.errors().is_empty() {
            print!("{}", ui::render_clinical_form(&workflow));
        }
        bail!("No prediction was produced");
    };
    print!("{}", ui::render_result(Assessment::Clinical, result));

    if report {
        if let Some(report) = workflow.report() {
            write_report(app, &report).await?;
        }
    }
    Ok(())
}

async fn ecg(app: &App, path: &Path, report: bool) -> Result<()> {
    let file = SelectedFile::load(path).await?;

    let mut workflow = EcgWorkflow::new();
    app.drive_ecg(&mut workflow, EcgEvent::FileSelected(file)).await;
    print!("{}", ui::render_ecg_upload(&workflow));
    if let Some(error) = workflow.error() {
        bail!("{}", error);
    }

    app.drive_ecg(&mut workflow, EcgEvent::Submit).await;
    let Some(result) = workflow.result() else {
        bail!("No ECG prediction was produced");
    };
    print!("{}", ui::render_result(Assessment::Ecg, result));

    if report {
        if let Some(report) = workflow.report() {
            write_report(app, &report).await?;
        }
    }
    Ok(())
}

async fn write_report(app: &App, report: &Report) -> Result<()> {
    eprintln!("Generating report...");
    let path = app.export_report(report).await?;
    println!("Report saved to {}", path.display());
    Ok(())
}

async fn ask(app: &App, session: &mut ChatSession, text: String) {
    let before = session.transcript().len();
    app.drive_chat(session, ChatEvent::InputChanged(text)).await;
    app.drive_chat(session, ChatEvent::Submit).await;

    // The user's own line is already on screen.
    for message in session.transcript().iter().skip(before + 1) {
        let label = match message.source {
            Some(gdm_screen::models::ChatSource::Web) => "assistant [Web information]",
            _ => "assistant",
        };
        println!("{}> {}", label, message.content);
    }
}

async fn chat(app: &App, message: Option<String>) -> Result<()> {
    let mut session = ChatSession::new();
    app.drive_chat(&mut session, ChatEvent::Open).await;

    if let Some(message) = message {
        if session.is_offline() {
            bail!("{}", gdm_screen::workflow::chat::OFFLINE_WARNING);
        }
        ask(app, &mut session, message).await;
        return Ok(());
    }

    print!("{}", ui::render_chat(&session));
    if session.is_offline() {
        return Ok(());
    }

    info!("Chat session started");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if matches!(line.trim(), "/quit" | "/exit") {
            break;
        }
        ask(app, &mut session, line).await;
    }
    app.drive_chat(&mut session, ChatEvent::Close).await;
    Ok(())
}

fn health_cell(health: &ServiceHealth) -> &'static str {
    match (health.is_healthy, health.api_available) {
        (false, _) => "offline",
        (true, true) => "healthy",
        (true, false) => "healthy (degraded)",
    }
}

fn print_health(summary: &HealthSummary) {
    println!("{:<20} STATUS", "SERVICE");
    for (name, health) in [
        ("clinical prediction", &summary.clinical),
        ("ECG prediction", &summary.ecg),
        ("chatbot", &summary.chat),
    ] {
        println!("{:<20} {}", name, health_cell(health));
    }
}
