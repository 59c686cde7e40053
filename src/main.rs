//! HACCP Desk CLI
//!
//! The application's views as subcommands, working directly on the local
//! store:
//! - Dashboard and log listing
//! - Temperature capture with a signature
//! - Label and monthly report PDFs
//! - Settings

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate, Utc};
use clap::{ArgGroup, Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use haccp_desk::capture::{
    CaptureDeps, ClientPoint, HttpWebhook, SubmitReceipt, SurfaceGeometry, TemperatureCapture,
    WebhookDelivery,
};
use haccp_desk::config::{generate_default_config, Config};
use haccp_desk::dashboard::DashboardSummary;
use haccp_desk::documents::{LabelSpec, MonthlyReport, RenderedDocument, ReportError};
use haccp_desk::prompt::{Prompter, TerminalPrompter};
use haccp_desk::settings_editor::SettingsEditor;
use haccp_desk::storage::{
    FileKvStore, KeyValueStore, LogStore, Settings, SettingsStore, SignatureImage,
};

#[derive(Parser)]
#[command(name = "haccp-desk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "HACCP temperature logbook, labels and monthly reports")]
#[command(long_about = "HACCP Desk keeps the daily fridge temperature log of a small kitchen.\nRecord signed readings, print 60x40 mm labels and export the monthly register as PDF.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory, overrides the configuration
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the entry counter and recent activity
    Dashboard,

    /// List daily logs, most recent first
    Logs {
        /// Show at most this many entries
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Record today's temperatures
    #[command(group(ArgGroup::new("signature").args(["signature_strokes", "signature_image"])))]
    Temperature {
        /// Reading as FRIDGE_ID=VALUE (repeatable); a decimal comma is accepted
        #[arg(short, long = "reading", value_name = "ID=VALUE")]
        readings: Vec<String>,

        /// JSON file of strokes drawn on the signature surface
        #[arg(long, value_name = "FILE")]
        signature_strokes: Option<PathBuf>,

        /// PNG or JPEG signature image
        #[arg(long, value_name = "FILE")]
        signature_image: Option<PathBuf>,
    },

    /// Print a 60x40 mm label
    #[command(group(ArgGroup::new("kind").required(true).args(["ingredient", "preparation"])))]
    Label {
        /// Single ingredient name
        #[arg(long)]
        ingredient: Option<String>,

        /// Preparation name
        #[arg(long, requires = "ingredients")]
        preparation: Option<String>,

        /// Ingredients and allergens of the preparation
        #[arg(long)]
        ingredients: Option<String>,

        /// Preparation date, YYYY-MM-DD (default: today)
        #[arg(long)]
        prep_date: Option<NaiveDate>,

        /// Expiry date, YYYY-MM-DD (default: preparation date + 3 days)
        #[arg(long)]
        expiry_date: Option<NaiveDate>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Export this month's register as PDF
    Report {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show current settings
    Show,

    /// Add a fridge
    AddFridge {
        /// Display name
        name: String,
    },

    /// Remove a fridge (asks for confirmation)
    RemoveFridge {
        /// Fridge id, as shown by `settings show`
        id: String,
    },

    /// Set the webhook URL; an empty string disables it.
    ///
    /// Each submission is sent once as a plain-text JSON body. The endpoint's
    /// answer is not read, so a rejected request looks the same as a
    /// delivered one.
    SetWebhook {
        url: String,
    },

    /// Set the company details printed on reports
    SetCompany {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        /// VAT number (partita IVA)
        #[arg(long)]
        vat: Option<String>,
    },
}

/// Signature strokes replayed through the signature surface
#[derive(Debug, Deserialize)]
struct StrokesFile {
    /// On-screen box of the surface the strokes were drawn on
    #[serde(default = "default_geometry")]
    geometry: SurfaceGeometry,
    /// Points in client coordinates
    strokes: Vec<Vec<[f64; 2]>>,
}

fn default_geometry() -> SurfaceGeometry {
    SurfaceGeometry::at(0.0, 0.0)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.storage.data_dir = dir.to_string_lossy().to_string();
    }
    haccp_desk::telemetry::init(&config.logging);

    let prompter = TerminalPrompter::new(cli.yes);

    match cli.command {
        Commands::Dashboard => {
            let (_, logs) = open_stores(&config)?;
            let summary = DashboardSummary::from_logs(&logs.load().await);

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&summary)?);
                return Ok(());
            }

            println!("Total entries: {}", summary.total_entries);
            match summary.last_capture {
                Some(at) => println!(
                    "Last capture: {}",
                    at.with_timezone(&Local).format("%d/%m/%Y %H:%M")
                ),
                None => println!("Last capture: never"),
            }
            println!();
            println!("Recent activity:");
            if summary.recent.is_empty() {
                println!("  No entries yet.");
            }
            for entry in &summary.recent {
                println!("  {:<32} {} fridges checked", entry.date_label, entry.fridges_checked);
            }
        }

        Commands::Logs { limit } => {
            let (_, logs) = open_stores(&config)?;
            let mut logs = logs.load().await;
            if let Some(limit) = limit {
                logs.truncate(limit);
            }

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&logs)?);
                return Ok(());
            }

            if logs.is_empty() {
                println!("No entries yet.");
                println!();
                println!("Record the first one with:");
                println!("  haccp-desk temperature --reading 1=3.5 --signature-image firma.png");
            }
            for log in &logs {
                println!("{}", log.date.with_timezone(&Local).format("%d/%m/%Y %H:%M"));
                for reading in &log.readings {
                    println!("  {}", reading.label());
                }
            }
        }

        Commands::Temperature {
            readings,
            signature_strokes,
            signature_image,
        } => {
            let (settings, logs) = open_stores(&config)?;
            let current = settings.load().await;
            let mut capture = TemperatureCapture::new(config.capture.success_display());

            for entry in &readings {
                let (id, raw) = entry
                    .split_once('=')
                    .with_context(|| format!("Expected ID=VALUE, got {:?}", entry))?;
                if current.fridge(id).is_none() {
                    prompter.notify(&format!("Unknown fridge id {:?}, ignored", id));
                }
                capture.readings_mut().set(id, raw);
            }

            if let Some(path) = &signature_strokes {
                replay_strokes(&mut capture, path)?;
            }
            if let Some(path) = &signature_image {
                capture.signature_mut().adopt(read_signature_image(path)?);
            }

            let webhook = HttpWebhook::new(config.webhook.timeout())?;
            let deps = CaptureDeps {
                settings: &settings,
                logs: &logs,
                webhook: &webhook,
                prompter: &prompter,
            };

            let receipt = submit_capture(&mut capture, &deps).await?;
            for reading in &receipt.log.readings {
                println!("  {}", reading.label());
            }
            if receipt.delivery == WebhookDelivery::Sent {
                println!("Copy sent to the webhook");
            }
        }

        Commands::Label {
            ingredient,
            preparation,
            ingredients,
            prep_date,
            expiry_date,
            output,
        } => {
            let prep_date = prep_date.unwrap_or_else(|| Local::now().date_naive());
            let mut label = match (ingredient, preparation) {
                (Some(name), _) => LabelSpec::ingredient(name, prep_date),
                (None, Some(name)) => {
                    LabelSpec::preparation(name, ingredients.unwrap_or_default(), prep_date)
                }
                (None, None) => bail!("Pass --ingredient or --preparation"),
            };
            if let Some(expiry) = expiry_date {
                label = label.with_expiry(expiry);
            }

            let document = label.render()?;
            let path = write_document(&output, &document)?;
            println!("Label written to {}", path.display());
        }

        Commands::Report { output } => {
            let (settings, logs) = open_stores(&config)?;
            let logs = logs.load().await;
            let settings = settings.load().await;

            let report = match MonthlyReport::build(&logs, &settings, &Local::now()) {
                Ok(report) => report,
                Err(ReportError::NoEntries { month }) => {
                    prompter.notify(&format!("No entries found for {}", month));
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            };
            for notice in report.notices() {
                prompter.notify(&notice);
            }

            let document = report.render()?;
            let path = write_document(&output, &document)?;
            println!(
                "Report for {} ({} entries) written to {}",
                report.month_label,
                report.rows.len(),
                path.display()
            );
        }

        Commands::Settings { action } => {
            let (settings, _) = open_stores(&config)?;
            let mut editor = SettingsEditor::from_store(&settings).await;

            match action.unwrap_or(SettingsAction::Show) {
                SettingsAction::Show => {
                    if cli.format == "json" {
                        println!("{}", serde_json::to_string_pretty(editor.draft())?);
                    } else {
                        print_settings(editor.draft());
                    }
                    return Ok(());
                }
                SettingsAction::AddFridge { name } => {
                    let fridge = editor.add_fridge(&name, Utc::now())?;
                    println!("Added {} (id {})", fridge.name, fridge.id);
                }
                SettingsAction::RemoveFridge { id } => {
                    if !editor.remove_fridge(&id, &prompter)? {
                        println!("Cancelled");
                        return Ok(());
                    }
                }
                SettingsAction::SetWebhook { url } => editor.set_webhook_url(&url),
                SettingsAction::SetCompany { name, address, vat } => {
                    if let Some(name) = name {
                        editor.set_company_name(&name);
                    }
                    if let Some(address) = address {
                        editor.set_company_address(&address);
                    }
                    if let Some(vat) = vat {
                        editor.set_company_vat(&vat);
                    }
                }
            }

            editor.save(&settings, &prompter).await?;
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn open_stores(config: &Config) -> anyhow::Result<(SettingsStore, LogStore)> {
    let data_dir = config.storage.data_path();
    let kv: Arc<dyn KeyValueStore> = Arc::new(
        FileKvStore::open(&data_dir)
            .with_context(|| format!("Cannot open data directory {}", data_dir.display()))?,
    );
    tracing::debug!(data_dir = %data_dir.display(), "Stores opened");

    Ok((SettingsStore::open(Arc::clone(&kv)), LogStore::open(kv)))
}

/// Submit the capture; the reason has already reached the prompter on failure
async fn submit_capture(
    capture: &mut TemperatureCapture,
    deps: &CaptureDeps<'_>,
) -> anyhow::Result<SubmitReceipt> {
    capture
        .submit(deps, Utc::now())
        .await
        .context("Temperature log not saved")
}

fn replay_strokes(capture: &mut TemperatureCapture, path: &Path) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read strokes file {}", path.display()))?;
    let file: StrokesFile = serde_json::from_str(&content)
        .with_context(|| format!("Invalid strokes file {}", path.display()))?;

    let pad = capture.signature_mut();
    pad.clear();
    for stroke in &file.strokes {
        let mut points = stroke.iter().map(|[x, y]| ClientPoint::new(*x, *y));
        let Some(first) = points.next() else {
            continue;
        };
        pad.pointer_down(first, &file.geometry);
        for point in points {
            pad.pointer_move(point, &file.geometry);
        }
        pad.pointer_up()?;
    }
    Ok(())
}

fn read_signature_image(path: &Path) -> anyhow::Result<SignatureImage> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Cannot read signature image {}", path.display()))?;

    let mime = match image::guess_format(&bytes) {
        Ok(image::ImageFormat::Png) => "image/png",
        Ok(image::ImageFormat::Jpeg) => "image/jpeg",
        _ => bail!("Signature image must be PNG or JPEG: {}", path.display()),
    };
    image::load_from_memory(&bytes)
        .with_context(|| format!("Cannot decode signature image {}", path.display()))?;

    Ok(SignatureImage::from_bytes(mime, &bytes))
}

fn write_document(dir: &Path, document: &RenderedDocument) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&document.filename);
    std::fs::write(&path, &document.bytes)
        .with_context(|| format!("Cannot write {}", path.display()))?;
    Ok(path)
}

fn print_settings(settings: &Settings) {
    println!("{:<16} {}", "Id", "Fridge");
    println!("{}", "-".repeat(40));
    if settings.fridges.is_empty() {
        println!("No fridges configured.");
    }
    for fridge in &settings.fridges {
        println!("{:<16} {}", fridge.id, fridge.name);
    }

    println!();
    println!("Company:  {}", or_dash(&settings.company_name));
    println!("Address:  {}", or_dash(&settings.company_address));
    println!("VAT:      {}", or_dash(&settings.company_vat));

    println!();
    if settings.webhook_enabled() {
        println!("Webhook:  {}", settings.webhook_url);
        println!("          sent once per submission, answers are not checked");
    } else if settings.webhook_url.is_empty() {
        println!("Webhook:  disabled");
    } else {
        println!("Webhook:  {} (ignored: not an http URL)", settings.webhook_url);
    }
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}
