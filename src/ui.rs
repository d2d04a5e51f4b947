// UI layer: interactive menu built on `dialoguer`. Each flow collects its
// fields, calls the `RecordService` and prints what came back. A failed
// call is reported and the menu keeps running.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::{DeleteStatus, RecordService, ServiceResponse, UpdateStatus};
use crate::config::BulkConfig;
use crate::errors::ClientError;
use crate::source;
use crate::summary::summarize;
use crate::types::{FailureKind, Outcome, Record};
use crate::upload::{BatchUploader, Progress};

const MENU: [&str; 8] = [
    "Create record (POST)",
    "List all records (GET)",
    "Find record by id (GET)",
    "Update record (PUT)",
    "Delete record (DELETE)",
    "Fill database with sample data",
    "Load records from file",
    "Exit",
];

/// Main interactive menu. Runs until the user picks "Exit".
pub fn main_menu<S: RecordService>(service: &S, bulk: &BulkConfig) -> Result<()> {
    loop {
        let selection = Select::new()
            .with_prompt("Choose an option")
            .items(&MENU[..])
            .default(0)
            .interact()?;
        match selection {
            0 => handle_create(service)?,
            1 => handle_list(service)?,
            2 => handle_get(service)?,
            3 => handle_update(service)?,
            4 => handle_delete(service)?,
            5 => handle_sample_data(service, bulk)?,
            6 => handle_load_file(service, bulk)?,
            _ => {
                println!("Goodbye!");
                break;
            }
        }
        println!("\n{}\n", "=".repeat(50));
    }
    Ok(())
}

/// Run a single request behind a spinner.
fn with_spinner<T>(message: &'static str, call: impl FnOnce() -> T) -> Result<T> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    let value = call();
    spinner.finish_and_clear();
    Ok(value)
}

/// Pretty-print JSON bodies, pass anything else through.
fn render_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| body.to_string())
}

fn print_response(res: &ServiceResponse) {
    println!("Status: {}", res.status);
    println!("Response: {}", render_body(&res.body));
}

fn prompt_text(prompt: &str) -> Result<String> {
    Ok(Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?)
}

fn prompt_record_fields(owner: String, title_prompt: &str, artist_prompt: &str, year_prompt: &str) -> Result<Record> {
    let title = prompt_text(title_prompt)?;
    let artist = prompt_text(artist_prompt)?;
    let year: i32 = Input::new().with_prompt(year_prompt).interact_text()?;
    Ok(Record {
        owner,
        title,
        artist,
        year,
    })
}

fn prompt_id() -> Result<i64> {
    Ok(Input::new().with_prompt("Record id").interact_text()?)
}

fn handle_create<S: RecordService>(service: &S) -> Result<()> {
    println!("=== Create record ===");
    let owner = prompt_text("Owner")?;
    let record = prompt_record_fields(owner, "Title", "Artist", "Year")?;

    match with_spinner("Creating...", || service.create(&record))? {
        Ok(res) => print_response(&res),
        Err(e) => println!("Create failed: {}", e),
    }
    Ok(())
}

fn handle_list<S: RecordService>(service: &S) -> Result<()> {
    println!("=== All records ===");
    match with_spinner("Fetching...", || service.list())? {
        Ok(res) => print_response(&res),
        Err(e) => println!("Fetch failed: {}", e),
    }
    Ok(())
}

fn handle_get<S: RecordService>(service: &S) -> Result<()> {
    println!("=== Find record by id ===");
    let id = prompt_id()?;
    match with_spinner("Fetching...", || service.get(id))? {
        Ok(res) => print_response(&res),
        Err(e) => println!("Fetch failed: {}", e),
    }
    Ok(())
}

fn handle_update<S: RecordService>(service: &S) -> Result<()> {
    println!("=== Update record ===");
    let id = prompt_id()?;
    let owner = prompt_text("Owner (must match the original owner)")?;
    let record = prompt_record_fields(owner.clone(), "New title", "New artist", "New year")?;

    match with_spinner("Updating...", || service.update(id, &record, &owner))? {
        Ok(res) => {
            print_response(&res);
            match UpdateStatus::from(res.status) {
                UpdateStatus::Updated => println!("Record updated."),
                UpdateStatus::NotFound => println!("Record not found."),
                UpdateStatus::Forbidden => println!("Only the owner may update this record."),
                UpdateStatus::Unexpected(status) => println!("Unexpected status: {}", status),
            }
        }
        Err(e) => println!("Update failed: {}", e),
    }
    Ok(())
}

fn handle_delete<S: RecordService>(service: &S) -> Result<()> {
    println!("=== Delete record ===");
    let id = prompt_id()?;
    let owner = prompt_text("Owner (for authorization)")?;

    match with_spinner("Deleting...", || service.delete(id, &owner))? {
        Ok(res) => {
            print_response(&res);
            match DeleteStatus::from(res.status) {
                DeleteStatus::Deleted => println!("Record deleted."),
                DeleteStatus::NotFound => println!("Record not found."),
                DeleteStatus::Forbidden => println!("Only the owner may delete this record."),
                DeleteStatus::Unexpected(status) => println!("Unexpected status: {}", status),
            }
        }
        Err(e) => println!("Delete failed: {}", e),
    }
    Ok(())
}

fn handle_sample_data<S: RecordService>(service: &S, bulk: &BulkConfig) -> Result<()> {
    println!("=== Fill database with sample data ===");
    run_batch(service, bulk, &source::sample_records())
}

fn handle_load_file<S: RecordService>(service: &S, bulk: &BulkConfig) -> Result<()> {
    println!("=== Load records from file ===");

    let files = match source::discover(&bulk.data_dir) {
        Ok(files) => files,
        Err(e) => {
            println!("{}", e);
            if matches!(e, ClientError::SourceNotFound(_)) {
                println!("Place a csv file in '{}' with this format:", bulk.data_dir.display());
                println!("owner,title,artist,year");
                println!("\"Max\",\"The Dark Side of the Moon\",\"Pink Floyd\",1973");
            }
            return Ok(());
        }
    };

    let names: Vec<String> = files.iter().map(|p| file_name(p)).collect();
    let choice = Select::new()
        .with_prompt("Choose a file")
        .items(&names)
        .default(0)
        .interact()?;
    let path = &files[choice];

    let parsed = match source::load_file(path) {
        Ok(parsed) => parsed,
        Err(e) => {
            println!("Failed to load file: {}", e);
            return Ok(());
        }
    };

    for warning in &parsed.warnings {
        println!("Warning: {}", warning);
    }
    if parsed.records.is_empty() {
        println!("No valid records found in the file.");
        return Ok(());
    }

    println!("{} records loaded from '{}'.", parsed.records.len(), file_name(path));
    run_batch(service, bulk, &parsed.records)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Upload a batch with a progress bar, one line per record, then the report.
fn run_batch<S: RecordService>(service: &S, bulk: &BulkConfig, records: &[Record]) -> Result<()> {
    println!("Adding {} records...\n", records.len());

    let bar = ProgressBar::new(records.len() as u64);
    bar.set_style(ProgressStyle::with_template("{bar:40} {pos}/{len}")?);

    let mut stdout = io::stdout();
    let outcomes = BatchUploader::new(service)
        .with_pacing(bulk.pacing)
        .upload_with(records, |progress| report_progress(&mut stdout, &bar, progress));
    bar.finish_and_clear();

    println!("\n{}", summarize(&outcomes));
    Ok(())
}

/// Write one per-record line to `out` (stdout, next to the report) with
/// the bar cleared, then advance the bar.
fn report_progress<W: Write>(out: &mut W, bar: &ProgressBar, progress: &Progress<'_>) {
    bar.suspend(|| {
        if let Err(e) = writeln!(out, "{}", describe_progress(progress)) {
            tracing::warn!(error = %e, "could not write progress line");
        }
    });
    bar.inc(1);
}

fn describe_progress(p: &Progress<'_>) -> String {
    let r = p.record;
    match p.outcome {
        Outcome::Success { .. } => format!(
            "✓ {}/{} - {} by {} (owner: {})",
            p.position, p.total, r.title, r.artist, r.owner
        ),
        Outcome::Failure {
            kind: FailureKind::Status(_),
            detail,
        } => format!(
            "✗ {}/{} - failed to add {}: status {}",
            p.position, p.total, r.title, detail
        ),
        Outcome::Failure {
            kind: FailureKind::Transport,
            detail,
        } => format!(
            "✗ {}/{} - error adding {}: {}",
            p.position, p.total, r.title, detail
        ),
    }
}
