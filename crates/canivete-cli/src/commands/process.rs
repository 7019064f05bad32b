//! Process command - turn a batch of NF-e XML files into a stored report.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use canivete_core::directory::{AccessDirectory, FileAccessDirectory, Role};
use canivete_core::error::PipelineError;
use canivete_core::nfe::format_brl_amount;
use canivete_core::pipeline::{process_batch, ProcessedBatch};
use canivete_core::store::{FsReportStore, ReportStore};

use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input XML files or glob patterns
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Client username that owns the generated report
    #[arg(short, long)]
    user: String,

    /// Also write a copy of the spreadsheet to this path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a per-file status summary CSV to this path
    #[arg(long)]
    summary: Option<PathBuf>,
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    // The owner must be an existing client identity
    let directory = FileAccessDirectory::new(&config.directory.users_file);
    match directory.lookup(&args.user)? {
        Some(identity) if identity.role == Role::Client => {
            debug!(user = %args.user, "processing upload for client");
        }
        Some(_) => anyhow::bail!("'{}' is not a client account", args.user),
        None => anyhow::bail!("unknown client '{}'", args.user),
    }

    // Expand glob patterns to NF-e XML files
    let mut paths: Vec<PathBuf> = Vec::new();
    for pattern in &args.inputs {
        for entry in glob(pattern)? {
            let path = entry?;
            let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
            if ext.eq_ignore_ascii_case("xml") {
                paths.push(path);
            }
        }
    }
    paths.sort();
    paths.dedup();

    if paths.is_empty() {
        anyhow::bail!("no XML files matched: {}", args.inputs.join(", "));
    }

    println!(
        "{} Found {} XML files to process",
        style("ℹ").blue(),
        paths.len()
    );

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("nota.xml")
            .to_string();
        files.push((name, fs::read(path)?));
        pb.inc(1);
    }
    pb.finish_with_message("Read");

    let timestamp = chrono::Local::now().naive_local();
    let processed = match process_batch(files, timestamp) {
        Ok(processed) => processed,
        Err(PipelineError::NoDataExtracted) => {
            println!(
                "{} No invoice data could be extracted. Check that the files are NF-e XML documents.",
                style("⚠").yellow()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    print_report(&processed);

    // Persist under the client's namespace
    let store = FsReportStore::new(&config.storage.root);
    let artifact = store.save(&args.user, &processed.spreadsheet, timestamp)?;
    println!(
        "{} Report saved as {} for client {}",
        style("✓").green(),
        style(&artifact.name).bold(),
        args.user
    );

    if let Some(output) = &args.output {
        fs::write(output, &processed.spreadsheet)?;
        println!(
            "{} Spreadsheet copy written to {}",
            style("✓").green(),
            output.display()
        );
    }

    if let Some(summary) = &args.summary {
        write_summary(summary, &processed)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary.display()
        );
    }

    info!("processed batch in {:?}", start.elapsed());
    Ok(())
}

fn print_report(processed: &ProcessedBatch) {
    println!();
    println!(
        "{} {} invoices processed",
        style("✓").green(),
        processed.report.len()
    );
    println!(
        "  {:<12} {:<12} {:<30} {:<16} {:>16}",
        style("Número").bold(),
        style("Emissão").bold(),
        style("Cliente").bold(),
        style("CNPJ/CPF").bold(),
        style("Valor").bold()
    );

    for record in &processed.report.records {
        let date = record
            .issue_date
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<12} {:<12} {:<30} {:<16} {:>16}",
            record.number,
            date,
            record.customer_name,
            record.tax_id,
            format_brl_amount(record.total_value)
        );
    }

    println!(
        "  {} {}",
        style("TOTAL FATURADO:").bold(),
        style(format_brl_amount(processed.report.total_faturado)).bold()
    );

    if !processed.failures.is_empty() {
        println!();
        println!("{}", style("Files skipped:").yellow());
        for failure in &processed.failures {
            println!("  - {}", failure);
        }
    }
}

fn write_summary(path: &PathBuf, processed: &ProcessedBatch) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "invoice_number",
        "issue_date",
        "tax_id",
        "total_value",
        "error",
    ])?;

    for record in &processed.report.records {
        wtr.write_record([
            record.source_file.as_str(),
            "success",
            record.number.as_str(),
            &record
                .issue_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            record.tax_id.as_str(),
            &record.total_value.to_string(),
            "",
        ])?;
    }

    for failure in &processed.failures {
        wtr.write_record([
            failure.file(),
            "error",
            "",
            "",
            "",
            "",
            &failure.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
