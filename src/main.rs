//! CLI for cite-remap - Remap LaTeX citation keys onto a new BibTeX bibliography.

use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use cite_remap::{load_bibliography, remap_document};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

/// Remap LaTeX citation keys onto a new BibTeX bibliography
#[derive(Parser)]
#[command(name = "cite-remap")]
#[command(version)]
#[command(after_help = "\
Examples:
  cite-remap
  cite-remap --tex paper.tex --old-bib refs_old.bib --new-bib refs_new.bib -o paper_updated.tex
  cite-remap --report
  cite-remap --report-json remap_report.json

With no arguments, reads main.tex, old.bib and new.bib from the current
directory and writes main_updated.tex. Keys are matched by DOI (explicit
doi field, or one recovered from a url field) and by normalized title;
keys that match neither are left unchanged.")]
struct Cli {
    /// LaTeX document whose citation keys should be rewritten
    #[arg(long, default_value = "main.tex")]
    tex: PathBuf,

    /// Bibliography the document's keys currently refer to
    #[arg(long, default_value = "old.bib")]
    old_bib: PathBuf,

    /// Bibliography the keys should be remapped onto
    #[arg(long, default_value = "new.bib")]
    new_bib: PathBuf,

    /// Output file (overwritten without confirmation)
    #[arg(short, long, default_value = "main_updated.tex")]
    output: PathBuf,

    /// List unresolved citation keys on stderr
    #[arg(long)]
    report: bool,

    /// Write a JSON report of the remapping to this file
    #[arg(long, value_name = "FILE")]
    report_json: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// AppError — semantic exit codes
// ---------------------------------------------------------------------------

enum AppError {
    /// Exit 10 — input document not found / unreadable
    InputFile(String),
    /// Exit 11 — bibliography file not found / unreadable
    BibFile(String),
    /// Exit 15 — cannot write output or report file
    OutputFile(String),
}

impl AppError {
    fn exit_code(&self) -> i32 {
        match self {
            AppError::InputFile(_) => 10,
            AppError::BibFile(_) => 11,
            AppError::OutputFile(_) => 15,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InputFile(msg) => {
                write!(f, "{}\n  hint: verify the file path is correct", msg)
            }
            AppError::BibFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: both the old and the new BibTeX bibliography must exist",
                    msg
                )
            }
            AppError::OutputFile(msg) => {
                write!(
                    f,
                    "{}\n  hint: check that the output directory exists and is writable",
                    msg
                )
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    // 1. Read the LaTeX document
    let tex = fs::read_to_string(&cli.tex)
        .map_err(|e| AppError::InputFile(format!("'{}': {}", cli.tex.display(), e)))?;

    // 2. Load both bibliographies
    let old_bib = load_bibliography(&cli.old_bib)
        .map_err(|e| AppError::BibFile(format!("'{}': {}", cli.old_bib.display(), e)))?;
    let new_bib = load_bibliography(&cli.new_bib)
        .map_err(|e| AppError::BibFile(format!("'{}': {}", cli.new_bib.display(), e)))?;

    // 3. Remap: parse -> index -> match -> substitute
    let outcome = remap_document(&tex, &old_bib, &new_bib);

    // 4. Write the rewritten document
    fs::write(&cli.output, &outcome.text)
        .map_err(|e| AppError::OutputFile(format!("'{}': {}", cli.output.display(), e)))?;
    println!("Updated LaTeX saved to: {}", cli.output.display());

    // 5. Optional reports; unresolved keys are otherwise passed through silently
    if cli.report {
        if outcome.unresolved.is_empty() {
            eprintln!("remapped {} citation key(s), none unresolved", outcome.mapping.len());
        } else {
            eprintln!(
                "remapped {} citation key(s), {} unresolved:",
                outcome.mapping.len(),
                outcome.unresolved.len()
            );
            for key in &outcome.unresolved {
                eprintln!("  {}", key);
            }
        }
    }

    if let Some(report_path) = &cli.report_json {
        let json = serde_json::to_string_pretty(&outcome.report())
            .map_err(|e| AppError::OutputFile(format!("'{}': {}", report_path.display(), e)))?;
        fs::write(report_path, json)
            .map_err(|e| AppError::OutputFile(format!("'{}': {}", report_path.display(), e)))?;
    }

    Ok(())
}
