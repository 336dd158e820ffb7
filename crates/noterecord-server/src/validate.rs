//! Offline consistency check of a stored document (`noterecord validate`).
//!
//! Reads the file directly instead of opening a store, so an unreadable
//! document is reported rather than moved aside.

use std::path::{Path, PathBuf};

use noterecord_core::DataPaths;
use noterecord_store::{Document, STORAGE_VERSION};

/// Result of a validation run.
#[derive(Debug)]
pub struct ValidationReport {
    pub path: PathBuf,
    pub found: bool,
    pub version: Option<u32>,
    pub categories: usize,
    pub notes: usize,
    pub pinned_notes: usize,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.found && self.errors.is_empty()
    }
}

/// Validate the document stored under `data_dir`.
pub fn validate(data_dir: &Path) -> ValidationReport {
    let path = DataPaths::existing(data_dir).notes_file;
    let mut report = ValidationReport {
        path: path.clone(),
        found: false,
        version: None,
        categories: 0,
        notes: 0,
        pinned_notes: 0,
        errors: Vec::new(),
    };

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            report
                .errors
                .push(format!("Document not readable: {}: {}", path.display(), e));
            return report;
        }
    };
    report.found = true;

    let document: Document = match serde_json::from_str(&raw) {
        Ok(doc) => doc,
        Err(e) => {
            report.errors.push(format!("Document is not valid JSON: {}", e));
            return report;
        }
    };

    report.version = Some(document.version);
    if document.version != STORAGE_VERSION {
        report.errors.push(format!(
            "Unsupported version {} (expected {})",
            document.version, STORAGE_VERSION
        ));
    }

    report.categories = document.categories.len();
    report.notes = document.notes.len();
    report.pinned_notes = document.notes.iter().filter(|n| n.pinned).count();
    report.errors.extend(document.integrity_issues());

    report
}

pub fn print_report(report: &ValidationReport) {
    println!("=== Note Record Validation Report ===");
    println!();
    println!("Document:           {}", report.path.display());
    println!("Found:              {}", if report.found { "YES" } else { "NO" });
    match report.version {
        Some(v) => println!("Version:            {}", v),
        None => println!("Version:            unknown"),
    }
    println!("Categories:         {}", report.categories);
    println!("Notes:              {}", report.notes);
    println!("Pinned notes:       {}", report.pinned_notes);

    if !report.errors.is_empty() {
        println!();
        println!("Errors:");
        for e in &report.errors {
            println!("  - {}", e);
        }
    }

    println!();
    if report.is_valid() {
        println!("Status: OK");
    } else {
        println!("Status: INVALID");
    }
}
