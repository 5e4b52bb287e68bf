//! Patient directory export.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::models::Patient;

const ENTRY_SEPARATOR: &str = "----------------------------------------";

/// Output format for a directory export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Human-readable blocks, one per patient
    #[default]
    Text,
    /// One CSV row per patient
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain; charset=utf-8",
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "txt" | "text" => Ok(ExportFormat::Text),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unsupported export format '{}'", other)),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// One patient line in the directory.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: Option<String>,
}

/// Snapshot of every registered patient, for download.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientDirectory {
    /// Calendar date the snapshot was taken (UTC)
    pub exported_on: NaiveDate,
    pub entries: Vec<DirectoryEntry>,
}

impl PatientDirectory {
    /// Build a directory from patients, preserving their order.
    pub fn render(patients: &[Patient], exported_on: NaiveDate) -> Self {
        let entries = patients
            .iter()
            .map(|p| DirectoryEntry {
                id: p.id.clone(),
                name: p.name.clone(),
                phone: p.phone.clone(),
                address: p.address.clone(),
            })
            .collect();

        Self {
            exported_on,
            entries,
        }
    }

    /// Suggested download name, e.g. `patient_details_2024-01-10.txt`.
    pub fn file_name(&self, format: ExportFormat) -> String {
        format!(
            "patient_details_{}.{}",
            self.exported_on.format("%Y-%m-%d"),
            format.extension()
        )
    }

    pub fn to_format(&self, format: ExportFormat) -> String {
        match format {
            ExportFormat::Text => self.to_text(),
            ExportFormat::Csv => self.to_csv(),
        }
    }

    /// Export as text blocks separated by a blank line.
    pub fn to_text(&self) -> String {
        self.entries
            .iter()
            .map(|entry| {
                format!(
                    "Patient Details:\nName: {}\nPhone: {}\nAddress: {}\nID: {}\n{}",
                    entry.name,
                    entry.phone,
                    entry.address.as_deref().unwrap_or("Not provided"),
                    entry.id,
                    ENTRY_SEPARATOR,
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Export to CSV format.
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();

        // Header
        csv.push_str("id,name,phone,address\n");

        for entry in &self.entries {
            csv.push_str(&format!(
                "{},{},{},{}\n",
                escape_csv(&entry.id),
                escape_csv(&entry.name),
                escape_csv(&entry.phone),
                escape_csv(entry.address.as_deref().unwrap_or("")),
            ));
        }

        csv
    }
}

/// Escape a string for CSV.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
