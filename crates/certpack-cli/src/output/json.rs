//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use certpack_core::BuildReport;
use certpack_core::Entry;
use certpack_core::ExtractReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

#[derive(Debug, Serialize)]
struct CertificateOutput {
    bank_code: String,
    snils: String,
    expires_at: String,
    state: String,
}

#[derive(Debug, Serialize)]
struct EntryOutput {
    name: String,
    path: String,
    valid: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    certificate: Option<CertificateOutput>,
}

impl From<&Entry> for EntryOutput {
    fn from(entry: &Entry) -> Self {
        Self {
            name: entry.name().to_string(),
            path: entry.full_path().display().to_string(),
            valid: entry.is_valid(),
            message: entry.message().to_string(),
            certificate: entry.certificate().map(|cert| CertificateOutput {
                bank_code: cert.bank_code.clone(),
                snils: cert.snils.clone(),
                expires_at: cert.expires_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
                state: cert.state.to_string(),
            }),
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_entries(&self, directory: &Path, entries: &[&Entry]) -> Result<()> {
        #[derive(Serialize)]
        struct ListOutput {
            directory: String,
            total: usize,
            valid: usize,
            entries: Vec<EntryOutput>,
        }

        let data = ListOutput {
            directory: directory.display().to_string(),
            total: entries.len(),
            valid: entries.iter().filter(|e| e.is_valid()).count(),
            entries: entries.iter().map(|e| EntryOutput::from(*e)).collect(),
        };

        Self::output(&JsonOutput::success("list", data))
    }

    fn format_pack_result(&self, report: &BuildReport) -> Result<()> {
        #[derive(Serialize)]
        struct PackOutput {
            archive_path: String,
            files_added: usize,
            bytes_written: u64,
            bytes_compressed: u64,
            compression_ratio: f64,
            sources_deleted: bool,
            duration_ms: u128,
            message: String,
        }

        let data = PackOutput {
            archive_path: report.archive_path.display().to_string(),
            files_added: report.files_added,
            bytes_written: report.bytes_written,
            bytes_compressed: report.bytes_compressed,
            compression_ratio: report.compression_ratio(),
            sources_deleted: report.sources_deleted,
            duration_ms: report.duration.as_millis(),
            message: report.message(),
        };

        Self::output(&JsonOutput::success("pack", data))
    }

    fn format_unpack_result(&self, report: &ExtractReport) -> Result<()> {
        #[derive(Serialize)]
        struct UnpackOutput {
            archive_path: String,
            destination: String,
            files_extracted: usize,
            bytes_written: u64,
            archive_deleted: bool,
            duration_ms: u128,
            message: String,
            entries: Vec<EntryOutput>,
        }

        let data = UnpackOutput {
            archive_path: report.archive_path.display().to_string(),
            destination: report.destination.display().to_string(),
            files_extracted: report.files_extracted(),
            bytes_written: report.bytes_written,
            archive_deleted: report.archive_deleted,
            duration_ms: report.duration.as_millis(),
            message: report.message(),
            entries: report.entries.iter().map(EntryOutput::from).collect(),
        };

        Self::output(&JsonOutput::success("unpack", data))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::error("unknown", format!("{error:#}"));
        let _ = Self::output(&output);
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct WarningData {
            message: String,
        }

        let output = JsonOutput::success(
            "warning",
            WarningData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_certificate_entry_output() {
        let entry = Entry::new_certificate("/in", "0647.11111111111.20220923174555.del");
        let json = serde_json::to_value(EntryOutput::from(&entry)).unwrap();

        assert_eq!(json["valid"], true);
        assert_eq!(json["certificate"]["bank_code"], "0647");
        assert_eq!(json["certificate"]["expires_at"], "2022-09-23T17:45:55");
        assert_eq!(json["certificate"]["state"], "del");
    }

    #[test]
    fn test_invalid_entry_output() {
        let entry = Entry::new_certificate("/in", "dddddd");
        let json = serde_json::to_value(EntryOutput::from(&entry)).unwrap();

        assert_eq!(json["valid"], false);
        assert!(json.get("certificate").is_none());
        assert!(json["message"].as_str().unwrap().contains("dddddd"));
    }

    #[test]
    fn test_error_output_structure() {
        let output = JsonOutput::error("pack", "archive is empty");
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], "archive is empty");
        assert!(json.get("data").is_none());
    }
}
