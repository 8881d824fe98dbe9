//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use certpack_core::BuildReport;
use certpack_core::Entry;
use certpack_core::ExtractReport;
use console::Term;
use console::style;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn headline(&self, text: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {text}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(text);
        }
    }

    fn entry_line(&self, entry: &Entry) -> String {
        let marker = match (entry.is_valid(), self.use_colors) {
            (true, true) => style("✓").green().to_string(),
            (false, true) => style("✗").red().to_string(),
            (true, false) => "+".to_string(),
            (false, false) => "-".to_string(),
        };
        let label = if self.verbose {
            entry.full_path().display().to_string()
        } else {
            entry.name().to_string()
        };
        if entry.message().is_empty() {
            format!("{marker} {label}")
        } else {
            format!("{marker} {label}  {}", entry.message())
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_entries(&self, directory: &Path, entries: &[&Entry]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for entry in entries {
            let _ = self.term.write_line(&self.entry_line(entry));
        }

        let valid = entries.iter().filter(|e| e.is_valid()).count();
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "Total: {} file(s) in {}, {valid} valid",
            entries.len(),
            directory.display()
        ));

        Ok(())
    }

    fn format_pack_result(&self, report: &BuildReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!(
            "Archive created: {}",
            report.archive_path.display()
        ));
        let _ = self.term.write_line("");
        let _ = self
            .term
            .write_line(&format!("  Files added:      {}", report.files_added));
        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_written)
        ));
        let _ = self.term.write_line(&format!(
            "  Compressed size:  {}",
            Self::format_size(report.bytes_compressed)
        ));
        let _ = self.term.write_line(&format!(
            "  Sources:          {}",
            if report.sources_deleted {
                "deleted"
            } else {
                "kept"
            }
        ));

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Compression:      {:.2}x",
                report.compression_ratio()
            ));
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }

        Ok(())
    }

    fn format_unpack_result(&self, report: &ExtractReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(&format!(
            "Archive unpacked: {} -> {}",
            report.archive_path.display(),
            report.destination.display()
        ));
        let _ = self.term.write_line("");
        for entry in &report.entries {
            let _ = self
                .term
                .write_line(&format!("  {}", self.entry_line(entry)));
        }
        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "  Files extracted:  {}",
            report.files_extracted()
        ));
        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_written)
        ));
        let _ = self.term.write_line(&format!(
            "  Archive:          {}",
            if report.archive_deleted {
                "deleted"
            } else {
                "kept"
            }
        ));

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:#}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:#}"));
        }
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING: {message}"));
        }
    }
}
