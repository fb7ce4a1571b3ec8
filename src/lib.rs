pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod materializer;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, InputConfig, OutputConfig, RuleConfig};
pub use error::{Result, ScaffoldError, UserFriendlyError};

// Core functionality re-exports
pub use extractor::{BlockRule, ExtractedFile, ExtractionResult, Extractor, MatchRule};
pub use materializer::{MaterializeProgress, MaterializeSummary, Materializer, ScaffoldReport};
pub use ui::{OutputFormatter, OutputMode};

use std::path::Path;

pub const EMPTY_EXTRACTION_MESSAGE: &str =
    "No files extracted. Please check the markdown file and regex patterns.";

/// Main library interface: read the pattern document, extract, materialize.
pub struct Scaffolder {
    config: Config,
    extractor: Extractor,
    output_formatter: OutputFormatter,
}

impl Scaffolder {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let extractor = Extractor::new(&config.rules);
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);

        Self {
            config,
            extractor,
            output_formatter,
        }
    }

    /// Create a Scaffolder from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    /// Full run against the configured document and output root.
    ///
    /// Returns `Ok(None)` when nothing was extracted; no files are written then.
    pub fn run(&self) -> Result<Option<ScaffoldReport>> {
        let document_path = self.config.input.document.as_path();
        let document = self.read_document(document_path)?;

        let (files, rule_hits) = self.extract(&document);
        if files.is_empty() {
            self.output_formatter.warning(EMPTY_EXTRACTION_MESSAGE);
            return Ok(None);
        }

        let summary = self.materialize(&files)?;
        Ok(Some(ScaffoldReport::from_summary(
            document_path,
            &summary,
            rule_hits,
        )))
    }

    /// Extract and report what would be written, without touching the output root.
    pub fn plan(&self) -> Result<Option<ScaffoldReport>> {
        let document_path = self.config.input.document.as_path();
        let document = self.read_document(document_path)?;

        let (files, rule_hits) = self.extract(&document);
        if files.is_empty() {
            self.output_formatter.warning(EMPTY_EXTRACTION_MESSAGE);
            return Ok(None);
        }

        let materializer = Materializer::new(&self.config.output.base_directory);
        for file in &files {
            materializer.target_path(&file.path)?;
        }

        Ok(Some(ScaffoldReport::planned(
            document_path,
            materializer.output_root(),
            &files,
            rule_hits,
        )))
    }

    /// Read the whole document; the handle is closed before this returns.
    ///
    /// `\r\n` and lone `\r` line endings become `\n`; every rule anchors on
    /// bare newlines around the fences.
    pub fn read_document(&self, path: &Path) -> Result<String> {
        self.output_formatter
            .start_operation(&format!("Reading {}", path.display()));

        let raw = std::fs::read_to_string(path).map_err(|source| ScaffoldError::InputRead {
            path: path.to_path_buf(),
            source,
        })?;
        let document = normalize_line_endings(raw);

        self.output_formatter
            .debug(&format!("Read {} bytes", document.len()));
        Ok(document)
    }

    fn extract(&self, document: &str) -> (ExtractionResult, Vec<extractor::RuleHits>) {
        self.output_formatter.start_operation("Extracting file blocks");

        let (files, hits) = self.extractor.extract_with_hits(document);
        for hit in &hits {
            self.output_formatter
                .debug(&format!("rule {}: {} match(es)", hit.rule, hit.matches));
        }
        self.output_formatter
            .info(&format!("Found {} file blocks", files.len()));

        (files, hits)
    }

    fn materialize(&self, files: &ExtractionResult) -> Result<MaterializeSummary> {
        self.output_formatter.start_operation(&format!(
            "Writing files under {}",
            self.config.output.base_directory.display()
        ));

        let formatter = &self.output_formatter;
        let progress_callback = move |progress: &MaterializeProgress| {
            if let Some(ref path) = progress.current_file {
                formatter.file_created(path);
            }
        };

        Materializer::new(&self.config.output.base_directory)
            .materialize(files, Some(&progress_callback))
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        Config::default().save_to_file(output_path)
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &ScaffoldError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

fn normalize_line_endings(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

/// Extract and materialize `document` under `output_root` with default rules.
///
/// Returns the number of files written.
pub fn scaffold_document(document: &str, output_root: &Path) -> Result<usize> {
    let files = Extractor::default().extract(document);
    if files.is_empty() {
        return Ok(0);
    }

    let summary = Materializer::new(output_root).materialize(&files, None)?;
    Ok(summary.file_count())
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
