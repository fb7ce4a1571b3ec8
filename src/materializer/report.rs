use crate::extractor::{ExtractionResult, RuleHits};
use crate::materializer::{MaterializeSummary, WrittenFile};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Final account of one run, printed and never written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldReport {
    pub source_document: PathBuf,
    pub output_root: PathBuf,
    pub dry_run: bool,
    pub files: Vec<WrittenFile>,
    pub total_files: usize,
    pub total_bytes: u64,
    pub rule_hits: Vec<RuleHits>,
    pub duration: Duration,
    pub generated_at: DateTime<Utc>,
}

impl ScaffoldReport {
    pub fn from_summary(
        source_document: &Path,
        summary: &MaterializeSummary,
        rule_hits: Vec<RuleHits>,
    ) -> Self {
        Self {
            source_document: source_document.to_path_buf(),
            output_root: summary.output_root.clone(),
            dry_run: false,
            files: summary.files.clone(),
            total_files: summary.file_count(),
            total_bytes: summary.bytes_written,
            rule_hits,
            duration: summary.duration,
            generated_at: Utc::now(),
        }
    }

    /// Report for a run that extracted but wrote nothing.
    pub fn planned(
        source_document: &Path,
        output_root: &Path,
        files: &ExtractionResult,
        rule_hits: Vec<RuleHits>,
    ) -> Self {
        let planned: Vec<WrittenFile> = files
            .iter()
            .map(|f| WrittenFile {
                path: f.path.clone(),
                bytes: f.size(),
            })
            .collect();

        Self {
            source_document: source_document.to_path_buf(),
            output_root: output_root.to_path_buf(),
            dry_run: true,
            total_files: planned.len(),
            total_bytes: files.total_bytes(),
            files: planned,
            rule_hits,
            duration: Duration::ZERO,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ExtractedFile;

    #[test]
    fn test_planned_report() {
        let files: ExtractionResult = vec![
            ExtractedFile::new("backend/Dockerfile", "FROM python:3.11"),
            ExtractedFile::new("frontend/nginx.conf", "server {}"),
        ]
        .into_iter()
        .collect();

        let report = ScaffoldReport::planned(
            Path::new("deploy_pattern_prompt.md"),
            Path::new("."),
            &files,
            Vec::new(),
        );

        assert!(report.dry_run);
        assert_eq!(report.total_files, 2);
        assert_eq!(report.total_bytes, 25);
        assert_eq!(report.files[1].path, "frontend/nginx.conf");
    }

    #[test]
    fn test_report_serializes() {
        let summary = MaterializeSummary {
            output_root: PathBuf::from("out"),
            files: vec![WrittenFile {
                path: "docker-compose.yml".to_string(),
                bytes: 12,
            }],
            bytes_written: 12,
            duration: Duration::from_millis(3),
        };
        let report = ScaffoldReport::from_summary(
            Path::new("deploy_pattern_prompt.md"),
            &summary,
            vec![RuleHits {
                rule: "compose-file".to_string(),
                matches: 1,
            }],
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_files"], 1);
        assert_eq!(json["files"][0]["path"], "docker-compose.yml");
        assert_eq!(json["rule_hits"][0]["rule"], "compose-file");
        assert_eq!(json["dry_run"], false);
    }
}
