use crate::error::{Result, ScaffoldError};
use crate::extractor::{ExtractedFile, ExtractionResult};
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct MaterializeProgress {
    pub files_written: usize,
    pub bytes_written: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
}

impl MaterializeProgress {
    pub fn new() -> Self {
        Self {
            files_written: 0,
            bytes_written: 0,
            current_file: None,
            start_time: Instant::now(),
        }
    }

    fn start_file(&mut self, path: &str) {
        self.current_file = Some(path.to_string());
    }

    fn finish_file(&mut self, bytes: u64) {
        self.files_written += 1;
        self.bytes_written += bytes;
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for MaterializeProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub path: String,
    pub bytes: u64,
}

/// What one materialization run put on disk.
#[derive(Debug, Clone, Serialize)]
pub struct MaterializeSummary {
    pub output_root: PathBuf,
    pub files: Vec<WrittenFile>,
    pub bytes_written: u64,
    pub duration: Duration,
}

impl MaterializeSummary {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

pub struct Materializer {
    output_root: PathBuf,
    buffer_size: usize,
}

impl Materializer {
    pub fn new<P: Into<PathBuf>>(output_root: P) -> Self {
        Self {
            output_root: output_root.into(),
            buffer_size: 64 * 1024,
        }
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Write every entry of `files` under the output root, in mapping order.
    ///
    /// The callback fires before each write with `current_file` set. The first
    /// failure aborts the batch; files written before it are left in place.
    pub fn materialize(
        &self,
        files: &ExtractionResult,
        progress_callback: Option<&dyn Fn(&MaterializeProgress)>,
    ) -> Result<MaterializeSummary> {
        let mut progress = MaterializeProgress::new();
        let mut written = Vec::with_capacity(files.len());

        for file in files {
            progress.start_file(&file.path);
            if let Some(callback) = progress_callback {
                callback(&progress);
            }

            let bytes = self.write_file(file)?;
            progress.finish_file(bytes);
            written.push(WrittenFile {
                path: file.path.clone(),
                bytes,
            });
        }

        Ok(MaterializeSummary {
            output_root: self.output_root.clone(),
            files: written,
            bytes_written: progress.bytes_written,
            duration: progress.elapsed(),
        })
    }

    /// Resolve a document path against the output root without touching disk.
    pub fn target_path(&self, relative: &str) -> Result<PathBuf> {
        validate_relative_path(relative)?;
        Ok(self.output_root.join(relative))
    }

    fn write_file(&self, file: &ExtractedFile) -> Result<u64> {
        let dest = self.target_path(&file.path)?;

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| ScaffoldError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let write_error = |source: std::io::Error| ScaffoldError::WriteFile {
            path: dest.clone(),
            source,
        };

        // File::create truncates an existing file
        let handle = fs::File::create(&dest).map_err(write_error)?;
        let mut writer = BufWriter::with_capacity(self.buffer_size, handle);
        writer.write_all(file.content.as_bytes()).map_err(write_error)?;
        writer.flush().map_err(write_error)?;

        Ok(file.size())
    }
}

/// Reject paths that would land outside the output root.
pub fn validate_relative_path(relative: &str) -> Result<()> {
    let invalid = |reason: &str| ScaffoldError::InvalidPath {
        path: relative.to_string(),
        reason: reason.to_string(),
    };

    if relative.trim().is_empty() {
        return Err(invalid("path is empty"));
    }

    if relative.contains('\0') {
        return Err(invalid("path contains a NUL byte"));
    }

    let path = Path::new(relative);
    if path.has_root() || path.is_absolute() {
        return Err(invalid("absolute paths are not allowed"));
    }

    for component in path.components() {
        match component {
            Component::ParentDir => return Err(invalid("directory traversal not allowed")),
            Component::Prefix(_) | Component::RootDir => {
                return Err(invalid("absolute paths are not allowed"))
            }
            _ => {}
        }
    }

    if path.file_name().is_none() {
        return Err(invalid("path does not name a file"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use tempfile::TempDir;

    fn mapping(entries: &[(&str, &str)]) -> ExtractionResult {
        entries
            .iter()
            .map(|(path, content)| ExtractedFile::new(*path, *content))
            .collect()
    }

    #[test]
    fn test_creates_intermediate_directories() {
        let temp_dir = TempDir::new().unwrap();
        let files = mapping(&[(".github/workflows/deploy.yml", "name: Deploy\non: push")]);

        let summary = Materializer::new(temp_dir.path())
            .materialize(&files, None)
            .unwrap();

        let target = temp_dir.path().join(".github").join("workflows").join("deploy.yml");
        assert!(target.is_file());
        assert_eq!(fs::read_to_string(target).unwrap(), "name: Deploy\non: push");
        assert_eq!(summary.file_count(), 1);
        assert_eq!(summary.bytes_written, 21);
    }

    #[test]
    fn test_writes_content_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let content = "FROM python:3.11\n\n\tWORKDIR /app  \nCMD [\"ünïcode\"]";
        let files = mapping(&[("backend/Dockerfile", content)]);

        Materializer::new(temp_dir.path()).materialize(&files, None).unwrap();

        let bytes = fs::read(temp_dir.path().join("backend/Dockerfile")).unwrap();
        assert_eq!(bytes, content.as_bytes());
    }

    #[test]
    fn test_materialize_is_content_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let files = mapping(&[
            ("backend/Dockerfile", "FROM python:3.11"),
            ("docker-compose.yml", "services: {}"),
        ]);
        let materializer = Materializer::new(temp_dir.path());

        materializer.materialize(&files, None).unwrap();
        let first = fs::read_to_string(temp_dir.path().join("docker-compose.yml")).unwrap();
        materializer.materialize(&files, None).unwrap();
        let second = fs::read_to_string(temp_dir.path().join("docker-compose.yml")).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("backend/Dockerfile")).unwrap(),
            "FROM python:3.11"
        );
    }

    #[test]
    fn test_overwrite_truncates_longer_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("docker-compose.yml"), "a much longer previous body").unwrap();

        let files = mapping(&[("docker-compose.yml", "short")]);
        Materializer::new(temp_dir.path()).materialize(&files, None).unwrap();

        assert_eq!(
            fs::read_to_string(temp_dir.path().join("docker-compose.yml")).unwrap(),
            "short"
        );
    }

    #[test]
    fn test_empty_mapping_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let summary = Materializer::new(temp_dir.path())
            .materialize(&ExtractionResult::new(), None)
            .unwrap();

        assert_eq!(summary.file_count(), 0);
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_directory_collision_aborts_and_keeps_earlier_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("frontend/nginx.conf")).unwrap();

        let files = mapping(&[
            ("backend/Dockerfile", "FROM python:3.11"),
            ("frontend/nginx.conf", "server {}"),
            ("docker-compose.yml", "services: {}"),
        ]);
        let error = Materializer::new(temp_dir.path())
            .materialize(&files, None)
            .unwrap_err();

        assert!(matches!(error, ScaffoldError::WriteFile { .. }));
        assert!(error.to_string().contains("nginx.conf"));
        assert!(temp_dir.path().join("backend/Dockerfile").is_file());
        assert!(!temp_dir.path().join("docker-compose.yml").exists());
    }

    #[test]
    fn test_parent_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("backend"), "not a directory").unwrap();

        let files = mapping(&[("backend/Dockerfile", "FROM python:3.11")]);
        let error = Materializer::new(temp_dir.path())
            .materialize(&files, None)
            .unwrap_err();

        assert!(matches!(error, ScaffoldError::CreateDirectory { .. }));
        assert!(error.to_string().contains("backend"));
    }

    #[test]
    fn test_traversal_is_rejected_before_writing() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("project");
        fs::create_dir(&root).unwrap();

        let files = mapping(&[("../backend/Dockerfile", "FROM python:3.11")]);
        let error = Materializer::new(&root).materialize(&files, None).unwrap_err();

        assert!(matches!(error, ScaffoldError::InvalidPath { .. }));
        assert!(!temp_dir.path().join("backend").exists());
    }

    #[test]
    fn test_validate_relative_path() {
        assert!(validate_relative_path("backend/Dockerfile").is_ok());
        assert!(validate_relative_path(".github/workflows/deploy.yml").is_ok());
        assert!(validate_relative_path("./docker-compose.yml").is_ok());

        assert!(validate_relative_path("").is_err());
        assert!(validate_relative_path("   ").is_err());
        assert!(validate_relative_path("/etc/backend/Dockerfile").is_err());
        assert!(validate_relative_path("frontend/../../Dockerfile").is_err());
        assert!(validate_relative_path("backend/..").is_err());
    }

    #[test]
    fn test_progress_callback_sees_each_file() {
        let temp_dir = TempDir::new().unwrap();
        let files = mapping(&[("a/one.txt", "1"), ("b/two.txt", "22")]);
        let seen = RefCell::new(Vec::new());

        let callback = |progress: &MaterializeProgress| {
            seen.borrow_mut()
                .push((progress.current_file.clone(), progress.files_written));
        };
        let summary = Materializer::new(temp_dir.path())
            .materialize(&files, Some(&callback))
            .unwrap();

        assert_eq!(
            seen.into_inner(),
            vec![
                (Some("a/one.txt".to_string()), 0),
                (Some("b/two.txt".to_string()), 1),
            ]
        );
        assert_eq!(summary.bytes_written, 3);
        assert_eq!(
            summary.files,
            vec![
                WrittenFile { path: "a/one.txt".to_string(), bytes: 1 },
                WrittenFile { path: "b/two.txt".to_string(), bytes: 2 },
            ]
        );
    }
}
