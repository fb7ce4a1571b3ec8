use crate::config::RuleConfig;
use crate::extractor::rules::{default_rules, BlockRule, MatchRule};
use serde::Serialize;

/// One file captured from the source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedFile {
    pub path: String,
    pub content: String,
}

impl ExtractedFile {
    pub fn new<P: Into<String>, C: Into<String>>(path: P, content: C) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

/// Ordered path -> content mapping.
///
/// Paths are unique. Inserting an existing path replaces its content and keeps
/// the position of the first insertion, so iteration order is deterministic:
/// rule order first, then document order within a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    files: Vec<ExtractedFile>,
}

impl ExtractionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, returning the content it replaced.
    pub fn insert(&mut self, file: ExtractedFile) -> Option<String> {
        match self.files.iter_mut().find(|f| f.path == file.path) {
            Some(existing) => Some(std::mem::replace(&mut existing.content, file.content)),
            None => {
                self.files.push(file);
                None
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| f.content.as_str())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.path.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExtractedFile> {
        self.files.iter()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(ExtractedFile::size).sum()
    }
}

impl<'a> IntoIterator for &'a ExtractionResult {
    type Item = &'a ExtractedFile;
    type IntoIter = std::slice::Iter<'a, ExtractedFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

impl FromIterator<ExtractedFile> for ExtractionResult {
    fn from_iter<I: IntoIterator<Item = ExtractedFile>>(iter: I) -> Self {
        let mut result = Self::new();
        for file in iter {
            result.insert(file);
        }
        result
    }
}

/// Per-rule match counts from one extraction.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RuleHits {
    pub rule: String,
    pub matches: usize,
}

pub struct Extractor {
    rules: Vec<BlockRule>,
}

impl Extractor {
    pub fn new(config: &RuleConfig) -> Self {
        Self {
            rules: default_rules(&config.dockerfile_markers),
        }
    }

    /// Run every rule over `document` and merge the results in rule order.
    ///
    /// Never fails: a rule that finds nothing contributes no entries.
    pub fn extract(&self, document: &str) -> ExtractionResult {
        self.extract_with_hits(document).0
    }

    pub fn extract_with_hits(&self, document: &str) -> (ExtractionResult, Vec<RuleHits>) {
        let mut result = ExtractionResult::new();
        let mut hits = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let files = rule.scan(document);
            hits.push(RuleHits {
                rule: rule.name().to_string(),
                matches: files.len(),
            });
            for file in files {
                result.insert(file);
            }
        }

        (result, hits)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&RuleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_DOCUMENT: &str = r#"# Deploy pattern

## 1. Dockerfiles

$**Caminho**: `backend/Dockerfile`

```dockerfile
FROM python:3.11-slim

WORKDIR /app
COPY . .
```

$**Caminho**: `frontend/Dockerfile`

```dockerfile
FROM node:20 AS build
```

$**Caminho**: `backend/requirements.txt`

```text
fastapi
```

## 2. Proxy

$**nginx.conf** (Frontend):

```nginx
server {
    listen 80;
}
```

### 3. `docker-compose.yml`

All services together:

```yaml
services:
  backend:
    build: ./backend
```

## 4. CI

$**Localização**: `.github/workflows/deploy.yml`

```yaml
name: Deploy
```
"#;

    #[test]
    fn test_full_document_extraction() {
        let result = Extractor::default().extract(FULL_DOCUMENT);

        let paths: Vec<&str> = result.paths().collect();
        assert_eq!(
            paths,
            vec![
                "backend/Dockerfile",
                "frontend/Dockerfile",
                "frontend/nginx.conf",
                "docker-compose.yml",
                ".github/workflows/deploy.yml",
            ]
        );
        assert_eq!(
            result.get("backend/Dockerfile"),
            Some("FROM python:3.11-slim\n\nWORKDIR /app\nCOPY . .")
        );
        assert_eq!(result.get("frontend/nginx.conf"), Some("server {\n    listen 80;\n}"));
        assert_eq!(
            result.get("docker-compose.yml"),
            Some("services:\n  backend:\n    build: ./backend")
        );
        assert_eq!(result.get(".github/workflows/deploy.yml"), Some("name: Deploy"));
        assert!(!result.contains("backend/requirements.txt"));
    }

    #[test]
    fn test_empty_document() {
        let extractor = Extractor::default();
        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("# Nothing to see\n\n```yaml\na: 1\n```\n").is_empty());
    }

    #[test]
    fn test_backend_and_nginx_only() {
        let doc = "$**Caminho**: `backend/Dockerfile`\n```dockerfile\nFROM python:3.11\n```\n\n$**nginx.conf** (Frontend):\n```nginx\nserver {}\n```\n";
        let result = Extractor::default().extract(doc);

        assert_eq!(result.len(), 2);
        assert_eq!(result.get("backend/Dockerfile"), Some("FROM python:3.11"));
        assert_eq!(result.get("frontend/nginx.conf"), Some("server {}"));
    }

    #[test]
    fn test_duplicate_labeled_path_last_block_wins() {
        let doc = "$**Caminho**: `backend/Dockerfile`\n```\nFROM old\n```\n$**Caminho**: `frontend/Dockerfile`\n```\nFROM node\n```\n$**Caminho**: `backend/Dockerfile`\n```\nFROM new\n```\n";
        let result = Extractor::default().extract(doc);

        assert_eq!(result.len(), 2);
        assert_eq!(result.get("backend/Dockerfile"), Some("FROM new"));
        // replaced entries keep their first position
        assert_eq!(result.paths().next(), Some("backend/Dockerfile"));
    }

    #[test]
    fn test_later_rule_overwrites_earlier_rule() {
        let doc = "$**Caminho**: `frontend/nginx.conf`\n```nginx\nfrom labeled\n```\n\n$**nginx.conf** (Frontend):\n```nginx\nfrom proxy\n```\n";
        let config = RuleConfig {
            dockerfile_markers: vec!["frontend/nginx.conf".to_string()],
        };
        let result = Extractor::new(&config).extract(doc);

        assert_eq!(result.len(), 1);
        assert_eq!(result.get("frontend/nginx.conf"), Some("from proxy"));
    }

    #[test]
    fn test_rule_hits() {
        let (result, hits) = Extractor::default().extract_with_hits(FULL_DOCUMENT);
        assert_eq!(result.len(), 5);
        let counts: Vec<usize> = hits.iter().map(|h| h.matches).collect();
        assert_eq!(counts, vec![2, 1, 1, 1]);
    }

    #[test]
    fn test_extraction_is_pure() {
        let extractor = Extractor::default();
        assert_eq!(extractor.extract(FULL_DOCUMENT), extractor.extract(FULL_DOCUMENT));
    }

    #[test]
    fn test_insert_reports_replaced_content() {
        let mut result = ExtractionResult::new();
        assert_eq!(result.insert(ExtractedFile::new("a", "1")), None);
        assert_eq!(result.insert(ExtractedFile::new("a", "2")), Some("1".to_string()));
        assert_eq!(result.total_bytes(), 1);
    }
}
