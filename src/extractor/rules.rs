use crate::extractor::ExtractedFile;
use regex::Regex;
use std::sync::LazyLock;

// Every pattern ends its block at the nearest `\n```` after the opening fence
// line, so an unclosed fence never produces a match of its own.

static LABELED_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)\$\*\*Caminho\*\*:\s*`(?P<path>[^`]+)`\s*\n+```[a-zA-Z]*\n(?P<content>.*?)\n```",
    )
    .expect("labeled path pattern is valid")
});

static NGINX_CONFIG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\$\*\*nginx\.conf\*\* \(Frontend\):\s*\n+```nginx\n(?P<content>.*?)\n```")
        .expect("nginx pattern is valid")
});

static COMPOSE_FILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)### 3\. `docker-compose\.yml`\s*\n(?:[^\n]*\n)*?```yaml\n(?P<content>.*?)\n```",
    )
    .expect("compose pattern is valid")
});

static DEPLOY_WORKFLOW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)\$\*\*Localização\*\*:\s*`(?P<path>\.github/workflows/deploy\.yml)`\s*\n+```yaml\n(?P<content>.*?)\n```",
    )
    .expect("workflow pattern is valid")
});

pub const NGINX_CONFIG_PATH: &str = "frontend/nginx.conf";
pub const COMPOSE_FILE_PATH: &str = "docker-compose.yml";

/// A stateless recognizer for one kind of file block.
pub trait MatchRule {
    fn name(&self) -> &str;

    /// Scan `document` and return every accepted block in document order.
    fn scan(&self, document: &str) -> Vec<ExtractedFile>;
}

/// Where a rule takes the output path from.
#[derive(Debug, Clone, PartialEq)]
pub enum OutputTarget {
    /// The `path` capture group of the pattern.
    Captured,
    Fixed(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cardinality {
    FirstOnly,
    All,
}

#[derive(Debug, Clone)]
pub struct BlockRule {
    name: &'static str,
    pattern: Regex,
    target: OutputTarget,
    cardinality: Cardinality,
    path_markers: Vec<String>,
}

impl BlockRule {
    /// `$**Caminho**: `path`` blocks, kept only when the path contains one of
    /// `markers`.
    pub fn labeled_dockerfiles<S: AsRef<str>>(markers: &[S]) -> Self {
        Self {
            name: "labeled-dockerfile",
            pattern: LABELED_PATH_RE.clone(),
            target: OutputTarget::Captured,
            cardinality: Cardinality::All,
            path_markers: markers.iter().map(|m| m.as_ref().to_string()).collect(),
        }
    }

    pub fn nginx_config() -> Self {
        Self {
            name: "nginx-config",
            pattern: NGINX_CONFIG_RE.clone(),
            target: OutputTarget::Fixed(NGINX_CONFIG_PATH),
            cardinality: Cardinality::FirstOnly,
            path_markers: Vec::new(),
        }
    }

    pub fn compose_file() -> Self {
        Self {
            name: "compose-file",
            pattern: COMPOSE_FILE_RE.clone(),
            target: OutputTarget::Fixed(COMPOSE_FILE_PATH),
            cardinality: Cardinality::FirstOnly,
            path_markers: Vec::new(),
        }
    }

    pub fn deploy_workflow() -> Self {
        Self {
            name: "deploy-workflow",
            pattern: DEPLOY_WORKFLOW_RE.clone(),
            target: OutputTarget::Captured,
            cardinality: Cardinality::FirstOnly,
            path_markers: Vec::new(),
        }
    }

    pub fn target(&self) -> &OutputTarget {
        &self.target
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    fn accepts_path(&self, path: &str) -> bool {
        self.path_markers.is_empty() || self.path_markers.iter().any(|m| path.contains(m.as_str()))
    }

    fn to_file(&self, captures: &regex::Captures<'_>) -> Option<ExtractedFile> {
        let content = captures.name("content")?.as_str();
        let path = match self.target {
            OutputTarget::Captured => captures.name("path")?.as_str(),
            OutputTarget::Fixed(path) => path,
        };

        if !self.accepts_path(path) {
            return None;
        }

        Some(ExtractedFile::new(path, content))
    }
}

impl MatchRule for BlockRule {
    fn name(&self) -> &str {
        self.name
    }

    fn scan(&self, document: &str) -> Vec<ExtractedFile> {
        match self.cardinality {
            Cardinality::FirstOnly => self
                .pattern
                .captures(document)
                .and_then(|captures| self.to_file(&captures))
                .into_iter()
                .collect(),
            Cardinality::All => self
                .pattern
                .captures_iter(document)
                .filter_map(|captures| self.to_file(&captures))
                .collect(),
        }
    }
}

/// The four rules in the order their results are merged.
pub fn default_rules<S: AsRef<str>>(dockerfile_markers: &[S]) -> Vec<BlockRule> {
    vec![
        BlockRule::labeled_dockerfiles(dockerfile_markers),
        BlockRule::nginx_config(),
        BlockRule::compose_file(),
        BlockRule::deploy_workflow(),
    ]
}
