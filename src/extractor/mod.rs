pub mod block_extractor;
pub mod rules;

pub use block_extractor::{ExtractedFile, ExtractionResult, Extractor, RuleHits};
pub use rules::{BlockRule, Cardinality, MatchRule, OutputTarget};
