pub mod file_writer;
pub mod report;

pub use file_writer::{
    validate_relative_path, MaterializeProgress, MaterializeSummary, Materializer, WrittenFile,
};
pub use report::ScaffoldReport;
