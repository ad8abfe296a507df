//! Merge every `*.json` file of a folder into one `leads.json` array.
//!
//! Array files contribute each of their elements, object files are appended
//! whole with a `_source` field naming the file they came from.

pub mod consolidator;
pub mod error;
pub mod logging;
pub mod report;

pub use consolidator::{Consolidator, ScanOutcome, Summary, OUTPUT_FILE_NAME, SOURCE_FIELD};
pub use error::{ConsolidateError, FileParseError};
pub use report::{ConsoleReporter, Reporter};
