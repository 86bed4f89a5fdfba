pub mod batch;
pub mod loaders;

pub use batch::{split_identifiers, summary_for, BatchRequest, BatchResult, FailureKind, ReportOutcome};
pub use loaders::{collect_identifiers_text, load_identifiers_text};
