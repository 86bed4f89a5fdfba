pub mod file_name;
pub mod query_builder;
pub mod report_generator;
pub mod transcript_writer;

pub use file_name::{is_blank_file_name, sanitize_file_name};
pub use query_builder::{check_filter_value, QueryBuilder, UnsafeInput, REPORT_FIELDS};
pub use report_generator::{LogParserGenerator, ReportGenerator, ReportJob};
pub use transcript_writer::TranscriptWriter;
