//! Output module
//! Report building, report formatting and document export

pub mod export;
pub mod formatter;
pub mod report;

pub use export::{DocumentExporter, ExportFormat};
pub use formatter::{resolve_output_path, save_report_to_file, suggest_filename, FileKind, ReportGenerator};
pub use report::{ATSReport, SuggestedKeyword};
