//! Output format implementations

pub mod docx;
pub mod json;

pub use docx::DocxFormat;
pub use json::JsonFormat;
