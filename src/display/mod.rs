//! Display formatting for terminal output

pub mod record;

pub use record::{format_documents, format_record_details, format_record_table, DisplayOptions};
