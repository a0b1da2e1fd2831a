pub mod discovery;
pub mod error;
pub mod table;

pub use discovery::{list_section_files, section_name};
pub use error::{IngestError, Result};
pub use table::{
    ColumnStats, HeaderHints, RawTable, column_stats, is_numeric_cell, read_raw_table,
};
