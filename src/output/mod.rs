//! Output format writers.

mod csv;
mod writer;

pub use csv::CsvWriter;
pub use writer::OutputWriter;
