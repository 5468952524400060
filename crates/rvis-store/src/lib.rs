pub mod csv_sink;

pub use csv_sink::{CsvSink, read_records, read_records_from};
