pub mod log_reader;
