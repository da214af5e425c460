pub mod line_writer;

pub use line_writer::{LineSink, OutputPaths};
