use std::io::{self, BufWriter, Write};

use crate::error::OutputError;
use crate::event::TraceEvent;
use super::OutputSink;

/// JSONL output sink - one JSON object per line.
pub struct JsonlSink {
    writer: BufWriter<Box<dyn Write>>,
}

impl JsonlSink {
    pub fn new_file(file: std::fs::File) -> Self {
        Self::new_writer(Box::new(file))
    }

    pub fn new_stdout() -> Self {
        Self::new_writer(Box::new(io::stdout()))
    }

    pub fn new_writer(writer: Box<dyn Write>) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }
}

impl OutputSink for JsonlSink {
    fn emit(&mut self, event: &TraceEvent) -> Result<(), OutputError> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), OutputError> {
        self.writer.flush()?;
        Ok(())
    }
}
