//! The output sink and the result formatters that write to it.

pub mod formatters;
pub mod json;
pub mod terminal;

pub use formatters::{create_formatter, ErrorFormat, ErrorFormatter};
pub use json::JsonFormatter;
pub use terminal::TableFormatter;

use crate::errors::Result;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Where run output goes: scanner notices, debug echoes and the formatted
/// result. Logging never goes here.
pub struct Output {
    writer: Box<dyn Write>,
    debug: bool,
    decorated: bool,
}

impl Output {
    pub fn new(writer: impl Write + 'static, debug: bool, decorated: bool) -> Self {
        Self {
            writer: Box::new(writer),
            debug,
            decorated,
        }
    }

    pub fn stdout(debug: bool, decorated: bool) -> Self {
        Self::new(std::io::stdout(), debug, decorated)
    }

    /// Whether ANSI styling may be used
    pub fn is_decorated(&self) -> bool {
        self.decorated
    }

    pub fn write_line(&mut self, line: impl AsRef<str>) -> Result<()> {
        writeln!(self.writer, "{}", line.as_ref())?;
        Ok(())
    }

    /// Write `line` only in debug mode.
    pub fn write_debug(&mut self, line: impl AsRef<str>) -> Result<()> {
        if self.debug {
            self.write_line(line)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// In-memory writer whose clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        let bytes = self
            .bytes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
