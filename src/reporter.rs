//! User-facing terminal output.
//!
//! Everything the operator is meant to read goes through a [`Reporter`]
//! built once at startup. Diagnostics meant for debugging use `tracing`.

use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Out,
    Err,
}

/// Terminal reporter shared by the driver and the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct Reporter {
    verbose: bool,
    captured: Option<Arc<Mutex<Vec<String>>>>,
}

impl Reporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            captured: None,
        }
    }

    /// A reporter that records lines instead of printing them.
    pub fn capturing(verbose: bool) -> Self {
        Self {
            verbose,
            captured: Some(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Lines recorded by a capturing reporter, stdout and stderr interleaved.
    pub fn lines(&self) -> Vec<String> {
        match &self.captured {
            Some(buf) => buf.lock().map(|b| b.clone()).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Print a line to stdout.
    pub fn info(&self, line: impl AsRef<str>) {
        self.emit(Stream::Out, line.as_ref());
    }

    /// Print a line to stdout only in verbose mode.
    pub fn detail(&self, line: impl AsRef<str>) {
        if self.verbose {
            self.emit(Stream::Out, line.as_ref());
        }
    }

    /// Print a non-fatal warning to stderr.
    pub fn warn(&self, line: impl AsRef<str>) {
        self.emit(Stream::Err, &format!("⚠️  {}", line.as_ref()));
    }

    /// Print a failure to stderr.
    pub fn error(&self, line: impl AsRef<str>) {
        self.emit(Stream::Err, &format!("❌ {}", line.as_ref()));
    }

    /// Print an indented continuation of a previous error or warning.
    pub fn error_detail(&self, line: impl AsRef<str>) {
        self.emit(Stream::Err, &format!("   {}", line.as_ref()));
    }

    fn emit(&self, stream: Stream, line: &str) {
        if let Some(buf) = &self.captured {
            if let Ok(mut buf) = buf.lock() {
                buf.push(line.to_string());
            }
            return;
        }
        match stream {
            Stream::Out => println!("{line}"),
            Stream::Err => eprintln!("{line}"),
        }
    }
}
