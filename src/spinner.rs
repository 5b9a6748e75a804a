//! Terminal spinner shown while Claude is working.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Upper bound on how long `stop` waits for the render thread.
const STOP_TIMEOUT: Duration = Duration::from_millis(500);

type Output = Arc<Mutex<Box<dyn Write + Send>>>;

/// Background spinner that redraws a single terminal line.
pub struct Spinner {
    message: String,
    output: Output,
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl Spinner {
    /// Spinner that renders to stdout.
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_output(message, io::stdout())
    }

    pub fn with_output(message: impl Into<String>, output: impl Write + Send + 'static) -> Self {
        Self {
            message: message.into(),
            output: Arc::new(Mutex::new(Box::new(output))),
            running: Arc::new(AtomicBool::new(false)),
            thread: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start rendering. No-op if already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }

        // A render thread abandoned by `stop` keeps the flag it was given,
        // so it still observes its own stop after a restart.
        self.running = Arc::new(AtomicBool::new(true));
        let running = Arc::clone(&self.running);
        let output = Arc::clone(&self.output);
        let message = self.message.clone();

        self.thread = Some(thread::spawn(move || {
            let mut idx = 0;
            while running.load(Ordering::SeqCst) {
                let frame = SPINNER_FRAMES[idx % SPINNER_FRAMES.len()];
                if let Ok(mut out) = output.lock() {
                    let _ = write!(out, "\r{frame} {message}");
                    let _ = out.flush();
                }
                thread::sleep(FRAME_INTERVAL);
                idx += 1;
            }

            // Clear the line when done
            if let Ok(mut out) = output.lock() {
                let blank = " ".repeat(message.chars().count() + 3);
                let _ = write!(out, "\r{blank}\r");
                let _ = out.flush();
            }
        }));
    }

    /// Stop rendering and clear the line. No-op if not running.
    ///
    /// Waits at most 500ms for the render thread; a thread that has not
    /// finished by then is left to exit on its own.
    pub fn stop(&mut self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        if let Some(handle) = self.thread.take() {
            let deadline = Instant::now() + STOP_TIMEOUT;
            while !handle.is_finished() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(10));
            }
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}
