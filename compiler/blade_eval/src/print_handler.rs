//! Output stream used by `print`.
//!
//! Output can be directed to different destinations:
//! - Interpret mode: stdout (default)
//! - Test runs: buffer for assertions
//! - Embedders that want no output: silent
//!
//! Uses enum dispatch instead of trait objects; `print` is on the hot path
//! of most scripts.

use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

/// Print handler that writes to stdout.
#[derive(Default)]
pub struct StdoutPrintHandler;

impl StdoutPrintHandler {
    pub fn println(&self, msg: &str) {
        println!("{msg}");
    }

    pub fn print(&self, msg: &str) {
        print!("{msg}");
    }

    pub fn flush(&self) {
        if let Err(err) = std::io::stdout().flush() {
            tracing::warn!(%err, "failed to flush stdout");
        }
    }
}

/// Print handler that captures output in memory.
pub struct BufferPrintHandler {
    buffer: Mutex<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        BufferPrintHandler {
            buffer: Mutex::new(String::new()),
        }
    }

    pub fn println(&self, msg: &str) {
        let mut buf = self.buffer.lock();
        buf.push_str(msg);
        buf.push('\n');
    }

    pub fn print(&self, msg: &str) {
        self.buffer.lock().push_str(msg);
    }

    /// All captured output.
    pub fn get_output(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Default for BufferPrintHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Print handler implementation using enum dispatch.
pub enum PrintHandlerImpl {
    /// Writes to stdout (default).
    Stdout(StdoutPrintHandler),
    /// Captures to a buffer.
    Buffer(BufferPrintHandler),
    /// Discards all output.
    Silent,
}

impl PrintHandlerImpl {
    pub fn println(&self, msg: &str) {
        match self {
            Self::Stdout(h) => h.println(msg),
            Self::Buffer(h) => h.println(msg),
            Self::Silent => {}
        }
    }

    pub fn print(&self, msg: &str) {
        match self {
            Self::Stdout(h) => h.print(msg),
            Self::Buffer(h) => h.print(msg),
            Self::Silent => {}
        }
    }

    /// Flush buffered output to its destination. A no-op for in-memory
    /// handlers.
    pub fn flush(&self) {
        if let Self::Stdout(h) = self {
            h.flush();
        }
    }

    /// Captured output; empty for handlers that do not capture.
    pub fn get_output(&self) -> String {
        match self {
            Self::Buffer(h) => h.get_output(),
            Self::Stdout(_) | Self::Silent => String::new(),
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(h) = self {
            h.clear();
        }
    }
}

/// Shared print handler that can be passed around.
pub type SharedPrintHandler = Arc<PrintHandlerImpl>;

/// Create a stdout print handler.
pub fn stdout_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Stdout(StdoutPrintHandler))
}

/// Create a buffer print handler for capturing output.
pub fn buffer_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Buffer(BufferPrintHandler::new()))
}

/// Create a print handler that discards all output.
pub fn silent_handler() -> SharedPrintHandler {
    Arc::new(PrintHandlerImpl::Silent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_handler_println_captures_with_newline() {
        let handler = BufferPrintHandler::new();
        handler.println("hello");
        assert_eq!(handler.get_output(), "hello\n");
    }

    #[test]
    fn buffer_handler_print_captures_without_newline() {
        let handler = BufferPrintHandler::new();
        handler.print("hello");
        handler.print(" ");
        handler.println("world");
        assert_eq!(handler.get_output(), "hello world\n");
    }

    #[test]
    fn buffer_handler_clear_empties_buffer() {
        let handler = buffer_handler();
        handler.println("hello");
        handler.flush();
        assert_eq!(handler.get_output(), "hello\n");
        handler.clear();
        assert!(handler.get_output().is_empty());
    }

    #[test]
    fn silent_handler_discards_output() {
        let handler = silent_handler();
        handler.println("hello");
        handler.print("world");
        handler.flush();
        assert_eq!(handler.get_output(), "");
    }

    #[test]
    fn stdout_handler_captures_nothing() {
        let handler = stdout_handler();
        handler.flush();
        assert_eq!(handler.get_output(), "");
    }

    #[test]
    fn buffer_handler_is_thread_safe() {
        use std::thread;

        let handler = buffer_handler();
        let handler2 = Arc::clone(&handler);

        let t1 = thread::spawn(move || {
            for _ in 0..100 {
                handler2.println("a");
            }
        });
        for _ in 0..100 {
            handler.println("b");
        }
        assert!(t1.join().is_ok());

        assert_eq!(handler.get_output().lines().count(), 200);
    }
}
