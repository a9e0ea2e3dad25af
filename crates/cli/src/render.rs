//! Terminal rendering of turn output.

use runtime::{Output, Sink};
use std::io::Write;

/// Prints conversation text and function call channels to stdout.
///
/// A function call gets its own line, starting with the function name, so
/// its tokens never mix with the model's answer.
#[derive(Debug, Default)]
pub struct Terminal {
    /// Whether the cursor is in the middle of a line.
    open: bool,
}

impl Terminal {
    /// Create a new terminal sink.
    pub fn new() -> Self {
        Self::default()
    }

    fn print(&mut self, text: &str) {
        print!("{text}");
        self.open = !text.ends_with('\n');
        if let Err(e) = std::io::stdout().flush() {
            tracing::warn!("failed to flush stdout: {e}");
        }
    }

    fn newline(&mut self) {
        if self.open {
            self.print("\n");
        }
    }
}

impl Sink for Terminal {
    fn emit(&mut self, output: Output) {
        match output {
            Output::Token(token) => self.print(&token),
            Output::ContentDone => self.newline(),
            Output::CallStart(_) => {
                self.newline();
                self.print("[call] ");
            }
            Output::CallToken { token, .. } => self.print(&token),
            Output::CallDone(_) => self.newline(),
            Output::FunctionResult { name, content } => {
                self.newline();
                self.print(&format!("[{name} result]\n{content}\n"));
            }
        }
    }
}
