//! Sink for user-facing status lines.

use std::io::Write;

/// Destination of the status lines a component prints.
pub type Output = Box<dyn Write + Send>;

/// Status lines go to the process stdout.
pub fn stdout() -> Output {
    Box::new(std::io::stdout())
}
