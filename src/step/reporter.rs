// ABOUTME: Execution-log reporting for step invocations
// ABOUTME: LogSink contract plus tracing-backed and buffering implementations

use std::sync::Mutex;
use tracing::info;

use super::error::STEP_NAME;

/// Append-only execution log; ordering is preserved within one invocation.
pub trait LogSink: Send + Sync {
    fn write_line(&self, line: &str);
}

/// Routes step log lines into the tracing subscriber
pub struct TracingSink;

impl LogSink for TracingSink {
    fn write_line(&self, line: &str) {
        info!("{}", line);
    }
}

/// Collects log lines in memory. Used by the test suite and by embedders that
/// surface the step log themselves.
#[derive(Default)]
pub struct BufferSink {
    lines: Mutex<Vec<String>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("log buffer lock poisoned").clone()
    }
}

impl LogSink for BufferSink {
    fn write_line(&self, line: &str) {
        self.lines
            .lock()
            .expect("log buffer lock poisoned")
            .push(line.to_string());
    }
}

/// Write the mode line for this invocation
pub fn report_mode(log: &dyn LogSink, sandboxed: bool) {
    let mode = if sandboxed {
        "sandbox"
    } else {
        "script approval"
    };
    log.write_line(&format!("{} running in {} mode", STEP_NAME, mode));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_lines() {
        let sink = BufferSink::new();
        report_mode(&sink, false);
        report_mode(&sink, true);

        assert_eq!(
            sink.lines(),
            vec![
                "renderTemplate running in script approval mode",
                "renderTemplate running in sandbox mode",
            ]
        );
    }
}
