// Crash screen logging
// `log` facade backend that writes bounded lines to a registered output sink

use core::fmt::{self, Write};

use heapless::String;
use lazy_static::lazy_static;
use log::{Level, LevelFilter, Log, Metadata, Record};
use spin::Mutex;

use crate::error::{CrashScreenError, Result};

/// Longest log line; longer messages are cut short
pub const LOG_LINE_CAPACITY: usize = 256;

/// One formatted log line
pub type LogLine = String<LOG_LINE_CAPACITY>;

/// Destination for log lines (serial port, memory ring, debugger channel...)
pub trait LogOutput: Send {
    fn write_line(&mut self, line: &str);

    fn flush(&mut self) {}

    fn name(&self) -> &str;
}

lazy_static! {
    static ref OUTPUT: Mutex<Option<&'static mut dyn LogOutput>> = Mutex::new(None);
}

/// `log::Log` implementation used by the crash screen
pub struct CrashLogger;

static LOGGER: CrashLogger = CrashLogger;

/// Writer that keeps every whole character that fits and drops the rest
struct TruncatingWriter<'a> {
    line: &'a mut LogLine,
    full: bool,
}

impl Write for TruncatingWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.full {
            return Ok(());
        }

        for ch in s.chars() {
            if self.line.push(ch).is_err() {
                self.full = true;
                break;
            }
        }
        Ok(())
    }
}

/// Format a record as `[LEVEL] target: message`, truncated to the line capacity
pub fn format_line(level: Level, target: &str, args: fmt::Arguments<'_>) -> LogLine {
    let mut line = LogLine::new();
    let mut writer = TruncatingWriter { line: &mut line, full: false };
    let _ = write!(writer, "[{}] {}: {}", level, target, args);
    line
}

impl Log for CrashLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = format_line(record.level(), record.target(), *record.args());

        // never spin here: the fault path may log while the output is held
        if let Some(mut output) = OUTPUT.try_lock() {
            if let Some(output) = output.as_mut() {
                output.write_line(&line);
            }
        }
    }

    fn flush(&self) {
        if let Some(mut output) = OUTPUT.try_lock() {
            if let Some(output) = output.as_mut() {
                output.flush();
            }
        }
    }
}

/// Install the crash screen logger writing to `output` at `level` and above
pub fn init(output: &'static mut dyn LogOutput, level: LevelFilter) -> Result<()> {
    log::set_logger(&LOGGER).map_err(|_| CrashScreenError::LoggerAlreadySet)?;
    log::set_max_level(level);
    *OUTPUT.lock() = Some(output);

    log::info!("logging initialized at {}", level);
    Ok(())
}
