//! tracing `Layer` that formats events into single lines and fans them out
//! to the buffer, the optional rolling file and the optional sink.

use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex};

use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use crate::buffer::LogBuffer;
#[cfg(not(target_arch = "wasm32"))]
use crate::file::RollingFile;

/// Receives every formatted line, e.g. to forward to the browser console
pub type Sink = Arc<dyn Fn(Level, &str) + Send + Sync>;

pub struct RollingLayer {
    max_level: Level,
    buffer: Arc<LogBuffer>,
    #[cfg(not(target_arch = "wasm32"))]
    file: Option<Mutex<RollingFile>>,
    sink: Option<Sink>,
}

impl RollingLayer {
    pub fn new(buffer: Arc<LogBuffer>, max_level: Level) -> Self {
        Self {
            max_level,
            buffer,
            #[cfg(not(target_arch = "wasm32"))]
            file: None,
            sink: None,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_file(mut self, file: RollingFile) -> Self {
        self.file = Some(Mutex::new(file));
        self
    }

    pub fn with_sink(mut self, sink: Sink) -> Self {
        self.sink = Some(sink);
        self
    }

    fn emit(&self, level: Level, line: String) {
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(file) = &self.file {
            if let Ok(mut file) = file.lock() {
                // a failing disk must not take the app down
                let _ = file.write_line(&line);
            }
        }
        if let Some(sink) = &self.sink {
            sink(level, &line);
        }
        self.buffer.push(line);
    }
}

impl<S: Subscriber> Layer<S> for RollingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        // Level orders TRACE > DEBUG > INFO > WARN > ERROR
        if *meta.level() > self.max_level {
            return;
        }

        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let line = format_line(
            &Local::now().format("%H:%M:%S%.3f").to_string(),
            meta.level(),
            meta.target(),
            &visitor.message,
            &visitor.fields,
        );
        self.emit(*meta.level(), line);
    }
}

/// `[HH:MM:SS.mmm] LEVEL target: message key=value…`
pub fn format_line(time: &str, level: &Level, target: &str, message: &str, fields: &str) -> String {
    let mut line = format!("[{time}] {level} {target}: {message}");
    if !fields.is_empty() {
        if !message.is_empty() {
            line.push(' ');
        }
        line.push_str(fields);
    }
    line
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{name}={value}");
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), format_args!("{value}"));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field.name(), format_args!("{value:?}"));
        }
    }
}
