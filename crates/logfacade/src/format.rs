//! Plain-text line format
//!
//! Renders one entry per line as
//! `time="<rfc3339>" level=<level> msg=<message> key=value ...`
//! with no color escapes, whatever the destination is. Logger entries are
//! rendered directly; native `tracing` events reach the same layout through
//! the [`FormatEvent`] impl.

use crate::fields::push_pair;
use crate::level::Level;
use chrono::{Local, SecondsFormat};
use std::fmt;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

const FIELD_MESSAGE: &str = "message";

/// Line formatter shared by every logger
#[derive(Debug, Clone, Copy)]
pub struct TextFormat {
    timestamp: bool,
}

impl TextFormat {
    pub fn new() -> Self {
        Self { timestamp: true }
    }

    /// Leave out the `time=` column
    pub fn without_timestamp(mut self) -> Self {
        self.timestamp = false;
        self
    }

    /// Render one newline-terminated line
    ///
    /// `fields` is appended as-is and is expected to be already rendered
    /// `key=value` pairs (see [`render_fields`](crate::fields::render_fields)).
    pub fn render(&self, level: Level, message: &str, fields: &str) -> String {
        let mut line = String::with_capacity(64 + message.len() + fields.len());
        if self.timestamp {
            push_pair(
                &mut line,
                "time",
                &Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            );
        }
        push_pair(&mut line, "level", level.as_str());
        push_pair(&mut line, "msg", message);
        if !fields.is_empty() {
            line.push(' ');
            line.push_str(fields);
        }
        line.push('\n');
        line
    }
}

impl Default for TextFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, N> FormatEvent<S, N> for TextFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let level = Level::from_tracing(event.metadata().level());
        let line = self.render(
            level,
            visitor.message.as_deref().unwrap_or(""),
            &visitor.fields,
        );
        write!(writer, "{}", line)
    }
}

/// Splits a native event's fields into the message and `key=value` pairs
#[derive(Default)]
struct LineVisitor {
    message: Option<String>,
    fields: String,
}

impl LineVisitor {
    fn record_text(&mut self, field: &Field, text: String) {
        match field.name() {
            FIELD_MESSAGE => self.message = Some(text),
            name => push_pair(&mut self.fields, name, &text),
        }
    }
}

impl Visit for LineVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_text(field, format!("{:?}", value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_text(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_text(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_text(field, value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Destination, FanOut};
    use crate::test_capture::CaptureBuffer;

    fn capture_subscriber(format: TextFormat) -> (impl Subscriber + Send + Sync, CaptureBuffer) {
        let capture = CaptureBuffer::new();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .event_format(format)
            .with_writer(Destination::new(FanOut::single(Box::new(capture.clone()))))
            .finish();
        (subscriber, capture)
    }

    #[test]
    fn test_native_event_renders_fields() {
        let (subscriber, capture) = capture_subscriber(TextFormat::new().without_timestamp());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(user = "alice", attempts = 2, "login ok");
        });

        assert_eq!(
            capture.lines(),
            vec![r#"level=info msg="login ok" user=alice attempts=2"#]
        );
    }

    #[test]
    fn test_render_entry_line() {
        let format = TextFormat::new().without_timestamp();

        assert_eq!(
            format.render(Level::Fatal, "boom", "code=7"),
            "level=fatal msg=boom code=7\n"
        );
        assert_eq!(format.render(Level::Warn, "", ""), "level=warning msg=\"\"\n");
    }

    #[test]
    fn test_render_timestamp_is_rfc3339() {
        let line = TextFormat::new().render(Level::Info, "hi", "");

        let stamp = line
            .strip_prefix("time=\"")
            .and_then(|rest| rest.split('"').next())
            .unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
        assert!(line.ends_with(" level=info msg=hi\n"));
    }

    #[test]
    fn test_warn_tag_and_timestamp() {
        let (subscriber, capture) = capture_subscriber(TextFormat::new());

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("careful");
        });

        let line = capture.contents();
        assert!(line.starts_with("time=\""), "line was {line}");
        assert!(line.contains(" level=warning msg=careful"));
        assert!(!line.contains('\u{1b}'));
    }

    #[test]
    fn test_multiline_message_stays_on_one_line() {
        let (subscriber, capture) = capture_subscriber(TextFormat::new().without_timestamp());

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("first\nsecond");
        });

        assert_eq!(capture.lines(), vec![r#"level=info msg="first\nsecond""#]);
    }
}
