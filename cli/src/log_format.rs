//! Plain-text event formatter that tags each log line with the ids of its span scope.
//!
//! A whole game runs inside the `game` span, so every line of one run shares a `trace_id`
//! and lines from concurrent runs can be told apart in the log file.

use std::fmt;

use tracing_core::{Event, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::time::{FormatTime, SystemTime};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

/// `TIMESTAMP [trace_id=R span_id=S span=NAME] LEVEL target: fields`
///
/// The bracketed part is omitted for events outside any span. `trace_id` is the id of the
/// root span of the current scope.
pub struct TextWithSpanIds {
    timer: SystemTime,
    with_target: bool,
}

impl Default for TextWithSpanIds {
    fn default() -> Self {
        Self {
            timer: SystemTime,
            with_target: true,
        }
    }
}

impl TextWithSpanIds {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn with_target(mut self, on: bool) -> Self {
        self.with_target = on;
        self
    }
}

impl<S, N> FormatEvent<S, N> for TextWithSpanIds
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        self.timer.format_time(&mut writer)?;
        if let Some(span) = ctx.lookup_current() {
            let root = span
                .scope()
                .from_root()
                .next()
                .map(|root| root.id().into_u64())
                .unwrap_or_else(|| span.id().into_u64());
            write!(
                writer,
                " trace_id={} span_id={} span={}",
                root,
                span.id().into_u64(),
                span.name()
            )?;
        }

        let meta = event.metadata();
        write!(writer, " {}", meta.level())?;
        if self.with_target {
            write!(writer, " {}:", meta.target())?;
        }
        write!(writer, " ")?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
