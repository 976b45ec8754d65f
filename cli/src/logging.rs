//! Logging initialization: logs go only to a file (or are dropped), never to the console,
//! so stdout carries just the game transcript or the JSON result.
//!
//! Reads `RUST_LOG` (filter) and `LOG_FILE` (path) from env, which may come from `.env`
//! or the XDG config via `config::load_and_apply`.

use std::io::Write;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

const DEFAULT_FILTER: &str = "info,hyper_util=off,reqwest=warn";

/// - **RUST_LOG**: e.g. `info`, `twentyq=debug`, `twentyq::llm=trace`. Default: `info`.
/// - **LOG_FILE**: when set, logs are appended there as plain text with span/trace ids.
///   When unset, logs are dropped.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER));

    match std::env::var("LOG_FILE").ok().filter(|p| !p.trim().is_empty()) {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;
            let writer = std::sync::Mutex::new(StripAnsiWriter::new(file));
            let file_layer = tracing_subscriber::fmt::layer()
                .event_format(crate::log_format::TextWithSpanIds::new())
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(filter);
            tracing_subscriber::registry().with(file_layer).try_init()?;
            tracing::info!(path = %path, "twentyq logging to file");
        }
        None => {
            let sink_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::sink)
                .with_filter(filter);
            tracing_subscriber::registry().with(sink_layer).try_init()?;
        }
    }
    Ok(())
}

/// Strips ANSI CSI sequences (`ESC [ ... final`) so file logs stay plain text.
/// A sequence split across writes is buffered until its final byte arrives.
pub(crate) struct StripAnsiWriter<W> {
    inner: W,
    pending: Vec<u8>,
}

const ESC: u8 = 0x1b;
const MAX_PENDING: usize = 64;

impl<W: Write> StripAnsiWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self {
            inner,
            pending: Vec::with_capacity(16),
        }
    }

    fn flush_pending(&mut self) -> std::io::Result<()> {
        self.inner.write_all(&self.pending)?;
        self.pending.clear();
        Ok(())
    }

    fn push_escaped(&mut self, b: u8) -> std::io::Result<()> {
        match self.pending.len() {
            1 => {
                self.pending.push(b);
                if b != b'[' {
                    self.flush_pending()?;
                }
            }
            _ if (0x40..=0x7e).contains(&b) => self.pending.clear(),
            _ if b.is_ascii_digit() || matches!(b, b';' | b'?' | b':') => {
                self.pending.push(b);
                if self.pending.len() > MAX_PENDING {
                    self.flush_pending()?;
                }
            }
            _ => {
                self.flush_pending()?;
                self.inner.write_all(&[b])?;
            }
        }
        Ok(())
    }
}

impl<W: Write> Write for StripAnsiWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut rest = buf;
        while !rest.is_empty() {
            if self.pending.is_empty() {
                match rest.iter().position(|&b| b == ESC) {
                    Some(i) => {
                        self.inner.write_all(&rest[..i])?;
                        self.pending.push(ESC);
                        rest = &rest[i + 1..];
                    }
                    None => {
                        self.inner.write_all(rest)?;
                        break;
                    }
                }
            } else {
                self.push_escaped(rest[0])?;
                rest = &rest[1..];
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.pending.is_empty() {
            self.flush_pending()?;
        }
        self.inner.flush()
    }
}
