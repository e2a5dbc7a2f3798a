//! # LogWriter: `tracing` sink for lifecycle events
//!
//! Renders each [`Event`] through the `tracing` macros with structured fields.
//! The event's [`Severity`] picks the level; `Fatal` is logged at `ERROR` with
//! `fatal = true` since `tracing` has no fatal level.
//!
//! ## Example output (with `tracing_subscriber::fmt`)
//! ```text
//! INFO  unitvisor: starting unit="http"
//! INFO  unitvisor: shutdown-requested signal="SIGINT" timeout_ms=60000
//! INFO  unitvisor: stopping unit="http" timeout_ms=60000
//! ERROR unitvisor: failed unit="poller" fatal=true error="connection refused"
//! INFO  unitvisor: all-stopped
//! ```

use async_trait::async_trait;

use crate::events::{Event, Severity};
use crate::subscribers::Subscribe;

/// Event writer subscriber backed by `tracing`.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let label = e.kind.as_label();
        let unit = e.unit.as_deref();
        let signal = e.signal.as_deref();
        let error = e.reason.as_deref();
        let timeout_ms = e.timeout_ms;

        match e.severity {
            Severity::Info => {
                tracing::info!(target: "unitvisor", unit, signal, error, timeout_ms, "{label}")
            }
            Severity::Warn => {
                tracing::warn!(target: "unitvisor", unit, signal, error, timeout_ms, "{label}")
            }
            Severity::Error => {
                tracing::error!(target: "unitvisor", unit, signal, error, timeout_ms, "{label}")
            }
            Severity::Fatal => tracing::error!(
                target: "unitvisor",
                unit,
                signal,
                error,
                timeout_ms,
                fatal = true,
                "{label}"
            ),
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    use super::*;
    use crate::events::EventKind;

    type Records = Arc<Mutex<Vec<(tracing::Level, Vec<&'static str>)>>>;

    /// Records the level and declared field names of every `tracing` event.
    struct FieldNames(Records);

    impl<S: tracing::Subscriber> Layer<S> for FieldNames {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let meta = event.metadata();
            let names = meta.fields().iter().map(|f| f.name()).collect();
            self.0.lock().unwrap().push((*meta.level(), names));
        }
    }

    #[tokio::test]
    async fn every_level_carries_the_same_fields() {
        let records = Records::default();
        let _guard = tracing::subscriber::set_default(
            tracing_subscriber::registry().with(FieldNames(Arc::clone(&records))),
        );

        let writer = LogWriter::new();
        for severity in [Severity::Info, Severity::Warn, Severity::Error, Severity::Fatal] {
            let ev = Event::new(EventKind::UnitFailed)
                .with_unit("db")
                .with_reason("boom")
                .with_severity(severity);
            writer.on_event(&ev).await;
        }

        let records = records.lock().unwrap();
        assert_eq!(records.len(), 4);
        for (_, names) in records.iter() {
            for field in ["unit", "signal", "error", "timeout_ms"] {
                assert!(names.contains(&field), "missing {field} in {names:?}");
            }
        }
        assert_eq!(records[0].0, tracing::Level::INFO);
        assert_eq!(records[1].0, tracing::Level::WARN);
        assert!(records[3].1.contains(&"fatal"));
        assert!(!records[2].1.contains(&"fatal"));
    }
}
