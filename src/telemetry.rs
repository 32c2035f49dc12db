//! Telemetry initialization (tracing/tracing-subscriber).
//!
//! Behavior:
//! - LOG_LEVEL controls the filter (e.g. "debug" or detailed directives like
//!   "info,loader=debug,nav=debug,reqwest=warn").
//! - LOG_FORMAT selects "pretty" (default) or "json" structured logs.
//!
//! Notes:
//! - Logs go to stderr. Stdout carries the driver's JSON lines.
//! - We include targets in the output to tell the loader, nav and tutor apart.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new("info,lumina=debug,nav=debug,hyper=warn,reqwest=warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    // Choose JSON vs pretty; don't try to store different layer types.
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => {
            builder.json().init();
        }
        _ => {
            builder.init();
        }
    }
}

/// Test-only subscriber that counts events per (level, target).
#[cfg(test)]
pub mod capture {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    #[derive(Clone, Default)]
    pub struct Counts(Arc<Mutex<HashMap<(Level, String), usize>>>);

    impl Counts {
        pub fn get(&self, level: Level, target: &str) -> usize {
            self.0.lock().unwrap().get(&(level, target.to_string())).copied().unwrap_or(0)
        }

        pub fn total_at(&self, level: Level) -> usize {
            self.0.lock().unwrap().iter().filter(|((l, _), _)| *l == level).map(|(_, n)| n).sum()
        }
    }

    struct CountingLayer(Counts);

    impl<S: Subscriber> Layer<S> for CountingLayer {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let meta = event.metadata();
            let mut map = (self.0).0.lock().unwrap();
            *map.entry((*meta.level(), meta.target().to_string())).or_default() += 1;
        }
    }

    /// Run `f` with a counting subscriber installed for the current thread.
    pub fn with_counts<R>(f: impl FnOnce() -> R) -> (R, Counts) {
        let counts = Counts::default();
        let subscriber = tracing_subscriber::registry().with(CountingLayer(counts.clone()));
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, counts)
    }
}
