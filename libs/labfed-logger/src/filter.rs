use tracing::{subscriber::Interest, Level, Metadata};
use tracing_subscriber::layer::{Context, Filter};

/// The console serves HTTP and fetches remote tool pages, so the client and
/// HTML parsing stacks chatter a lot below INFO. Their targets are muted
/// there; sqlx query echo is dropped entirely.
const NOISY_TARGETS: [&str; 6] = [
    "hyper::",
    "rustls::",
    "mio::",
    "want::",
    "html5ever::",
    "selectors::",
];

fn is_noisy(target: &str, level: &Level) -> bool {
    *level > Level::INFO && NOISY_TARGETS.iter().any(|prefix| target.starts_with(prefix))
}

pub struct GeneralFilter;

impl GeneralFilter {
    fn is_enabled(&self, metadata: &Metadata<'_>) -> bool {
        if is_noisy(metadata.target(), metadata.level()) {
            return false;
        }
        if cfg!(debug_assertions) {
            metadata.target() != "sqlx::query"
        } else {
            *metadata.level() <= Level::INFO
        }
    }
}

impl<S> Filter<S> for GeneralFilter {
    fn enabled(&self, metadata: &Metadata<'_>, _: &Context<'_, S>) -> bool {
        self.is_enabled(metadata)
    }

    fn callsite_enabled(&self, metadata: &'static Metadata<'static>) -> Interest {
        if self.is_enabled(metadata) {
            Interest::always()
        } else {
            Interest::never()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_noisy_targets_muted_below_info() {
        assert!(is_noisy("hyper::proto::h1::io", &Level::DEBUG));
        assert!(is_noisy("html5ever::tokenizer", &Level::TRACE));
        assert!(!is_noisy("hyper::proto::h1::io", &Level::INFO));
        assert!(!is_noisy("labfed_console::api", &Level::DEBUG));
    }
}
