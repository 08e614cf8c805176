//! Process-wide failure interception and normalization.
//!
//! [`install`] is called exactly once during startup, before any other
//! core operation; a second call is a no-op. It hooks uncaught panics at
//! the top of the process. Unhandled asynchronous failures have no
//! process-level hook to claim, so the host reports them through
//! [`report_unhandled_rejection`] wherever it observes a task failure.

use std::{
    panic::{self, PanicHookInfo},
    sync::{
        OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
};

use {
    anyhow::Error,
    serde_json::{Map, Value},
    tracing::{debug, error, warn},
    tracing_subscriber::EnvFilter,
};

use crate::error::{
    app_error::{AppError, ErrorKind},
    user_message::user_message,
};

static INSTALLED: OnceLock<()> = OnceLock::new();
static PANIC_HOOK_FIRES: AtomicUsize = AtomicUsize::new(0);

/// Panic messages containing any of these are noisy duplicates of
/// failures already surfaced elsewhere; the default hook (full backtrace
/// dump) is suppressed for them. The warning line is still emitted.
const SUPPRESSED_PATTERNS: &[&str] = &["Uncaught"];

/// Options for [`install_with`].
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Also initialize the global `tracing` subscriber, with call-site
    /// (file and line) capture for easier diagnosis. Best-effort: a
    /// subscriber installed earlier by the host wins.
    pub init_log_sink: bool,
}

/// Installs the global failure hooks with default options. Idempotent.
pub fn install() {
    install_with(InstallOptions::default());
}

/// Installs the global failure hooks. Idempotent: only the first call in
/// the process has any effect.
pub fn install_with(options: InstallOptions) {
    if INSTALLED.set(()).is_err() {
        return;
    }

    if options.init_log_sink {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_file(true)
            .with_line_number(true)
            .try_init();
    }

    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        PANIC_HOOK_FIRES.fetch_add(1, Ordering::SeqCst);
        let message = panic_message(info);
        match info.location() {
            Some(location) => warn!("uncaught panic at {location}: {message}"),
            None => warn!("uncaught panic: {message}"),
        }
        if !is_suppressed(&message) {
            previous(info);
        }
    }));

    debug!("global error handlers installed");
}

/// Whether [`install`] has already run in this process.
#[must_use]
pub fn is_installed() -> bool {
    INSTALLED.get().is_some()
}

/// Logs an asynchronous failure nobody awaited. Never suppresses.
pub fn report_unhandled_rejection(reason: &Error) {
    warn!("unhandled rejection: {reason:#}");
}

/// Normalizes any failure into an [`AppError`], logs it, and — unless
/// `silent` — also surfaces the user-facing sentence through the log
/// sink. Returns the normalized error so callers may branch further.
///
/// A typed [`AppError`] passes through unchanged; anything else is
/// wrapped as [`ErrorKind::Unknown`] with the original failure rendered
/// into `details["originalError"]`. The kind is never upgraded here.
pub fn handle_global_error(error: Error, silent: bool) -> AppError {
    let normalized = match error.downcast::<AppError>() {
        Ok(app_error) => app_error,
        Err(foreign) => {
            let message = foreign.to_string();
            let message = if message.is_empty() {
                "Unknown error occurred".to_string()
            } else {
                message
            };
            let mut details = Map::new();
            details.insert(
                "originalError".to_string(),
                Value::String(format!("{foreign:#}")),
            );
            AppError::with_details(message, ErrorKind::Unknown, details)
        }
    };

    let record = normalized.format();
    error!(record = ?record, "{normalized}");

    if !silent {
        error!("{}", user_message(&normalized));
    }

    normalized
}

fn is_suppressed(message: &str) -> bool {
    SUPPRESSED_PATTERNS
        .iter()
        .any(|pattern| message.contains(pattern))
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
    if let Some(message) = info.payload().downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = info.payload().downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
fn panic_hook_fires() -> usize {
    PANIC_HOOK_FIRES.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
    use std::panic::catch_unwind;

    use anyhow::anyhow;

    use crate::error::{
        app_error::{AppError, ErrorKind},
        interceptor::{handle_global_error, install, is_installed, panic_hook_fires},
    };

    #[test]
    fn test_install_is_idempotent() {
        install();
        install();
        assert!(is_installed());

        // The suppressed pattern keeps the default hook (and its
        // backtrace dump) out of the test output.
        let before = panic_hook_fires();
        let result = catch_unwind(|| panic!("Uncaught rehearsal failure"));
        assert!(result.is_err());

        // Exactly one registered hook fired despite the double install.
        assert_eq!(panic_hook_fires(), before + 1);
    }

    #[test]
    fn test_typed_error_passes_through_unchanged() {
        let normalized = handle_global_error(anyhow!(AppError::wallet("locked")), true);
        assert_eq!(normalized.kind, ErrorKind::Wallet);
        assert_eq!(normalized.message, "locked");
    }

    #[test]
    fn test_foreign_error_is_wrapped_as_unknown() {
        let normalized = handle_global_error(anyhow!("socket hang up"), true);
        assert_eq!(normalized.kind, ErrorKind::Unknown);
        assert_eq!(normalized.message, "socket hang up");
        assert_eq!(
            normalized.details.get("originalError"),
            Some(&serde_json::Value::String("socket hang up".to_string()))
        );
    }

    #[test]
    fn test_non_silent_returns_same_normalized_error() {
        let normalized = handle_global_error(anyhow!("anything"), false);
        assert_eq!(normalized.kind, ErrorKind::Unknown);
    }
}
