//! Typed application error with a closed failure taxonomy.
//!
//! Every component that detects a domain-specific failure constructs the
//! correctly-kinded [`AppError`] at the failure site; the global
//! interceptor only ever assigns [`ErrorKind::Unknown`] to otherwise
//! untyped foreign failures, it never upgrades a kind.

use std::{
    backtrace::{Backtrace, BacktraceStatus},
    sync::Arc,
};

use {
    chrono::{DateTime, SecondsFormat, Utc},
    serde::Serialize,
    serde_json::{Map, Value},
    thiserror::Error,
};

/// Closed enumeration of failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Connectivity failures.
    Network,
    /// Wallet session or provider failures.
    Wallet,
    /// Failures of a submitted transaction.
    Transaction,
    /// Persistence failures.
    Storage,
    /// Domain-invariant violations.
    GameLogic,
    /// Identity or permission failures.
    Auth,
    /// Unclassified failures.
    Unknown,
}

impl ErrorKind {
    /// Wire name of the category, as emitted in formatted records.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Network => "NetworkError",
            ErrorKind::Wallet => "WalletError",
            ErrorKind::Transaction => "TransactionError",
            ErrorKind::Storage => "StorageError",
            ErrorKind::GameLogic => "GameLogicError",
            ErrorKind::Auth => "AuthenticationError",
            ErrorKind::Unknown => "UnknownError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified error value. Immutable once constructed.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// Failure category.
    pub kind: ErrorKind,
    /// Raw failure message.
    pub message: String,
    /// Arbitrary structured context attached at the failure site.
    pub details: Map<String, Value>,
    /// Construction instant.
    pub timestamp: DateTime<Utc>,
    trace: Option<Arc<Backtrace>>,
}

/// Controls what [`AppError::format_with`] includes in the record.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Include the captured backtrace in the record. Stack capture in
    /// release builds is a policy choice, so this stays configurable.
    pub include_stack: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            include_stack: cfg!(debug_assertions),
        }
    }
}

/// Structured record for logging or display, one per classified error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormattedError {
    /// Wire name of the failure category.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Raw failure message.
    pub message: String,
    /// Structured context from the failure site.
    pub details: Map<String, Value>,
    /// Construction instant, RFC 3339 with millisecond precision.
    pub timestamp: String,
    /// Captured backtrace, when enabled and available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl AppError {
    /// Creates an error with empty details, stamping the timestamp now.
    pub fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self::with_details(message, kind, Map::new())
    }

    /// Creates an error carrying structured context.
    pub fn with_details(
        message: impl Into<String>,
        kind: ErrorKind,
        details: Map<String, Value>,
    ) -> Self {
        // Capture honors RUST_BACKTRACE; disabled captures format to None.
        let trace = Backtrace::capture();
        Self {
            kind,
            message: message.into(),
            details,
            timestamp: Utc::now(),
            trace: Some(Arc::new(trace)),
        }
    }

    /// Connectivity failure.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(message, ErrorKind::Network)
    }

    /// Wallet session or provider failure.
    pub fn wallet(message: impl Into<String>) -> Self {
        Self::new(message, ErrorKind::Wallet)
    }

    /// Submitted-transaction failure.
    pub fn transaction(message: impl Into<String>) -> Self {
        Self::new(message, ErrorKind::Transaction)
    }

    /// Persistence failure.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(message, ErrorKind::Storage)
    }

    /// Domain-invariant violation.
    pub fn game_logic(message: impl Into<String>) -> Self {
        Self::new(message, ErrorKind::GameLogic)
    }

    /// Formats the error with the default (build-dependent) options.
    #[must_use]
    pub fn format(&self) -> FormattedError {
        self.format_with(&FormatOptions::default())
    }

    /// Formats the error into a structured record for logging or display.
    #[must_use]
    pub fn format_with(&self, options: &FormatOptions) -> FormattedError {
        let stack = if options.include_stack {
            self.trace
                .as_deref()
                .filter(|trace| trace.status() == BacktraceStatus::Captured)
                .map(Backtrace::to_string)
        } else {
            None
        };

        FormattedError {
            kind: self.kind.as_str(),
            message: self.message.clone(),
            details: self.details.clone(),
            timestamp: self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            stack,
        }
    }
}
