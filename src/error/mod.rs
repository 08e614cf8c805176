//! Error classification and global interception using `thiserror` and `anyhow`.
//!
//! This module provides the closed failure taxonomy ([`AppError`]), the
//! mapping from failures to user-facing sentences, the process-wide
//! interception hooks, and fallback-on-failure execution.

pub mod app_error;
pub mod interceptor;
pub mod safe_invoke;
pub mod user_message;

pub use {
    app_error::{AppError, ErrorKind, FormatOptions, FormattedError},
    interceptor::{
        InstallOptions, handle_global_error, install, install_with, is_installed,
        report_unhandled_rejection,
    },
    safe_invoke::{safe_invoke, safe_invoke_with},
    user_message::{GENERIC_FALLBACK, user_message, user_message_for_foreign},
};
