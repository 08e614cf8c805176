//! Fallback-on-failure execution of fallible operations.

use std::fmt::Display;

use tracing::error;

/// Runs `operation`, returning its value on success and `fallback` on
/// failure. The failure is logged through the default sink and never
/// propagated.
pub fn safe_invoke<T, E, F>(operation: F, fallback: T) -> T
where
    F: FnOnce() -> Result<T, E>,
    E: Display,
{
    safe_invoke_with(operation, fallback, |failure| error!("{failure}"))
}

/// Runs `operation`, returning its value on success and `fallback` on
/// failure. On failure `on_error` is invoked exactly once with the
/// failure value; the failure itself is never propagated.
pub fn safe_invoke_with<T, E, F, H>(operation: F, fallback: T, on_error: H) -> T
where
    F: FnOnce() -> Result<T, E>,
    H: FnOnce(E),
{
    match operation() {
        Ok(value) => value,
        Err(failure) => {
            on_error(failure);
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use crate::error::safe_invoke::{safe_invoke, safe_invoke_with};

    #[test]
    fn test_failure_yields_fallback_and_one_handler_call() {
        let calls = Cell::new(0_u32);
        let result = safe_invoke_with(
            || Err::<i32, &str>("boom"),
            42,
            |failure| {
                assert_eq!(failure, "boom");
                calls.set(calls.get() + 1);
            },
        );
        assert_eq!(result, 42);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_success_skips_handler() {
        let calls = Cell::new(0_u32);
        let result = safe_invoke_with(|| Ok::<i32, &str>(7), 42, |_| calls.set(calls.get() + 1));
        assert_eq!(result, 7);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_default_handler_variant_returns_fallback() {
        assert_eq!(safe_invoke(|| Err::<i32, &str>("boom"), 42), 42);
        assert_eq!(safe_invoke(|| Ok::<i32, &str>(7), 42), 7);
    }
}
