use std::panic::{catch_unwind, AssertUnwindSafe};

/// What a worker does when a task panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanicStrategy {
    /// Bring the whole process down.
    Abort,
    /// Swallow the panic; only the observer hears about it.
    Isolate,
    /// Log the panic at error level and keep the worker running.
    #[default]
    LogAndContinue,
}

/// Runs tasks under `catch_unwind` and applies a [`PanicStrategy`] to
/// whatever escapes. Counting is left to the pool's metrics.
#[derive(Debug, Clone, Copy)]
pub struct PanicHandler {
    strategy: PanicStrategy,
}

impl PanicHandler {
    pub fn new(strategy: PanicStrategy) -> Self {
        Self { strategy }
    }

    /// Run `f`, trapping any panic that escapes it.
    pub fn execute<F, R>(&self, f: F) -> Result<R, PanicInfo>
    where
        F: FnOnce() -> R,
    {
        let payload = match catch_unwind(AssertUnwindSafe(f)) {
            Ok(result) => return Ok(result),
            Err(payload) => payload,
        };

        let info = PanicInfo::from_payload(payload);
        match self.strategy {
            PanicStrategy::Abort => {
                tracing::error!(reason = %info.message, "task panicked, aborting process");
                std::process::abort();
            }
            PanicStrategy::LogAndContinue => {
                tracing::error!(reason = %info.message, "task panicked");
            }
            PanicStrategy::Isolate => {}
        }

        Err(info)
    }
}

impl Default for PanicHandler {
    fn default() -> Self {
        Self::new(PanicStrategy::default())
    }
}

#[derive(Debug, Clone)]
pub struct PanicInfo {
    pub message: String,
}

impl PanicInfo {
    pub(crate) fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        Self { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolate_returns_message() {
        let handler = PanicHandler::new(PanicStrategy::Isolate);

        let result = handler.execute(|| {
            panic!("test panic");
        });

        assert_eq!(result.unwrap_err().message, "test panic");
    }

    #[test]
    fn test_success_passes_value_through() {
        let handler = PanicHandler::new(PanicStrategy::Isolate);
        assert_eq!(handler.execute(|| 42).unwrap(), 42);
    }

    #[test]
    fn test_formatted_panic_message() {
        let handler = PanicHandler::default();
        let n = 7;

        let err = handler.execute(|| panic!("bad input {}", n)).unwrap_err();
        assert_eq!(err.message, "bad input 7");
    }

    #[test]
    fn test_handler_reusable_after_panic() {
        let handler = PanicHandler::new(PanicStrategy::LogAndContinue);

        for i in 0..5 {
            assert!(handler.execute(|| panic!("round {}", i)).is_err());
        }
        assert_eq!(handler.execute(|| "still fine").unwrap(), "still fine");
    }

    #[test]
    fn test_non_string_payload() {
        let handler = PanicHandler::new(PanicStrategy::Isolate);
        let err = handler
            .execute(|| std::panic::panic_any(17u32))
            .unwrap_err();
        assert_eq!(err.message, "Unknown panic");
    }
}
