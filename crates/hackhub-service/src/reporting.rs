//! Error reporting sink for unexpected failures.

use tracing::error;

use hackhub_core::error::AppError;
use hackhub_core::result::AppResult;

use crate::error::{TeamError, TeamResult};

/// Receives failures that no caller is expected to handle.
///
/// Implementations must return promptly; they run inline on the request
/// path.
pub trait ErrorReporter: Send + Sync + std::fmt::Debug + 'static {
    /// Record an unexpected failure of `operation`.
    fn report(&self, operation: &'static str, error: &AppError);
}

/// Reporter that writes to the tracing subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorReporter;

impl ErrorReporter for TracingErrorReporter {
    fn report(&self, operation: &'static str, error: &AppError) {
        error!(
            operation = operation,
            kind = %error.kind,
            error = %error,
            source = ?error.source,
            "Unexpected failure in team engine"
        );
    }
}

/// Converts infrastructure results into team outcomes, reporting failures.
pub(crate) trait ReportExt<T> {
    /// Report any error and replace it with [`TeamError::Internal`].
    fn or_report(self, reporter: &dyn ErrorReporter, operation: &'static str) -> TeamResult<T>;
}

impl<T> ReportExt<T> for AppResult<T> {
    fn or_report(self, reporter: &dyn ErrorReporter, operation: &'static str) -> TeamResult<T> {
        self.map_err(|e| {
            reporter.report(operation, &e);
            TeamError::internal()
        })
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Reporter that remembers what it was given.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingReporter {
        pub(crate) reports: Mutex<Vec<(&'static str, String)>>,
    }

    impl ErrorReporter for RecordingReporter {
        fn report(&self, operation: &'static str, error: &AppError) {
            self.reports
                .lock()
                .unwrap()
                .push((operation, error.message.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingReporter;
    use super::*;

    #[test]
    fn test_or_report_hides_the_cause() {
        let reporter = RecordingReporter::default();
        let result: AppResult<()> = Err(AppError::database("connection reset"));

        let err = result.or_report(&reporter, "send_direct_invite").unwrap_err();
        assert_eq!(err, TeamError::internal());

        let reports = reporter.reports.lock().unwrap();
        assert_eq!(
            reports.as_slice(),
            &[("send_direct_invite", "connection reset".to_string())]
        );
    }

    #[test]
    fn test_or_report_passes_success_through() {
        let reporter = RecordingReporter::default();
        let value = AppResult::Ok(7).or_report(&reporter, "noop").unwrap();
        assert_eq!(value, 7);
        assert!(reporter.reports.lock().unwrap().is_empty());
    }
}
