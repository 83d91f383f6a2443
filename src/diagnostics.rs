// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects warnings that shouldn't fail a command but should be shown to users.

/// Collects non-fatal warnings during deployment operations.
#[derive(Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Cancelling a timed-out deployment failed.
    pub fn cancel_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::CancelFailed,
            message: message.into(),
        }
    }

    /// The orchestrator answered a request with a non-2xx status.
    pub fn unexpected_status(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::UnexpectedStatus,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Cancel request after a timeout did not go through.
    CancelFailed,
    /// Non-2xx response that does not abort the command.
    UnexpectedStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_warnings_in_order() {
        let mut diag = Diagnostics::default();
        assert!(!diag.has_warnings());

        diag.warn(Warning::unexpected_status("restart returned 409"));
        diag.warn(Warning::cancel_failed("connection refused"));

        let kinds: Vec<_> = diag.warnings().iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            vec![WarningKind::UnexpectedStatus, WarningKind::CancelFailed]
        );
    }
}
