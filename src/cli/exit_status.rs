use std::process::ExitCode;

/// Exit status of a propbabel run.
///
/// - `Success` (0): every job succeeded, or the run was skipped
/// - `Failure` (1): the run completed but at least one job failed
/// - `Error` (2): the run could not start (invalid config, missing directory)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// Every job finished, or there was nothing to do.
    Success,
    /// The run finished but some jobs failed; their targets were left untouched.
    Failure,
    /// The run was aborted before any job started.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::from(ExitStatus::Success), ExitCode::from(0));
        assert_eq!(ExitCode::from(ExitStatus::Failure), ExitCode::from(1));
        assert_eq!(ExitCode::from(ExitStatus::Error), ExitCode::from(2));
    }
}
