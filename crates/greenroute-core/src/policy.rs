//! Must-succeed vs best-effort side effects.

use crate::error::Result;

/// How a failed remote call affects the enclosing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPolicy {
    /// The failure aborts the operation.
    Required,
    /// The failure is logged at WARN and the operation continues.
    BestEffort,
}

impl CallPolicy {
    /// Applies the policy to a call result.
    ///
    /// `Required` propagates the error; `BestEffort` turns it into `Ok(None)`.
    pub fn settle<T>(self, operation: &str, result: Result<T>) -> Result<Option<T>> {
        match (self, result) {
            (_, Ok(value)) => Ok(Some(value)),
            (CallPolicy::Required, Err(err)) => Err(err),
            (CallPolicy::BestEffort, Err(err)) => {
                tracing::warn!(operation, error = %err, "best-effort call failed, continuing");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RouteError;

    #[test]
    fn test_required_propagates() {
        let result: Result<u8> = Err(RouteError::network("down"));
        assert!(CallPolicy::Required.settle("complete stop", result).is_err());
    }

    #[test]
    fn test_best_effort_swallows() {
        let result: Result<u8> = Err(RouteError::timeout("end trip", 30));
        assert_eq!(CallPolicy::BestEffort.settle("end trip", result).unwrap(), None);
        assert_eq!(CallPolicy::BestEffort.settle("end trip", Ok(3)).unwrap(), Some(3));
    }
}
