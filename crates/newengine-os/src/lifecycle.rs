use crate::error::{HostError, HostResult};

/// Entry-contract position of a [`HostContext`](crate::HostContext).
///
/// Phases only move forward, one step per call.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum Phase {
    Constructed,
    CmdlineSet,
    CoreInitialized,
    OsInitialized,
    OsFinalized,
    CoreFinalized,
}

impl Phase {
    #[inline]
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Constructed => Some(Phase::CmdlineSet),
            Phase::CmdlineSet => Some(Phase::CoreInitialized),
            Phase::CoreInitialized => Some(Phase::OsInitialized),
            Phase::OsInitialized => Some(Phase::OsFinalized),
            Phase::OsFinalized => Some(Phase::CoreFinalized),
            Phase::CoreFinalized => None,
        }
    }
}

/// Rejects `call` unless the host sits exactly in `expected`.
pub(crate) fn require(call: &'static str, actual: Phase, expected: Phase) -> HostResult<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(HostError::InvalidState {
            call,
            expected,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phases_walk_forward_to_the_end() {
        let mut phase = Phase::Constructed;
        let mut steps = 0;
        while let Some(next) = phase.next() {
            assert!(next > phase);
            phase = next;
            steps += 1;
        }
        assert_eq!(phase, Phase::CoreFinalized);
        assert_eq!(steps, 5);
    }

    #[test]
    fn test_require_reports_both_phases() {
        let err = require("initialize_os", Phase::CmdlineSet, Phase::CoreInitialized).unwrap_err();
        match err {
            HostError::InvalidState {
                call,
                expected,
                actual,
            } => {
                assert_eq!(call, "initialize_os");
                assert_eq!(expected, Phase::CoreInitialized);
                assert_eq!(actual, Phase::CmdlineSet);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(require("run", Phase::OsInitialized, Phase::OsInitialized).is_ok());
    }
}
