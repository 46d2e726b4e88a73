use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Outcome reported by the Stage 1 solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolverStatus {
    Optimal,
    Feasible,
    Infeasible,
    TimeoutNoSolution,
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolverStatus::Optimal => "OPTIMAL",
            SolverStatus::Feasible => "FEASIBLE",
            SolverStatus::Infeasible => "INFEASIBLE",
            SolverStatus::TimeoutNoSolution => "TIMEOUT_NO_SOLUTION",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The problem data is malformed (unknown slot, oversized section, bad bounds...).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no feasible schedule exists for the given problem")]
    Infeasible,

    /// The solver ran out of time before finding any incumbent.
    #[error("solver time budget exhausted without a feasible schedule")]
    TimeoutNoIncumbent,

    #[error("solver error: {0}")]
    Solver(String),

    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl SchedulerError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        SchedulerError::InvalidInput(msg.into())
    }

    /// The solver status this failure corresponds to, if it came from the solver.
    pub fn solver_status(&self) -> Option<SolverStatus> {
        match self {
            SchedulerError::Infeasible => Some(SolverStatus::Infeasible),
            SchedulerError::TimeoutNoIncumbent => Some(SolverStatus::TimeoutNoSolution),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SchedulerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_status_mapping() {
        assert_eq!(
            SchedulerError::Infeasible.solver_status(),
            Some(SolverStatus::Infeasible)
        );
        assert_eq!(
            SchedulerError::TimeoutNoIncumbent.solver_status(),
            Some(SolverStatus::TimeoutNoSolution)
        );
        assert_eq!(SchedulerError::invalid("x").solver_status(), None);
    }

    #[test]
    fn test_status_display_matches_wire_names() {
        assert_eq!(SolverStatus::TimeoutNoSolution.to_string(), "TIMEOUT_NO_SOLUTION");
        assert_eq!(
            serde_json::to_string(&SolverStatus::Optimal).unwrap(),
            "\"OPTIMAL\""
        );
    }
}
