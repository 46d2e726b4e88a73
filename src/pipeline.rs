use crate::config::{SearchConfig, SolverConfig};
use crate::data::ProblemData;
use crate::error::{Result, SolverStatus};
use crate::search::{self, score};
use crate::solution::OptimalSolution;
use crate::solver::build_initial_solution;
use crate::validate;
use log::{error, info};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct ScheduleReport {
    /// Status of the Stage 1 solve.
    pub status: SolverStatus,
    pub initial_objective: i64,
    pub solution: OptimalSolution,
}

/// Builds an initial schedule with the ILP model and refines it with local search.
pub fn schedule(
    data: &ProblemData,
    solver_config: &SolverConfig,
    search_config: &SearchConfig,
) -> Result<ScheduleReport> {
    let start = Instant::now();
    let (initial, status) = build_initial_solution(data, solver_config)?;
    let initial_objective = score(&initial, data);
    info!(
        "Initial solution ({}) with objective {} found in {:?}",
        status,
        initial_objective,
        start.elapsed()
    );

    let solution = search::optimize(data, &initial, search_config)?;

    if let Err(violations) = validate::check(data, &solution.solution) {
        for v in &violations {
            error!("Schedule violates a hard constraint: {v}");
        }
        debug_assert!(violations.is_empty(), "infeasible schedule returned");
    }

    info!(
        "Schedule complete: objective {} -> {} in {:?}",
        initial_objective,
        solution.objective_value,
        start.elapsed()
    );
    Ok(ScheduleReport {
        status,
        initial_objective,
        solution,
    })
}
