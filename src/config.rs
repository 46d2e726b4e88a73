use serde::Deserialize;
use std::env;

/// Knobs for the Stage 1 ILP solve.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub time_limit_seconds: f64,
    pub worker_hint: u32,
    pub random_seed: u32,
    /// Lower bound on the number of courses every teacher must teach.
    pub min_courses_per_teacher: u32,
    pub log_to_console: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_seconds: 30.0,
            worker_hint: 8,
            random_seed: 1234,
            min_courses_per_teacher: 1,
            log_to_console: false,
        }
    }
}

/// Knobs for the Stage 2 local search. Only `max_iterations` bounds the run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_iterations: usize,
    pub moves_per_neighborhood: usize,
    pub tabu_tenure: usize,
    pub initial_temperature: f64,
    pub initial_alpha: f64,
    /// (fast-cooling floor, slow-cooling ceiling)
    pub cooling_alpha_bounds: (f64, f64),
    pub alpha_step_up: f64,
    pub alpha_step_down: f64,
    pub stagnation_limit: usize,
    pub shake_count: usize,
    /// A restart applies `assignments / divisor` forced perturbations.
    pub restart_perturbation_divisor: usize,
    pub max_accepts_per_iteration: usize,
    pub recent_window: usize,
    pub revisit_threshold: u32,
    pub log_every: usize,
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1200,
            moves_per_neighborhood: 40,
            tabu_tenure: 150,
            initial_temperature: 1.0,
            initial_alpha: 0.98,
            cooling_alpha_bounds: (0.92, 0.995),
            alpha_step_up: 0.0006,
            alpha_step_down: 0.0009,
            stagnation_limit: 300,
            shake_count: 4,
            restart_perturbation_divisor: 12,
            max_accepts_per_iteration: 64,
            recent_window: 100,
            revisit_threshold: 3,
            log_every: 50,
            seed: None,
        }
    }
}

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl ServerConfig {
    /// Reads `SCHEDULER_ADDR`, falling back to [`DEFAULT_BIND_ADDR`].
    pub fn from_env() -> Self {
        Self {
            bind_addr: env::var("SCHEDULER_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        }
    }
}
