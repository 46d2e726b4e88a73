//! Stage 2: tabu-guided variable neighbourhood search with adaptive annealing.
//!
//! The engine owns all mutable search state (working solution, best solution,
//! tabu memory, move history, temperature) and applies one accepted move at a
//! time. Each outer iteration scans the neighbourhoods weakest first, restarting
//! the scan after every accepted move, shakes the solution when nothing was
//! accepted, cools, and falls back to the best solution after a long stagnation.

use crate::config::SearchConfig;
use crate::data::ProblemData;
use crate::error::{Result, SchedulerError};
use crate::moves::{MoveSignature, Neighborhood};
use crate::solution::{InitialSolution, OptimalSolution, Solution};
use crate::validate;
use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet, VecDeque};

/// How often each move signature has been accepted.
#[derive(Debug, Clone, Default)]
pub struct MoveHistory {
    counts: HashMap<MoveSignature, u32>,
    revisit_threshold: u32,
}

impl MoveHistory {
    pub fn new(revisit_threshold: u32) -> Self {
        Self {
            counts: HashMap::new(),
            revisit_threshold,
        }
    }

    pub fn count(&self, signature: &MoveSignature) -> u32 {
        self.counts.get(signature).copied().unwrap_or(0)
    }

    pub fn record(&mut self, signature: MoveSignature) {
        *self.counts.entry(signature).or_insert(0) += 1;
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Penalty for a move applied more often than the threshold.
    pub fn penalty(&self, signature: &MoveSignature) -> i64 {
        let count = self.count(signature);
        count.saturating_sub(self.revisit_threshold) as i64
    }
}

/// FIFO of recently accepted signatures with O(1) membership.
#[derive(Debug, Clone)]
pub struct TabuList {
    tenure: usize,
    queue: VecDeque<MoveSignature>,
    set: HashSet<MoveSignature>,
}

impl TabuList {
    pub fn new(tenure: usize) -> Self {
        Self {
            tenure,
            queue: VecDeque::with_capacity(tenure),
            set: HashSet::with_capacity(tenure),
        }
    }

    pub fn contains(&self, signature: &MoveSignature) -> bool {
        self.set.contains(signature)
    }

    /// Makes `signature` the most recent entry, renewing its tenure if it is already tabu.
    pub fn push(&mut self, signature: MoveSignature) {
        if self.tenure == 0 {
            return;
        }
        if !self.set.insert(signature) {
            self.queue.retain(|s| *s != signature);
        }
        self.queue.push_back(signature);
        while self.queue.len() > self.tenure {
            if let Some(oldest) = self.queue.pop_front() {
                self.set.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

/// Course preference plus start-slot time preference over all assignments.
pub fn score(solution: &Solution, data: &ProblemData) -> i64 {
    solution
        .assignments
        .iter()
        .map(|a| data.course_pref(a.teacher, a.course) + data.time_pref(a.teacher, a.day, a.period))
        .sum()
}

/// [`score`] minus the revisit penalty of the move that produced `solution`.
pub fn evaluate(
    solution: &Solution,
    data: &ProblemData,
    history: &MoveHistory,
    signature: Option<&MoveSignature>,
) -> i64 {
    score(solution, data) - signature.map_or(0, |sig| history.penalty(sig))
}

fn std_dev(values: &VecDeque<i64>) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().map(|&v| v as f64).sum::<f64>() / n;
    let var = values.iter().map(|&v| (v as f64 - mean).powi(2)).sum::<f64>() / n;
    var.sqrt()
}

pub struct LocalSearch<'a, R: Rng> {
    data: &'a ProblemData,
    config: SearchConfig,
    rng: R,
    tabu: TabuList,
    history: MoveHistory,
    /// Scores of the most recently accepted candidates.
    recent: VecDeque<i64>,
    temperature: f64,
    alpha: f64,
    current: Solution,
    current_score: i64,
    best: Solution,
    best_score: i64,
    stagnation: usize,
}

impl<'a, R: Rng> LocalSearch<'a, R> {
    /// Fails with [`SchedulerError::InvalidInput`] unless `initial` satisfies every hard constraint.
    pub fn new(
        data: &'a ProblemData,
        initial: InitialSolution,
        config: SearchConfig,
        rng: R,
    ) -> Result<Self> {
        if let Err(violations) = validate::check(data, &initial) {
            warn!("Rejecting initial solution with {} violations", violations.len());
            let listed = violations.iter().map(|v| v.to_string()).collect::<Vec<_>>();
            return Err(SchedulerError::invalid(format!(
                "initial solution is not feasible: {}",
                listed.join("; ")
            )));
        }
        let initial_score = score(&initial, data);
        Ok(Self {
            data,
            tabu: TabuList::new(config.tabu_tenure),
            history: MoveHistory::new(config.revisit_threshold),
            recent: VecDeque::with_capacity(config.recent_window),
            temperature: config.initial_temperature,
            alpha: config.initial_alpha,
            best: initial.clone(),
            best_score: initial_score,
            current: initial,
            current_score: initial_score,
            stagnation: 0,
            config,
            rng,
        })
    }

    pub fn current(&self) -> &Solution {
        &self.current
    }

    pub fn best(&self) -> &Solution {
        &self.best
    }

    pub fn best_score(&self) -> i64 {
        self.best_score
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Accepted moves since the last new best or restart.
    pub fn stagnation(&self) -> usize {
        self.stagnation
    }

    pub fn tabu(&self) -> &TabuList {
        &self.tabu
    }

    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// Runs the full iteration budget and returns the best solution found.
    pub fn run(mut self) -> OptimalSolution {
        for iteration in 0..self.config.max_iterations {
            self.step();
            if self.config.log_every > 0 && iteration % self.config.log_every == 0 {
                info!(
                    "Iter {}, best {}, current {}, temp {:.4}, alpha {:.4}, tabu {}, history {}",
                    iteration,
                    self.best_score,
                    self.current_score,
                    self.temperature,
                    self.alpha,
                    self.tabu.len(),
                    self.history.len()
                );
            }
        }

        let mut solution = self.best;
        solution.assignments.sort();
        let objective_value = score(&solution, self.data);
        info!(
            "Local search finished. Best objective: {}, assignments: {}",
            objective_value,
            solution.len()
        );
        OptimalSolution {
            solution,
            objective_value,
        }
    }

    /// One outer iteration: scan, shake if idle, cool, restart if stagnating.
    /// Returns whether the scan accepted a move.
    pub fn step(&mut self) -> bool {
        let accepted = self.scan();
        if !accepted {
            self.shake();
        }
        self.cool(accepted);
        if self.stagnation > self.config.stagnation_limit {
            self.restart();
        }
        accepted
    }

    fn scan(&mut self) -> bool {
        let data = self.data;
        let mut accepted = 0;
        let mut nb = 0;
        while nb < Neighborhood::ALL.len() && accepted < self.config.max_accepts_per_iteration {
            let neighborhood = Neighborhood::ALL[nb];
            let mut accepted_here = false;
            for _ in 0..self.config.moves_per_neighborhood {
                let mut candidate = self.current.clone();
                let Some(sig) = neighborhood.try_move(&mut candidate, data, &mut self.rng) else {
                    continue;
                };
                let candidate_score = evaluate(&candidate, data, &self.history, Some(&sig));
                if !self.admissible(&sig, candidate_score) {
                    continue;
                }
                if self.metropolis(candidate_score - self.current_score) {
                    trace!("{neighborhood} accepted with score {candidate_score}");
                    self.accept(candidate, candidate_score, sig);
                    accepted_here = true;
                    break;
                }
            }
            if accepted_here {
                accepted += 1;
                nb = 0;
            } else {
                nb += 1;
            }
        }
        accepted > 0
    }

    /// Forced strong moves, accepted by the metropolis rule regardless of tabu status.
    fn shake(&mut self) {
        let data = self.data;
        for _ in 0..self.config.shake_count {
            let mut candidate = self.current.clone();
            let rng = &mut self.rng;
            let sig = [
                Neighborhood::BlockRelocate,
                Neighborhood::TeacherSwap,
                Neighborhood::PairSwap,
            ]
            .into_iter()
            .find_map(|nb| nb.try_move(&mut candidate, data, &mut *rng));
            let Some(sig) = sig else {
                continue;
            };
            let candidate_score = evaluate(&candidate, data, &self.history, Some(&sig));
            if self.metropolis(candidate_score - self.current_score) {
                trace!("shake accepted with score {candidate_score}");
                self.accept(candidate, candidate_score, sig);
                break;
            }
        }
    }

    /// Aspiration: a tabu move is only admissible when it beats the best.
    fn admissible(&self, sig: &MoveSignature, candidate_score: i64) -> bool {
        !self.tabu.contains(sig) || candidate_score > self.best_score
    }

    /// Blend of the cooling temperature and the volatility of recent scores.
    fn adaptive_temperature(&self) -> f64 {
        0.25 * self.temperature + 0.75 * (0.01 + std_dev(&self.recent))
    }

    fn metropolis(&mut self, delta: i64) -> bool {
        if delta >= 0 {
            return true;
        }
        let probability = (delta as f64 / self.adaptive_temperature()).exp();
        self.rng.random::<f64>() < probability
    }

    fn accept(&mut self, candidate: Solution, candidate_score: i64, sig: MoveSignature) {
        self.current = candidate;
        self.current_score = candidate_score;
        self.history.record(sig);
        self.tabu.push(sig);

        if self.config.recent_window > 0 {
            if self.recent.len() == self.config.recent_window {
                self.recent.pop_front();
            }
            self.recent.push_back(candidate_score);
        }

        if candidate_score > self.best_score {
            debug!("New best {} (was {})", candidate_score, self.best_score);
            self.best = self.current.clone();
            self.best_score = candidate_score;
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }
    }

    fn cool(&mut self, accepted: bool) {
        let (floor, ceiling) = self.config.cooling_alpha_bounds;
        self.temperature *= self.alpha;
        self.alpha = if accepted {
            (self.alpha + self.config.alpha_step_up).min(ceiling)
        } else {
            (self.alpha - self.config.alpha_step_down).max(floor)
        };
    }

    /// Back to the best solution, reordered and lightly perturbed.
    fn restart(&mut self) {
        let data = self.data;
        debug!(
            "Restarting from best {} after {} non-improving moves",
            self.best_score, self.stagnation
        );
        self.current = self.best.clone();
        self.stagnation = 0;
        self.current.assignments.shuffle(&mut self.rng);
        let kicks = match self.config.restart_perturbation_divisor {
            0 => 0,
            divisor => self.current.len() / divisor,
        };
        for _ in 0..kicks {
            Neighborhood::SingleChange.try_move(&mut self.current, data, &mut self.rng);
        }
        self.current_score = score(&self.current, data);
    }
}

/// Refines `initial` within the configured iteration budget.
///
/// Seeded from `config.seed` when given, from the OS otherwise. An infeasible
/// `initial` is rejected as invalid input.
pub fn optimize(
    data: &ProblemData,
    initial: &InitialSolution,
    config: &SearchConfig,
) -> Result<OptimalSolution> {
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    Ok(LocalSearch::new(data, initial.clone(), config.clone(), rng)?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_problem;
    use crate::solution::Assignment;
    use crate::validate;

    fn a(course: usize, section: usize, teacher: usize, day: usize, period: usize) -> Assignment {
        Assignment { course, section, teacher, day, period }
    }

    fn two_teacher_problem() -> ProblemData {
        load_problem(
            r#"{
                "teachers": [
                    {"id": "A", "eligible_courses": ["c"], "course_preferences": {"c": 5},
                     "day_time_preferences": {"Mon": {"P1": 10}}},
                    {"id": "B", "eligible_courses": ["c"], "course_preferences": {"c": 2}}
                ],
                "courses": [{"id": "c", "sections": [{"id": "s"}]}],
                "classrooms": {
                    "days": ["Mon", "Tue"],
                    "periods": ["P1", "P2"],
                    "classrooms_per_slot": {"Mon": {"P1": 1, "P2": 1}, "Tue": {"P1": 1, "P2": 1}}
                }
            }"#,
        )
        .unwrap()
    }

    fn busy_problem() -> ProblemData {
        load_problem(
            r#"{
                "teachers": [
                    {"id": "t1", "max_courses": 2, "eligible_courses": ["math", "art"],
                     "course_preferences": {"math": 5, "art": 1},
                     "day_time_preferences": {"Tue": {"P1": 6, "P3": 2}}},
                    {"id": "t2", "max_courses": 2, "eligible_courses": ["math", "art"],
                     "course_preferences": {"math": 2, "art": 4},
                     "day_time_preferences": {"Mon": {"P3": 3}}},
                    {"id": "t3", "max_courses": 1, "eligible_courses": ["art"],
                     "course_preferences": {"art": 3}}
                ],
                "courses": [
                    {"id": "math", "min_teachers": 1, "max_teachers": 2,
                     "sections": [{"id": "m1", "required_periods": 2}, {"id": "m2"}]},
                    {"id": "art", "min_teachers": 1, "max_teachers": 2,
                     "sections": [{"id": "a1"}, {"id": "a2"}]}
                ],
                "classrooms": {
                    "days": ["Mon", "Tue"],
                    "periods": ["P1", "P2", "P3"],
                    "classrooms_per_slot": {
                        "Mon": {"P1": 2, "P2": 2, "P3": 1},
                        "Tue": {"P1": 1, "P2": 0, "P3": 2}
                    }
                }
            }"#,
        )
        .unwrap()
    }

    fn busy_initial() -> Solution {
        Solution::new(vec![
            a(0, 0, 0, 0, 0),
            a(0, 1, 1, 1, 0),
            a(1, 0, 2, 0, 1),
            a(1, 1, 1, 0, 2),
        ])
    }

    fn config(max_iterations: usize) -> SearchConfig {
        SearchConfig {
            max_iterations,
            moves_per_neighborhood: 10,
            stagnation_limit: 30,
            seed: Some(42),
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_evaluate_is_deterministic_and_penalises_revisits() {
        let data = busy_problem();
        let sol = busy_initial();
        let sig = MoveSignature::new(sol.assignments[0], sol.assignments[1]);
        let mut history = MoveHistory::new(3);

        let base = evaluate(&sol, &data, &history, None);
        // 5 + 2 + 3 + (4 + 3)
        assert_eq!(base, 17);
        assert_eq!(evaluate(&sol, &data, &history, None), base);

        for _ in 0..3 {
            history.record(sig);
        }
        assert_eq!(evaluate(&sol, &data, &history, Some(&sig)), base);
        history.record(sig);
        history.record(sig);
        assert_eq!(evaluate(&sol, &data, &history, Some(&sig)), base - 2);
        assert_eq!(evaluate(&sol, &data, &history, Some(&sig)), base - 2);
    }

    #[test]
    fn test_tabu_list_evicts_oldest() {
        let x = a(0, 0, 0, 0, 0);
        let sigs: Vec<MoveSignature> = (0..3).map(|p| MoveSignature::new(x, a(0, 0, 0, 1, p))).collect();
        let mut tabu = TabuList::new(2);
        tabu.push(sigs[0]);
        tabu.push(sigs[1]);
        tabu.push(sigs[1]);
        assert_eq!(tabu.len(), 2);
        tabu.push(sigs[2]);
        assert!(!tabu.contains(&sigs[0]));
        assert!(tabu.contains(&sigs[1]));
        assert!(tabu.contains(&sigs[2]));

        let mut disabled = TabuList::new(0);
        disabled.push(sigs[0]);
        assert!(disabled.is_empty());
    }

    #[test]
    fn test_zero_budget_returns_initial_score() {
        let data = busy_problem();
        let initial = busy_initial();
        let result = optimize(&data, &initial, &config(0)).unwrap();
        assert_eq!(result.solution, initial);
        assert_eq!(
            result.objective_value,
            evaluate(&initial, &data, &MoveHistory::default(), None)
        );
    }

    #[test]
    fn test_optimal_start_is_kept() {
        let data = two_teacher_problem();
        let initial = Solution::new(vec![a(0, 0, 0, 0, 0)]);
        let mut search =
            LocalSearch::new(&data, initial.clone(), config(0), StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(search.best_score(), 15);
        for _ in 0..200 {
            search.step();
            assert_eq!(search.best_score(), 15);
        }
        assert_eq!(search.best(), &initial);
        let result = search.run();
        assert_eq!(result.objective_value, 15);
    }

    #[test]
    fn test_search_finds_preferred_slot() {
        let data = two_teacher_problem();
        // teacher B on Tue/P2 scores 2
        let initial = Solution::new(vec![a(0, 0, 1, 1, 1)]);
        let result = optimize(&data, &initial, &config(50)).unwrap();
        assert_eq!(result.objective_value, 15);
        assert_eq!(result.solution.assignments, vec![a(0, 0, 0, 0, 0)]);
    }

    #[test]
    fn test_best_is_monotonic_and_current_stays_feasible() {
        let data = busy_problem();
        let mut search =
            LocalSearch::new(&data, busy_initial(), config(0), StdRng::seed_from_u64(7)).unwrap();
        let mut last_best = search.best_score();
        for _ in 0..150 {
            search.step();
            assert!(search.best_score() >= last_best);
            last_best = search.best_score();
            if let Err(violations) = validate::check(&data, search.current()) {
                panic!("current solution broke constraints: {violations:?}");
            }
            let closed = search
                .current()
                .assignments
                .iter()
                .any(|x| x.block(&data).any(|slot| slot == (1, 1)));
            assert!(!closed);
        }
        assert!(validate::check(&data, search.best()).is_ok());
        assert!(last_best >= 17);
    }

    #[test]
    fn test_alpha_stays_within_bounds() {
        let data = busy_problem();
        let cfg = config(0);
        let (floor, ceiling) = cfg.cooling_alpha_bounds;
        let mut search =
            LocalSearch::new(&data, busy_initial(), cfg, StdRng::seed_from_u64(9)).unwrap();
        let mut last_temperature = search.temperature();
        for _ in 0..100 {
            search.step();
            assert!(search.alpha() >= floor && search.alpha() <= ceiling);
            assert!(search.temperature() < last_temperature);
            last_temperature = search.temperature();
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let data = busy_problem();
        let first = optimize(&data, &busy_initial(), &config(40)).unwrap();
        let second = optimize(&data, &busy_initial(), &config(40)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_tabu_push_renews_tenure() {
        let x = a(0, 0, 0, 0, 0);
        let sigs: Vec<MoveSignature> = (0..3).map(|p| MoveSignature::new(x, a(0, 0, 0, 1, p))).collect();
        let mut tabu = TabuList::new(2);
        tabu.push(sigs[0]);
        tabu.push(sigs[1]);
        tabu.push(sigs[0]);
        tabu.push(sigs[2]);
        assert!(tabu.contains(&sigs[0]));
        assert!(!tabu.contains(&sigs[1]));
        assert!(tabu.contains(&sigs[2]));
        assert_eq!(tabu.len(), 2);
    }

    #[test]
    fn test_infeasible_initial_is_rejected() {
        let data = busy_problem();
        // m1 needs two periods but starts at the last one
        let outside = Solution::new(vec![
            a(0, 0, 0, 0, 2),
            a(0, 1, 1, 1, 0),
            a(1, 0, 2, 0, 1),
            a(1, 1, 1, 1, 2),
        ]);
        let err = optimize(&data, &outside, &config(1)).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidInput(msg) if msg.contains("outside the grid")));

        let missing = Solution::new(busy_initial().assignments[1..].to_vec());
        let err = LocalSearch::new(&data, missing, config(1), StdRng::seed_from_u64(0))
            .err()
            .unwrap();
        assert!(matches!(err, SchedulerError::InvalidInput(_)));
    }

    /// Marks every single-assignment move away from `from` as tabu.
    fn forbid_all_moves_from(search: &mut LocalSearch<'_, StdRng>, from: Assignment) {
        for teacher in 0..2 {
            for day in 0..2 {
                for period in 0..2 {
                    let to = Assignment { teacher, day, period, ..from };
                    if to != from {
                        search.tabu.push(MoveSignature::new(from, to));
                    }
                }
            }
        }
    }

    #[test]
    fn test_tabu_move_must_beat_best() {
        let data = two_teacher_problem();
        let start = a(0, 0, 1, 1, 1);
        let mut search =
            LocalSearch::new(&data, Solution::new(vec![start]), config(0), StdRng::seed_from_u64(2))
                .unwrap();
        let sig = MoveSignature::new(start, a(0, 0, 0, 1, 1));
        let other = MoveSignature::new(start, a(0, 0, 1, 0, 0));
        search.tabu.push(sig);
        assert_eq!(search.best_score(), 2);
        assert!(!search.admissible(&sig, 2));
        assert!(search.admissible(&sig, 3));
        assert!(search.admissible(&other, 0));
    }

    #[test]
    fn test_scan_is_idle_when_every_move_is_tabu() {
        let data = two_teacher_problem();
        let start = a(0, 0, 0, 0, 0);
        let initial = Solution::new(vec![start]);
        let mut search =
            LocalSearch::new(&data, initial.clone(), config(0), StdRng::seed_from_u64(4)).unwrap();
        forbid_all_moves_from(&mut search, start);
        assert!(!search.scan());
        assert_eq!(search.current(), &initial);
        assert!(search.history().is_empty());
    }

    #[test]
    fn test_idle_iteration_shakes_past_tabu() {
        let data = two_teacher_problem();
        let start = a(0, 0, 0, 0, 0);
        let initial = Solution::new(vec![start]);
        let mut search =
            LocalSearch::new(&data, initial.clone(), config(0), StdRng::seed_from_u64(6)).unwrap();
        forbid_all_moves_from(&mut search, start);
        // hot enough that the metropolis rule takes any worsening move
        search.temperature = 1e9;

        assert!(!search.step());
        assert_ne!(search.current(), &initial);
        assert!(validate::check(&data, search.current()).is_ok());
        let moved = search.current().assignments[0];
        assert_eq!(search.history().count(&MoveSignature::new(start, moved)), 1);
        assert_eq!(search.stagnation(), 1);
        assert_eq!(search.best(), &initial);
        assert_eq!(search.best_score(), 15);
    }

    #[test]
    fn test_restart_returns_to_best() {
        let data = busy_problem();
        let mut search = LocalSearch::new(
            &data,
            busy_initial(),
            SearchConfig { restart_perturbation_divisor: 100, ..config(0) },
            StdRng::seed_from_u64(8),
        )
        .unwrap();
        // a worse but feasible working solution: t2 takes m1 instead of t1
        search.current.assignments[0].teacher = 1;
        search.current.assignments[1].teacher = 0;
        search.current_score = score(&search.current, &data);
        search.stagnation = 12;

        search.restart();
        assert_eq!(search.stagnation(), 0);
        let mut current = search.current().assignments.clone();
        current.sort();
        assert_eq!(current, search.best().assignments);
        assert_eq!(search.current_score, search.best_score());
    }

    #[test]
    fn test_restart_perturbs_and_stays_feasible() {
        let data = busy_problem();
        let mut search = LocalSearch::new(
            &data,
            busy_initial(),
            SearchConfig { restart_perturbation_divisor: 1, ..config(0) },
            StdRng::seed_from_u64(10),
        )
        .unwrap();
        for _ in 0..20 {
            search.stagnation = 3;
            search.restart();
            assert_eq!(search.stagnation(), 0);
            assert!(validate::check(&data, search.current()).is_ok());
            assert_eq!(search.current_score, score(search.current(), &data));
        }
    }

    #[test]
    fn test_stagnation_limit_triggers_restart() {
        let data = busy_problem();
        let cfg = SearchConfig { stagnation_limit: 0, ..config(0) };
        let mut search =
            LocalSearch::new(&data, busy_initial(), cfg, StdRng::seed_from_u64(12)).unwrap();
        for _ in 0..30 {
            search.step();
            assert_eq!(search.stagnation(), 0);
            assert!(validate::check(&data, search.current()).is_ok());
        }
    }
}
