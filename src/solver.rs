use crate::config::SolverConfig;
use crate::data::{CourseIdx, DayIdx, PeriodIdx, ProblemData, SectionIdx, Slot, TeacherIdx};
use crate::error::{Result, SchedulerError, SolverStatus};
use crate::solution::{Assignment, InitialSolution, Solution};
use good_lp::solvers::SolutionStatus;
use good_lp::variable;
use good_lp::{
    Expression, ProblemVariables, ResolutionError, Solution as _, SolverModel, Variable,
    constraint, default_solver,
};
use itertools::Itertools;
use log::{info, trace, warn};
use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

/// A candidate start Y[i,j,k,d,p] and its binary variable.
struct StartVar {
    start: Assignment,
    var: Variable,
}

/// Builds the assignment ILP and solves it with HiGHS.
///
/// Only OPTIMAL or FEASIBLE outcomes produce a solution; an infeasible model and
/// a time-out without incumbent are returned as errors.
pub fn build_initial_solution(
    data: &ProblemData,
    config: &SolverConfig,
) -> Result<(InitialSolution, SolverStatus)> {
    let start_time = Instant::now();
    info!(
        "Setting up ILP model with {} teachers, {} courses, {} sections and a {}x{} grid...",
        data.teachers().len(),
        data.courses().len(),
        data.section_count(),
        data.num_days(),
        data.num_periods()
    );

    let mut problem = ProblemVariables::new();

    // y_ijkdp = 1 if teacher i starts section k of course j on day d at period p
    //           0 otherwise
    // pre-filter: only eligible teachers and blocks that fit into open slots
    let mut possible_starts = Vec::new();
    for (course, section) in data.sections() {
        for &teacher in &data.course(course).ranked_teachers {
            for day in 0..data.num_days() {
                for period in 0..data.num_periods() {
                    if is_start_possible(data, course, section, day, period) {
                        possible_starts.push(Assignment { course, section, teacher, day, period });
                    }
                }
            }
        }
    }
    trace!(
        "Generated {} start variables out of a theoretical maximum of {}.",
        possible_starts.len(),
        data.section_count() * data.teachers().len() * data.num_days() * data.num_periods()
    );

    let start_vars_vec = problem.add_vector(variable().binary(), possible_starts.len());
    let starts: Vec<StartVar> = possible_starts
        .into_iter()
        .zip(start_vars_vec)
        .map(|(start, var)| StartVar { start, var })
        .collect();

    let by_section: HashMap<(CourseIdx, SectionIdx), Vec<Variable>> = starts
        .iter()
        .map(|s| ((s.start.course, s.start.section), s.var))
        .into_group_map();
    if let Some((course, section)) = data.sections().find(|key| !by_section.contains_key(key)) {
        let c = data.course(course);
        warn!(
            "Section {}/{} has no eligible teacher or no open block; the model is infeasible.",
            c.id, c.sections[section].id
        );
        return Err(SchedulerError::Infeasible);
    }

    // p_ij = 1 if teacher i teaches course j at all
    let mut teaches: BTreeMap<(TeacherIdx, CourseIdx), Variable> = BTreeMap::new();
    for (c, course) in data.courses().iter().enumerate() {
        for &t in &course.ranked_teachers {
            teaches.insert((t, c), problem.add(variable().binary()));
        }
    }

    // overload_id >= sections of i on day d - ceil(eligible sections of i / days)
    let mut overload: BTreeMap<(TeacherIdx, DayIdx), (Variable, f64)> = BTreeMap::new();
    for t in 0..data.teachers().len() {
        let total = data.eligible_section_count(t);
        if total == 0 {
            continue;
        }
        let average = total.div_ceil(data.num_days()) as f64;
        for d in 0..data.num_days() {
            let var = problem.add(variable().integer().min(0).max(total as f64));
            overload.insert((t, d), (var, average));
        }
    }

    // objective
    let course_preference: Expression = teaches
        .iter()
        .map(|(&(t, c), &p)| data.course_pref(t, c) as f64 * p)
        .sum();
    let time_preference: Expression = starts
        .iter()
        .map(|s| {
            let score: i64 = s
                .start
                .block(data)
                .map(|(d, p)| data.time_pref(s.start.teacher, d, p))
                .sum();
            score as f64 * s.var
        })
        .sum();
    let overload_penalty: Expression = overload.values().map(|(var, _)| *var).sum();
    let objective = course_preference + time_preference - overload_penalty;
    info!("Objective defined with course preference, time preference and daily overload penalty.");

    let mut model = problem
        .maximise(objective)
        .using(default_solver)
        .set_option("threads", config.worker_hint.max(1) as i32)
        .set_option("random_seed", config.random_seed as i32)
        .set_option("time_limit", config.time_limit_seconds)
        .set_option("log_to_console", config.log_to_console);

    // begin hard constraints

    info!("Adding 'section scheduled exactly once' constraints...");
    for key in data.sections() {
        let scheduled_once: Expression = by_section[&key].iter().copied().sum();
        model.add_constraint(constraint!(scheduled_once == 1));
    }

    info!("Adding 'teacher teaches course' linkage constraints...");
    let by_teacher_course: HashMap<(TeacherIdx, CourseIdx), Vec<Variable>> = starts
        .iter()
        .map(|s| ((s.start.teacher, s.start.course), s.var))
        .into_group_map();
    for (&(t, c), &p) in &teaches {
        let sections = data.course(c).sections.len() as f64;
        let starts_of_pair: Expression = by_teacher_course
            .get(&(t, c))
            .map(|vars| vars.iter().copied().sum())
            .unwrap_or_else(|| Expression::from(0.0));
        model.add_constraint(constraint!(starts_of_pair.clone() <= sections * p));
        model.add_constraint(constraint!(starts_of_pair >= p));
    }

    info!("Adding teacher load constraints...");
    let min_load = config.min_courses_per_teacher as f64;
    for (t, teacher) in data.teachers().iter().enumerate() {
        let load: Expression = teaches
            .iter()
            .filter(|((ti, _), _)| *ti == t)
            .map(|(_, p)| *p)
            .sum();
        let max_load = teacher.max_courses as f64;
        model.add_constraint(constraint!(load.clone() >= min_load));
        model.add_constraint(constraint!(load <= max_load));
    }

    info!("Adding course staffing constraints...");
    for (c, course) in data.courses().iter().enumerate() {
        let staff: Expression = teaches
            .iter()
            .filter(|((_, ci), _)| *ci == c)
            .map(|(_, p)| *p)
            .sum();
        let (min_staff, max_staff) = (course.min_teachers as f64, course.max_teachers as f64);
        model.add_constraint(constraint!(staff.clone() >= min_staff));
        model.add_constraint(constraint!(staff <= max_staff));
    }

    // every start expanded to the slots its block covers
    let covering: Vec<(Slot, &StartVar)> = starts
        .iter()
        .flat_map(|s| s.start.block(data).map(move |slot| (slot, s)))
        .collect();

    info!("Adding classroom capacity constraints...");
    let by_slot: HashMap<Slot, Vec<Variable>> =
        covering.iter().map(|(slot, s)| (*slot, s.var)).into_group_map();
    for (slot, vars) in by_slot.iter().sorted_by_key(|(slot, _)| **slot) {
        let capacity = data.capacity(slot.0, slot.1) as f64;
        if (vars.len() as f64) <= capacity {
            continue;
        }
        let occupied: Expression = vars.iter().copied().sum();
        model.add_constraint(constraint!(occupied <= capacity));
    }

    info!("Adding 'one section per course per slot' constraints...");
    let by_course_slot: HashMap<(CourseIdx, Slot), Vec<Variable>> = covering
        .iter()
        .map(|(slot, s)| ((s.start.course, *slot), s.var))
        .into_group_map();
    add_at_most_one(&mut model, &by_course_slot);

    info!("Adding 'no teacher overlap' constraints...");
    let by_teacher_slot: HashMap<(TeacherIdx, Slot), Vec<Variable>> = covering
        .iter()
        .map(|(slot, s)| ((s.start.teacher, *slot), s.var))
        .into_group_map();
    add_at_most_one(&mut model, &by_teacher_slot);

    let by_teacher_day: HashMap<(TeacherIdx, DayIdx), Vec<Variable>> = starts
        .iter()
        .map(|s| ((s.start.teacher, s.start.day), s.var))
        .into_group_map();
    for (key, &(var, average)) in &overload {
        let on_day: Expression = by_teacher_day
            .get(key)
            .map(|vars| vars.iter().copied().sum())
            .unwrap_or_else(|| Expression::from(0.0));
        model.add_constraint(constraint!(var >= on_day - average));
    }

    //solve
    info!("Starting ILP solver (time limit {}s)...", config.time_limit_seconds);
    let solution = model.solve().map_err(solve_error)?;
    let status = match solution.status() {
        SolutionStatus::Optimal => SolverStatus::Optimal,
        _ => SolverStatus::Feasible,
    };

    // get assignments from the start variables
    let assignments: Vec<Assignment> = starts
        .iter()
        .filter(|s| solution.value(s.var) > 0.9)
        .map(|s| s.start)
        .collect();

    // the backend reports a missing incumbent as an error; this guards any other partial read-back
    let covered = assignments.iter().map(|a| (a.course, a.section)).counts();
    if covered.len() != data.section_count() || covered.values().any(|&n| n != 1) {
        warn!("Solver stopped without a complete schedule.");
        return Err(SchedulerError::TimeoutNoIncumbent);
    }

    info!("Solver status {} after {:.2?}", status, start_time.elapsed());
    Ok((Solution::new(assignments), status))
}

fn solve_error(e: ResolutionError) -> SchedulerError {
    match e {
        ResolutionError::Infeasible => {
            warn!("Solver proved the model infeasible.");
            SchedulerError::Infeasible
        }
        // HiGHS stopped (time limit or interrupt) without a primal-feasible incumbent
        ResolutionError::Other("NoSolutionFound") => {
            warn!("Solver stopped before finding any feasible schedule.");
            SchedulerError::TimeoutNoIncumbent
        }
        e => SchedulerError::Solver(e.to_string()),
    }
}

// implicitly enforces "block fits in day" and zero-capacity slots
fn is_start_possible(
    data: &ProblemData,
    course: CourseIdx,
    section: SectionIdx,
    day: DayIdx,
    period: PeriodIdx,
) -> bool {
    let len = data.required_periods(course, section);
    if !data.block_fits(period, len) {
        return false;
    }
    (period..period + len).all(|p| data.capacity(day, p) > 0)
}

fn add_at_most_one<K, M>(model: &mut M, groups: &HashMap<K, Vec<Variable>>)
where
    K: Ord,
    M: SolverModel,
{
    for (_, vars) in groups.iter().sorted_by(|a, b| a.0.cmp(b.0)) {
        if vars.len() < 2 {
            continue;
        }
        let used: Expression = vars.iter().copied().sum();
        model.add_constraint(constraint!(used <= 1));
    }
}
