//! Randomised neighbourhood moves over a candidate [`Solution`].
//!
//! Every move works on the caller's candidate copy. It either commits a
//! feasible change and returns the signature of the assignment states it
//! touched, or returns `None` with the candidate left exactly as it was.

use crate::data::ProblemData;
use crate::index::SolutionIndex;
use crate::solution::{Assignment, Solution};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::fmt;

/// Relocation tries per move.
pub const RELOCATION_ATTEMPTS: usize = 6;
/// Random pairs drawn per swap move.
pub const PAIR_ATTEMPTS: usize = 6;

/// Order-independent identity of the two assignment states a move touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MoveSignature {
    low: Assignment,
    high: Assignment,
}

impl MoveSignature {
    pub fn new(a: Assignment, b: Assignment) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn states(&self) -> (Assignment, Assignment) {
        (self.low, self.high)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Neighborhood {
    /// New teacher from the course ranking, else a random relocation.
    SingleChange,
    /// Exchange the teachers of two assignments.
    TeacherSwap,
    /// Exchange teacher, day and start period of two assignments.
    PairSwap,
    /// Move one block to a start where it fits within the day.
    BlockRelocate,
    /// Exchange two blocks of equal length together with their teachers.
    BlockSwap,
}

impl Neighborhood {
    /// Weakest first.
    pub const ALL: [Neighborhood; 5] = [
        Neighborhood::SingleChange,
        Neighborhood::TeacherSwap,
        Neighborhood::PairSwap,
        Neighborhood::BlockRelocate,
        Neighborhood::BlockSwap,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Neighborhood::SingleChange => "single_change",
            Neighborhood::TeacherSwap => "teacher_swap",
            Neighborhood::PairSwap => "pair_swap",
            Neighborhood::BlockRelocate => "block_relocate",
            Neighborhood::BlockSwap => "block_swap",
        }
    }

    pub fn try_move<R: Rng + ?Sized>(
        self,
        solution: &mut Solution,
        data: &ProblemData,
        rng: &mut R,
    ) -> Option<MoveSignature> {
        match self {
            Neighborhood::SingleChange => single_change(solution, data, rng),
            Neighborhood::TeacherSwap => teacher_swap(solution, data, rng),
            Neighborhood::PairSwap => pair_swap(solution, data, rng),
            Neighborhood::BlockRelocate => block_relocate(solution, data, rng),
            Neighborhood::BlockSwap => block_swap(solution, data, rng),
        }
    }
}

impl fmt::Display for Neighborhood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Replaces `before` by `after` in the index when every new placement fits and
/// the staffing and teacher-load bounds still hold. On failure the index is
/// restored to its previous contents.
fn apply_if_feasible(
    index: &mut SolutionIndex<'_>,
    before: &[Assignment],
    after: &[Assignment],
) -> bool {
    for a in before {
        index.remove(a);
    }
    let mut placed = 0;
    let mut ok = true;
    for a in after {
        if !index.try_place(a) {
            ok = false;
            break;
        }
        placed += 1;
    }
    if ok {
        ok = before
            .iter()
            .chain(after)
            .all(|a| index.course_teacher_count_in_bounds(a.course))
            && after.iter().all(|a| index.teacher_load_in_bounds(a.teacher));
    }
    if !ok {
        for a in &after[..placed] {
            index.remove(a);
        }
        for a in before {
            index.insert(a);
        }
    }
    ok
}

fn pick_pair<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Option<(usize, usize)> {
    if n < 2 {
        return None;
    }
    let i = rng.random_range(0..n);
    let mut j = rng.random_range(0..n - 1);
    if j >= i {
        j += 1;
    }
    Some((i, j))
}

fn relocate<R: Rng + ?Sized>(
    solution: &mut Solution,
    data: &ProblemData,
    rng: &mut R,
    idx: usize,
    index: &mut SolutionIndex<'_>,
    whole_block_starts: bool,
) -> Option<MoveSignature> {
    let old = solution.assignments[idx];
    let last_start = if whole_block_starts {
        data.num_periods() - old.required_periods(data)
    } else {
        data.num_periods() - 1
    };
    for _ in 0..RELOCATION_ATTEMPTS {
        let day = rng.random_range(0..data.num_days());
        let period = rng.random_range(0..=last_start);
        if day == old.day && period == old.period {
            continue;
        }
        let moved = Assignment { day, period, ..old };
        if apply_if_feasible(index, &[old], &[moved]) {
            solution.assignments[idx] = moved;
            return Some(MoveSignature::new(old, moved));
        }
    }
    None
}

fn single_change<R: Rng + ?Sized>(
    solution: &mut Solution,
    data: &ProblemData,
    rng: &mut R,
) -> Option<MoveSignature> {
    if solution.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..solution.len());
    let old = solution.assignments[idx];
    let mut index = SolutionIndex::build(data, solution);

    if let Some(&teacher) = data.course(old.course).ranked_teachers.choose(rng) {
        let moved = Assignment { teacher, ..old };
        if teacher != old.teacher && apply_if_feasible(&mut index, &[old], &[moved]) {
            solution.assignments[idx] = moved;
            return Some(MoveSignature::new(old, moved));
        }
    }

    relocate(solution, data, rng, idx, &mut index, false)
}

fn block_relocate<R: Rng + ?Sized>(
    solution: &mut Solution,
    data: &ProblemData,
    rng: &mut R,
) -> Option<MoveSignature> {
    if solution.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..solution.len());
    let mut index = SolutionIndex::build(data, solution);
    relocate(solution, data, rng, idx, &mut index, true)
}

/// Shared body of the two-assignment moves: `exchange` maps the current pair
/// to its replacement, or `None` when the pair is not worth trying.
fn swap_with<R, F>(
    solution: &mut Solution,
    data: &ProblemData,
    rng: &mut R,
    mut pick: impl FnMut(&Solution, &mut R) -> Option<(usize, usize)>,
    exchange: F,
) -> Option<MoveSignature>
where
    R: Rng + ?Sized,
    F: Fn(Assignment, Assignment) -> Option<(Assignment, Assignment)>,
{
    if solution.len() < 2 {
        return None;
    }
    let mut index = SolutionIndex::build(data, solution);
    for _ in 0..PAIR_ATTEMPTS {
        let Some((i, j)) = pick(solution, rng) else {
            continue;
        };
        let (a, b) = (solution.assignments[i], solution.assignments[j]);
        let Some((new_a, new_b)) = exchange(a, b) else {
            continue;
        };
        if apply_if_feasible(&mut index, &[a, b], &[new_a, new_b]) {
            solution.assignments[i] = new_a;
            solution.assignments[j] = new_b;
            return Some(MoveSignature::new(a, b));
        }
    }
    None
}

fn teacher_swap<R: Rng + ?Sized>(
    solution: &mut Solution,
    data: &ProblemData,
    rng: &mut R,
) -> Option<MoveSignature> {
    swap_with(
        solution,
        data,
        rng,
        |s, rng| pick_pair(rng, s.len()),
        |a, b| {
            (a.teacher != b.teacher).then_some((
                Assignment { teacher: b.teacher, ..a },
                Assignment { teacher: a.teacher, ..b },
            ))
        },
    )
}

fn exchange_placements(a: Assignment, b: Assignment) -> Option<(Assignment, Assignment)> {
    if (a.teacher, a.day, a.period) == (b.teacher, b.day, b.period) {
        return None;
    }
    Some((
        Assignment { teacher: b.teacher, day: b.day, period: b.period, ..a },
        Assignment { teacher: a.teacher, day: a.day, period: a.period, ..b },
    ))
}

fn pair_swap<R: Rng + ?Sized>(
    solution: &mut Solution,
    data: &ProblemData,
    rng: &mut R,
) -> Option<MoveSignature> {
    swap_with(
        solution,
        data,
        rng,
        |s, rng| pick_pair(rng, s.len()),
        exchange_placements,
    )
}

fn block_swap<R: Rng + ?Sized>(
    solution: &mut Solution,
    data: &ProblemData,
    rng: &mut R,
) -> Option<MoveSignature> {
    swap_with(
        solution,
        data,
        rng,
        |s, rng| {
            // half of the picks anchor on a multi-period block, when there is one
            let blocks: Vec<usize> = (0..s.len())
                .filter(|&i| s.assignments[i].required_periods(data) > 1)
                .collect();
            let i = match blocks.choose(rng) {
                Some(&i) if rng.random_bool(0.5) => i,
                _ => rng.random_range(0..s.len()),
            };
            let mut j = rng.random_range(0..s.len() - 1);
            if j >= i {
                j += 1;
            }
            Some((i, j))
        },
        exchange_placements,
    )
}
