//! Full hard-constraint check of a solution.
//!
//! Independent of [`SolutionIndex`](crate::index::SolutionIndex): it recounts
//! everything from scratch and reports every violation it finds.

use crate::data::{CourseIdx, ProblemData, SectionIdx, Slot, TeacherIdx};
use crate::solution::Solution;
use itertools::Itertools;
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A section has zero or several assignments.
    Coverage { course: CourseIdx, section: SectionIdx, count: usize },
    NotEligible { teacher: TeacherIdx, course: CourseIdx },
    BlockOutsideGrid { course: CourseIdx, section: SectionIdx },
    Capacity { slot: Slot, used: u32, capacity: u32 },
    TeacherOverlap { teacher: TeacherIdx, slot: Slot },
    CourseSlotClash { course: CourseIdx, slot: Slot },
    Staffing { course: CourseIdx, teachers: usize },
    TeacherLoad { teacher: TeacherIdx, courses: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Coverage { course, section, count } => {
                write!(f, "section {course}/{section} scheduled {count} times")
            }
            Violation::NotEligible { teacher, course } => {
                write!(f, "teacher {teacher} is not eligible for course {course}")
            }
            Violation::BlockOutsideGrid { course, section } => {
                write!(f, "section {course}/{section} runs outside the grid")
            }
            Violation::Capacity { slot, used, capacity } => {
                write!(f, "slot {slot:?} holds {used} sections, capacity {capacity}")
            }
            Violation::TeacherOverlap { teacher, slot } => {
                write!(f, "teacher {teacher} double-booked at {slot:?}")
            }
            Violation::CourseSlotClash { course, slot } => {
                write!(f, "course {course} has several sections at {slot:?}")
            }
            Violation::Staffing { course, teachers } => {
                write!(f, "course {course} is taught by {teachers} teachers")
            }
            Violation::TeacherLoad { teacher, courses } => {
                write!(f, "teacher {teacher} teaches {courses} courses")
            }
        }
    }
}

/// Checks coverage, eligibility, grid fit, capacity, overlaps, staffing and load.
pub fn check(data: &ProblemData, solution: &Solution) -> Result<(), Vec<Violation>> {
    let mut violations = Vec::new();

    let per_section = solution
        .assignments
        .iter()
        .map(|a| (a.course, a.section))
        .counts();
    for (course, section) in data.sections() {
        let count = per_section.get(&(course, section)).copied().unwrap_or(0);
        if count != 1 {
            violations.push(Violation::Coverage { course, section, count });
        }
    }
    for (&(course, section), &count) in &per_section {
        let known = course < data.courses().len() && section < data.course(course).sections.len();
        if !known {
            violations.push(Violation::Coverage { course, section, count });
        }
    }
    if !violations.is_empty() {
        return Err(violations);
    }

    let mut used: HashMap<Slot, u32> = HashMap::new();
    let mut teacher_slots: HashSet<(TeacherIdx, Slot)> = HashSet::new();
    let mut course_slots: HashSet<(CourseIdx, Slot)> = HashSet::new();
    for a in &solution.assignments {
        if !data.is_eligible(a.teacher, a.course) {
            violations.push(Violation::NotEligible { teacher: a.teacher, course: a.course });
        }
        if !a.fits(data) {
            violations.push(Violation::BlockOutsideGrid { course: a.course, section: a.section });
            continue;
        }
        for slot in a.block(data) {
            *used.entry(slot).or_insert(0) += 1;
            if !teacher_slots.insert((a.teacher, slot)) {
                violations.push(Violation::TeacherOverlap { teacher: a.teacher, slot });
            }
            if !course_slots.insert((a.course, slot)) {
                violations.push(Violation::CourseSlotClash { course: a.course, slot });
            }
        }
    }
    for (&slot, &n) in used.iter().sorted() {
        let capacity = data.capacity(slot.0, slot.1);
        if n > capacity {
            violations.push(Violation::Capacity { slot, used: n, capacity });
        }
    }

    let teachers_by_course = solution
        .assignments
        .iter()
        .map(|a| (a.course, a.teacher))
        .unique()
        .into_group_map();
    for (c, course) in data.courses().iter().enumerate() {
        let n = teachers_by_course.get(&c).map_or(0, Vec::len);
        if (n as u32) < course.min_teachers || (n as u32) > course.max_teachers {
            violations.push(Violation::Staffing { course: c, teachers: n });
        }
    }

    let courses_by_teacher = solution
        .assignments
        .iter()
        .map(|a| (a.teacher, a.course))
        .unique()
        .into_group_map();
    for (&teacher, courses) in courses_by_teacher.iter().sorted_by_key(|(t, _)| **t) {
        if courses.len() as u32 > data.teacher(teacher).max_courses {
            violations.push(Violation::TeacherLoad { teacher, courses: courses.len() });
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_problem;
    use crate::solution::Assignment;

    fn data() -> ProblemData {
        load_problem(
            r#"{
                "teachers": [
                    {"id": "t1", "eligible_courses": ["c1"]},
                    {"id": "t2", "eligible_courses": ["c1"]}
                ],
                "courses": [{"id": "c1", "sections": [{"id": "s1", "required_periods": 2}, {"id": "s2"}]}],
                "classrooms": {
                    "days": ["Mon"],
                    "periods": ["P1", "P2"],
                    "classrooms_per_slot": {"Mon": {"P1": 1, "P2": 1}}
                }
            }"#,
        )
        .unwrap()
    }

    fn a(section: usize, teacher: usize, period: usize) -> Assignment {
        Assignment { course: 0, section, teacher, day: 0, period }
    }

    #[test]
    fn test_missing_section_reported_first() {
        let data = data();
        let err = check(&data, &Solution::new(vec![a(0, 0, 0)])).unwrap_err();
        assert_eq!(err, vec![Violation::Coverage { course: 0, section: 1, count: 0 }]);
    }

    #[test]
    fn test_clashes_are_all_reported() {
        let data = data();
        let err = check(&data, &Solution::new(vec![a(0, 0, 0), a(1, 1, 1)])).unwrap_err();
        assert!(err.contains(&Violation::Capacity { slot: (0, 1), used: 2, capacity: 1 }));
        assert!(err.contains(&Violation::CourseSlotClash { course: 0, slot: (0, 1) }));
        assert!(err.contains(&Violation::Staffing { course: 0, teachers: 2 }));
        assert!(!err.iter().any(|v| matches!(v, Violation::TeacherOverlap { .. })));
    }

    #[test]
    fn test_block_outside_grid() {
        let data = data();
        let err = check(&data, &Solution::new(vec![a(0, 0, 1), a(1, 0, 0)])).unwrap_err();
        assert!(err.contains(&Violation::BlockOutsideGrid { course: 0, section: 0 }));
    }
}
