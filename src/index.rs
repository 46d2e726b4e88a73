//! Occupancy index over a single candidate solution.
//!
//! Answers the per-slot feasibility questions of the move operators in
//! `O(required_periods)` instead of rescanning every assignment. The index is
//! owned by one candidate; operators build it from their copy, `remove` the
//! assignments they are about to move and `insert` the moved ones back.

use crate::data::{CourseIdx, DayIdx, PeriodIdx, ProblemData, SectionIdx, Slot, TeacherIdx};
use crate::solution::{Assignment, Solution};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone)]
pub struct SolutionIndex<'a> {
    data: &'a ProblemData,
    slot_count: Vec<Vec<u32>>,
    teacher_busy: Vec<HashSet<Slot>>,
    course_slot_section: Vec<HashMap<Slot, SectionIdx>>,
    /// course -> teacher -> sections of that course taught by the teacher
    course_teachers: Vec<HashMap<TeacherIdx, u32>>,
    teacher_course_count: Vec<u32>,
}

impl<'a> SolutionIndex<'a> {
    pub fn empty(data: &'a ProblemData) -> Self {
        Self {
            data,
            slot_count: vec![vec![0; data.num_periods()]; data.num_days()],
            teacher_busy: vec![HashSet::new(); data.teachers().len()],
            course_slot_section: vec![HashMap::new(); data.courses().len()],
            course_teachers: vec![HashMap::new(); data.courses().len()],
            teacher_course_count: vec![0; data.teachers().len()],
        }
    }

    pub fn build(data: &'a ProblemData, solution: &Solution) -> Self {
        let mut index = Self::empty(data);
        for a in &solution.assignments {
            index.insert(a);
        }
        index
    }

    pub fn insert(&mut self, a: &Assignment) {
        for (d, p) in a.block(self.data) {
            self.slot_count[d][p] += 1;
            self.teacher_busy[a.teacher].insert((d, p));
            self.course_slot_section[a.course].insert((d, p), a.section);
        }
        let taught = self.course_teachers[a.course].entry(a.teacher).or_insert(0);
        *taught += 1;
        if *taught == 1 {
            self.teacher_course_count[a.teacher] += 1;
        }
    }

    /// Reverses a previous [`insert`](Self::insert) of the same assignment.
    pub fn remove(&mut self, a: &Assignment) {
        for (d, p) in a.block(self.data) {
            self.slot_count[d][p] = self.slot_count[d][p].saturating_sub(1);
            self.teacher_busy[a.teacher].remove(&(d, p));
            if self.course_slot_section[a.course].get(&(d, p)) == Some(&a.section) {
                self.course_slot_section[a.course].remove(&(d, p));
            }
        }
        if let Some(taught) = self.course_teachers[a.course].get_mut(&a.teacher) {
            *taught -= 1;
            if *taught == 0 {
                self.course_teachers[a.course].remove(&a.teacher);
                self.teacher_course_count[a.teacher] -= 1;
            }
        }
    }

    pub fn slot_count(&self, day: DayIdx, period: PeriodIdx) -> u32 {
        self.slot_count[day][period]
    }

    pub fn teacher_free(&self, teacher: TeacherIdx, day: DayIdx, period: PeriodIdx) -> bool {
        !self.teacher_busy[teacher].contains(&(day, period))
    }

    /// Whether one more section fits into the slot.
    pub fn room_available(&self, day: DayIdx, period: PeriodIdx) -> bool {
        self.slot_count[day][period] < self.data.capacity(day, period)
    }

    /// Free, or already held by the same section.
    pub fn course_slot_free(
        &self,
        course: CourseIdx,
        section: SectionIdx,
        day: DayIdx,
        period: PeriodIdx,
    ) -> bool {
        match self.course_slot_section[course].get(&(day, period)) {
            None => true,
            Some(&s) => s == section,
        }
    }

    pub fn course_teacher_count(&self, course: CourseIdx) -> usize {
        self.course_teachers[course].len()
    }

    pub fn course_teacher_count_in_bounds(&self, course: CourseIdx) -> bool {
        let c = self.data.course(course);
        let n = self.course_teacher_count(course) as u32;
        c.min_teachers <= n && n <= c.max_teachers
    }

    pub fn teacher_course_count(&self, teacher: TeacherIdx) -> u32 {
        self.teacher_course_count[teacher]
    }

    /// Whether the teacher stays within `max_courses`.
    pub fn teacher_load_in_bounds(&self, teacher: TeacherIdx) -> bool {
        self.teacher_course_count[teacher] <= self.data.teacher(teacher).max_courses
    }

    /// Checks that `a` can be added to the indexed assignments: eligibility,
    /// block fit, then capacity, teacher overlap and course-per-slot over the block.
    pub fn can_place(&self, a: &Assignment) -> bool {
        if !self.data.is_eligible(a.teacher, a.course) || !a.fits(self.data) {
            return false;
        }
        a.block(self.data).all(|(d, p)| {
            self.room_available(d, p)
                && self.teacher_free(a.teacher, d, p)
                && self.course_slot_free(a.course, a.section, d, p)
        })
    }

    /// Places `a` if feasible. Leaves the index untouched otherwise.
    pub fn try_place(&mut self, a: &Assignment) -> bool {
        if self.can_place(a) {
            self.insert(a);
            true
        } else {
            false
        }
    }
}
