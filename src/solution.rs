use crate::data::{CourseIdx, DayIdx, PeriodIdx, ProblemData, SectionIdx, Slot, TeacherIdx};
use serde::Serialize;

/// A scheduled section: taught by `teacher`, occupying `period..period + required_periods` on `day`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Assignment {
    pub course: CourseIdx,
    pub section: SectionIdx,
    pub teacher: TeacherIdx,
    pub day: DayIdx,
    pub period: PeriodIdx,
}

impl Assignment {
    pub fn required_periods(&self, data: &ProblemData) -> usize {
        data.required_periods(self.course, self.section)
    }

    /// Every slot covered by this assignment's block.
    pub fn block(&self, data: &ProblemData) -> impl Iterator<Item = Slot> + use<> {
        let day = self.day;
        (self.period..self.period + self.required_periods(data)).map(move |p| (day, p))
    }

    pub fn fits(&self, data: &ProblemData) -> bool {
        self.day < data.num_days() && data.block_fits(self.period, self.required_periods(data))
    }
}

/// One assignment per section, addressed by position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    pub assignments: Vec<Assignment>,
}

pub type InitialSolution = Solution;

impl Solution {
    pub fn new(mut assignments: Vec<Assignment>) -> Self {
        assignments.sort();
        Self { assignments }
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn render(&self, data: &ProblemData) -> Vec<ScheduledAssignment> {
        self.assignments.iter().map(|a| ScheduledAssignment::new(a, data)).collect()
    }
}

/// The search result together with its score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimalSolution {
    pub solution: Solution,
    pub objective_value: i64,
}

/// Represents a single assignment by its external ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledAssignment {
    pub teacher_id: String,
    pub course_id: String,
    pub section_id: String,
    pub day: String,
    /// Start period of the block.
    pub period: String,
}

impl ScheduledAssignment {
    fn new(a: &Assignment, data: &ProblemData) -> Self {
        let course = data.course(a.course);
        Self {
            teacher_id: data.teacher(a.teacher).id.clone(),
            course_id: course.id.clone(),
            section_id: course.sections[a.section].id.clone(),
            day: data.classrooms().days[a.day].clone(),
            period: data.classrooms().periods[a.period].clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_problem;

    #[test]
    fn test_block_and_render() {
        let data = load_problem(
            r#"{
                "teachers": [{"id": "t1", "eligible_courses": ["c1"]}],
                "courses": [{"id": "c1", "sections": [{"id": "s1", "required_periods": 2}]}],
                "classrooms": {
                    "days": ["Mon"],
                    "periods": ["P1", "P2", "P3"],
                    "classrooms_per_slot": {"Mon": {"P1": 1, "P2": 1, "P3": 1}}
                }
            }"#,
        )
        .unwrap();
        let a = Assignment { course: 0, section: 0, teacher: 0, day: 0, period: 1 };
        assert_eq!(a.block(&data).collect::<Vec<_>>(), vec![(0, 1), (0, 2)]);
        assert!(a.fits(&data));
        assert!(!Assignment { period: 2, ..a }.fits(&data));

        let rendered = Solution::new(vec![a]).render(&data);
        assert_eq!(
            rendered,
            vec![ScheduledAssignment {
                teacher_id: "t1".into(),
                course_id: "c1".into(),
                section_id: "s1".into(),
                day: "Mon".into(),
                period: "P2".into(),
            }]
        );
    }
}
