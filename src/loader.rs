//! JSON problem format.
//!
//! Teachers carry their preferences as nested maps (`day -> period -> score`),
//! classroom capacity is given per slot. Everything is converted into the
//! validated [`ProblemData`] in one go.

use crate::data::{ClassroomInfo, Course, ProblemData, Section, Teacher, TimePref};
use crate::error::Result;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

fn one() -> u32 {
    1
}

fn one_period() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeacherSpec {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "one")]
    pub max_courses: u32,
    #[serde(default)]
    pub eligible_courses: Vec<String>,
    #[serde(default)]
    pub course_preferences: BTreeMap<String, i64>,
    #[serde(default)]
    pub day_time_preferences: BTreeMap<String, BTreeMap<String, i64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionSpec {
    pub id: String,
    #[serde(default = "one_period")]
    pub required_periods: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CourseSpec {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "one")]
    pub min_teachers: u32,
    #[serde(default = "one")]
    pub max_teachers: u32,
    #[serde(default)]
    pub sections: Vec<SectionSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassroomSpec {
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub periods: Vec<String>,
    #[serde(default)]
    pub classrooms_per_slot: BTreeMap<String, BTreeMap<String, u32>>,
}

/// The complete input document.
#[derive(Debug, Clone, Deserialize)]
pub struct ProblemSpec {
    pub teachers: Vec<TeacherSpec>,
    pub courses: Vec<CourseSpec>,
    pub classrooms: ClassroomSpec,
}

impl From<TeacherSpec> for Teacher {
    fn from(spec: TeacherSpec) -> Self {
        let mut time_pref: Vec<TimePref> = spec
            .day_time_preferences
            .into_iter()
            .flat_map(|(day, periods)| {
                periods.into_iter().map(move |(period, score)| TimePref {
                    day: day.clone(),
                    period,
                    score,
                })
            })
            .collect();
        time_pref.sort_by(|a, b| b.score.cmp(&a.score));

        Teacher {
            id: spec.id,
            name: spec.name,
            max_courses: spec.max_courses,
            course_pref: spec.course_preferences,
            time_pref,
            eligible_courses: spec.eligible_courses.into_iter().collect::<BTreeSet<_>>(),
        }
    }
}

impl From<CourseSpec> for Course {
    fn from(spec: CourseSpec) -> Self {
        Course {
            id: spec.id,
            name: spec.name,
            sections: spec
                .sections
                .into_iter()
                .map(|s| Section {
                    id: s.id,
                    required_periods: s.required_periods,
                })
                .collect(),
            min_teachers: spec.min_teachers,
            max_teachers: spec.max_teachers,
            ranked_teachers: Vec::new(),
        }
    }
}

impl From<ClassroomSpec> for ClassroomInfo {
    fn from(spec: ClassroomSpec) -> Self {
        ClassroomInfo {
            days: spec.days,
            periods: spec.periods,
            capacity: spec.classrooms_per_slot,
        }
    }
}

impl ProblemSpec {
    pub fn into_problem(self) -> Result<ProblemData> {
        ProblemData::new(
            self.teachers.into_iter().map(Teacher::from).collect(),
            self.courses.into_iter().map(Course::from).collect(),
            self.classrooms.into(),
        )
    }
}

/// Parses and validates a problem document.
pub fn load_problem(json: &str) -> Result<ProblemData> {
    let spec: ProblemSpec = serde_json::from_str(json)?;
    spec.into_problem()
}
