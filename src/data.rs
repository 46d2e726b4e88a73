use crate::error::{Result, SchedulerError};
use itertools::Itertools;
use log::info;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

// Dense indices into the problem tables
pub type TeacherIdx = usize;
pub type CourseIdx = usize;
pub type SectionIdx = usize;
pub type DayIdx = usize;
pub type PeriodIdx = usize;
pub type Slot = (DayIdx, PeriodIdx);

/// A teacher's preference score for one (day, period) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimePref {
    pub day: String,
    pub period: String,
    pub score: i64,
}

/// Represents a teacher with their eligibility and preferences.
#[derive(Debug, Clone, Serialize)]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub max_courses: u32,
    pub course_pref: BTreeMap<String, i64>,
    /// Sorted descending by score.
    pub time_pref: Vec<TimePref>,
    pub eligible_courses: BTreeSet<String>,
}

/// A section occupies `required_periods` consecutive periods on one day.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub id: String,
    pub required_periods: usize,
}

/// Represents a course and its sections to be staffed.
#[derive(Debug, Clone, Serialize)]
pub struct Course {
    pub id: String,
    pub name: String,
    pub sections: Vec<Section>,
    pub min_teachers: u32,
    pub max_teachers: u32,
    /// Eligible teachers, best course preference first. Filled by [`ProblemData::new`].
    pub ranked_teachers: Vec<TeacherIdx>,
}

/// The classroom grid and per-slot room capacity.
#[derive(Debug, Clone, Serialize)]
pub struct ClassroomInfo {
    pub days: Vec<String>,
    /// Index order defines adjacency.
    pub periods: Vec<String>,
    /// day -> period -> rooms available
    pub capacity: BTreeMap<String, BTreeMap<String, u32>>,
}

/// The complete, validated scheduling problem plus precomputed lookups.
#[derive(Debug, Clone)]
pub struct ProblemData {
    teachers: Vec<Teacher>,
    courses: Vec<Course>,
    classrooms: ClassroomInfo,
    eligible: Vec<Vec<bool>>,
    course_pref: Vec<Vec<i64>>,
    time_pref: Vec<Vec<Vec<i64>>>,
    capacity: Vec<Vec<u32>>,
}

impl ProblemData {
    /// Validates the raw entities and derives rankings and lookup tables.
    pub fn new(
        teachers: Vec<Teacher>,
        mut courses: Vec<Course>,
        classrooms: ClassroomInfo,
    ) -> Result<Self> {
        unique_lookup("teacher", teachers.iter().map(|t| t.id.as_str()))?;
        let course_lookup = unique_lookup("course", courses.iter().map(|c| c.id.as_str()))?;
        let day_lookup = unique_lookup("day", classrooms.days.iter().map(String::as_str))?;
        let period_lookup =
            unique_lookup("period", classrooms.periods.iter().map(String::as_str))?;

        let num_days = classrooms.days.len();
        let num_periods = classrooms.periods.len();
        if num_days == 0 || num_periods == 0 {
            return Err(SchedulerError::invalid("the classroom grid has no days or no periods"));
        }

        // capacity for every grid cell must be given
        let mut capacity = vec![vec![0u32; num_periods]; num_days];
        for (d, day) in classrooms.days.iter().enumerate() {
            for (p, period) in classrooms.periods.iter().enumerate() {
                capacity[d][p] = classrooms
                    .capacity
                    .get(day)
                    .and_then(|per_day| per_day.get(period))
                    .copied()
                    .ok_or_else(|| {
                        SchedulerError::invalid(format!(
                            "no classroom capacity given for ({day}, {period})"
                        ))
                    })?;
            }
        }
        for (day, per_day) in &classrooms.capacity {
            if !day_lookup.contains_key(day.as_str()) {
                return Err(SchedulerError::invalid(format!("capacity given for unknown day {day}")));
            }
            if let Some(period) = per_day.keys().find(|p| !period_lookup.contains_key(p.as_str())) {
                return Err(SchedulerError::invalid(format!(
                    "capacity given for unknown period {period} on {day}"
                )));
            }
        }

        for course in &courses {
            if course.min_teachers > course.max_teachers {
                return Err(SchedulerError::invalid(format!(
                    "course {} has min_teachers {} > max_teachers {}",
                    course.id, course.min_teachers, course.max_teachers
                )));
            }
            unique_lookup("section", course.sections.iter().map(|s| s.id.as_str()))?;
            for section in &course.sections {
                if section.required_periods == 0 || section.required_periods > num_periods {
                    return Err(SchedulerError::invalid(format!(
                        "section {}/{} requires {} periods but the grid has {}",
                        course.id, section.id, section.required_periods, num_periods
                    )));
                }
            }
        }

        let mut eligible = vec![vec![false; courses.len()]; teachers.len()];
        let mut course_pref = vec![vec![0i64; courses.len()]; teachers.len()];
        let mut time_pref = vec![vec![vec![0i64; num_periods]; num_days]; teachers.len()];
        for (t, teacher) in teachers.iter().enumerate() {
            if teacher.max_courses < 1 {
                return Err(SchedulerError::invalid(format!(
                    "teacher {} must be allowed at least one course",
                    teacher.id
                )));
            }
            for course_id in &teacher.eligible_courses {
                let &c = course_lookup.get(course_id.as_str()).ok_or_else(|| {
                    SchedulerError::invalid(format!(
                        "teacher {} is eligible for unknown course {course_id}",
                        teacher.id
                    ))
                })?;
                eligible[t][c] = true;
            }
            for (course_id, &score) in &teacher.course_pref {
                let &c = course_lookup.get(course_id.as_str()).ok_or_else(|| {
                    SchedulerError::invalid(format!(
                        "teacher {} has a preference for unknown course {course_id}",
                        teacher.id
                    ))
                })?;
                course_pref[t][c] = score;
            }
            for pref in &teacher.time_pref {
                let (Some(&d), Some(&p)) = (
                    day_lookup.get(pref.day.as_str()),
                    period_lookup.get(pref.period.as_str()),
                ) else {
                    return Err(SchedulerError::invalid(format!(
                        "teacher {} has a time preference for unknown slot ({}, {})",
                        teacher.id, pref.day, pref.period
                    )));
                };
                time_pref[t][d][p] = pref.score;
            }
        }

        // Ij: eligible teachers by descending course preference, stable on input order
        for (c, course) in courses.iter_mut().enumerate() {
            course.ranked_teachers = (0..teachers.len())
                .filter(|&t| eligible[t][c])
                .sorted_by_key(|&t| std::cmp::Reverse(course_pref[t][c]))
                .collect();
        }

        let data = Self {
            teachers,
            courses,
            classrooms,
            eligible,
            course_pref,
            time_pref,
            capacity,
        };
        info!(
            "Problem built: {} teachers, {} courses, {} sections, {} days, {} periods.",
            data.teachers.len(),
            data.courses.len(),
            data.section_count(),
            num_days,
            num_periods
        );
        Ok(data)
    }

    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn classrooms(&self) -> &ClassroomInfo {
        &self.classrooms
    }

    pub fn teacher(&self, t: TeacherIdx) -> &Teacher {
        &self.teachers[t]
    }

    pub fn course(&self, c: CourseIdx) -> &Course {
        &self.courses[c]
    }

    pub fn num_days(&self) -> usize {
        self.classrooms.days.len()
    }

    pub fn num_periods(&self) -> usize {
        self.classrooms.periods.len()
    }

    pub fn is_eligible(&self, t: TeacherIdx, c: CourseIdx) -> bool {
        self.eligible[t][c]
    }

    pub fn course_pref(&self, t: TeacherIdx, c: CourseIdx) -> i64 {
        self.course_pref[t][c]
    }

    pub fn time_pref(&self, t: TeacherIdx, d: DayIdx, p: PeriodIdx) -> i64 {
        self.time_pref[t][d][p]
    }

    pub fn capacity(&self, d: DayIdx, p: PeriodIdx) -> u32 {
        self.capacity[d][p]
    }

    pub fn required_periods(&self, c: CourseIdx, s: SectionIdx) -> usize {
        self.courses[c].sections[s].required_periods
    }

    /// Whether a block of `len` periods starting at `start` stays inside the day.
    pub fn block_fits(&self, start: PeriodIdx, len: usize) -> bool {
        start + len <= self.num_periods()
    }

    /// Every (course, section) pair in problem order.
    pub fn sections(&self) -> impl Iterator<Item = (CourseIdx, SectionIdx)> + '_ {
        self.courses
            .iter()
            .enumerate()
            .flat_map(|(c, course)| (0..course.sections.len()).map(move |s| (c, s)))
    }

    pub fn section_count(&self) -> usize {
        self.courses.iter().map(|c| c.sections.len()).sum()
    }

    /// Total sections over all courses the teacher is eligible for.
    pub fn eligible_section_count(&self, t: TeacherIdx) -> usize {
        self.courses
            .iter()
            .enumerate()
            .filter(|(c, _)| self.eligible[t][*c])
            .map(|(_, course)| course.sections.len())
            .sum()
    }
}

fn unique_lookup<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<HashMap<String, usize>> {
    let mut seen = HashSet::new();
    let mut lookup = HashMap::new();
    for (i, id) in ids.enumerate() {
        if !seen.insert(id) {
            return Err(SchedulerError::invalid(format!("duplicate {kind} id: {id}")));
        }
        lookup.insert(id.to_string(), i);
    }
    Ok(lookup)
}
