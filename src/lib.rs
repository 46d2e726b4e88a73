//! Teacher/course-section timetabling.
//!
//! Stage 1 ([`solver`]) builds a feasible assignment of teachers and time slots
//! with an integer program. Stage 2 ([`search`]) refines it with a tabu-guided
//! variable neighbourhood search. [`pipeline::schedule`] runs both, and
//! [`server`] exposes them over HTTP.

pub mod config;
pub mod data;
pub mod error;
pub mod index;
pub mod loader;
pub mod moves;
pub mod pipeline;
pub mod search;
pub mod server;
pub mod solution;
pub mod solver;
pub mod validate;
