use crate::config::{SearchConfig, ServerConfig, SolverConfig};
use crate::error::{SchedulerError, SolverStatus};
use crate::loader::ProblemSpec;
use crate::pipeline::{self, ScheduleReport};
use crate::solution::ScheduledAssignment;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};

/// A problem document with optional per-request solver and search overrides.
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    #[serde(flatten)]
    pub problem: ProblemSpec,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Serialize)]
pub struct SolutionBody {
    pub objective_value: i64,
    pub assignments: Vec<ScheduledAssignment>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ScheduleResponse {
    Success {
        solver_status: SolverStatus,
        solution: SolutionBody,
    },
    Error {
        message: String,
    },
}

type Reply = (StatusCode, Json<ScheduleResponse>);

fn error_reply(status: StatusCode, message: String) -> Reply {
    (status, Json(ScheduleResponse::Error { message }))
}

fn status_code(err: &SchedulerError) -> StatusCode {
    match err {
        SchedulerError::InvalidInput(_) | SchedulerError::Json(_) => StatusCode::BAD_REQUEST,
        SchedulerError::Infeasible | SchedulerError::TimeoutNoIncumbent => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        SchedulerError::Solver(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn run(request: ScheduleRequest) -> Result<(ScheduleReport, Vec<ScheduledAssignment>), SchedulerError> {
    let data = request.problem.into_problem()?;
    let report = pipeline::schedule(&data, &request.solver, &request.search)?;
    let assignments = report.solution.solution.render(&data);
    Ok((report, assignments))
}

async fn schedule_handler(payload: Result<Json<ScheduleRequest>, JsonRejection>) -> Reply {
    let Json(request) = match payload {
        Ok(request) => request,
        Err(rejection) => {
            warn!("Rejected schedule request: {rejection}");
            return error_reply(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    match tokio::task::spawn_blocking(move || run(request)).await {
        Ok(Ok((report, assignments))) => (
            StatusCode::OK,
            Json(ScheduleResponse::Success {
                solver_status: report.status,
                solution: SolutionBody {
                    objective_value: report.solution.objective_value,
                    assignments,
                },
            }),
        ),
        Ok(Err(e)) => {
            warn!("Scheduling failed: {e}");
            error_reply(status_code(&e), e.to_string())
        }
        Err(e) => {
            error!("Scheduling task panicked: {e}");
            error_reply(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

pub fn router() -> Router {
    Router::new().route("/schedule", post(schedule_handler))
}

pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(config.bind_addr.as_str()).await?;
    info!("Server running at http://{}", listener.local_addr()?);
    axum::serve(listener, router()).await
}
