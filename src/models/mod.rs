//! Core data models for study requests and results.

mod request;
mod result;
mod task;

pub use request::{RequestPayload, StudyRequest, ValidationError, EXAM_DATE_FORMAT};
pub use result::{
    Explanation, PlanEntry, RevisionNotes, ServiceFailure, StudyResult, VideoSummary,
};
pub use task::TaskKind;
