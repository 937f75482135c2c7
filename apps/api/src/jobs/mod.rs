// Job postings: the collaborator boundary the intake pipeline reads from.

pub mod handlers;
pub mod store;

pub use store::{require_job, JobStore, PgJobStore};
