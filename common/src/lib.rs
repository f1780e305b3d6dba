pub mod error;
pub mod job;
pub mod wire;

pub use error::OptimizeError;
pub use job::{Job, JobOutcome, PollStatus};
pub use wire::{OptimizeRequest, ResultResponse, StatusResponse, SubmitResponse};
