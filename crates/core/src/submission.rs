//! Job submission payload validation.
//!
//! A submission is an opaque JSON object supplied by a producer. The only
//! structure this module imposes on it: a non-empty `job_queue` string must
//! be present, and a supplied `job_id` (resubmission) must parse as a UUID.
//! Everything else is carried through verbatim as the stored job payload.

use serde_json::Value;
use uuid::Uuid;

use crate::error::CoreError;

/// Payload key naming the target queue. Required.
pub const JOB_QUEUE_KEY: &str = "job_queue";

/// Payload key carrying a producer-supplied id on resubmission. Optional.
pub const JOB_ID_KEY: &str = "job_id";

/// Payload key whose presence marks a device reservation request. Only its
/// presence matters here; the contents are opaque to the broker.
pub const RESERVE_DATA_KEY: &str = "reserve_data";

/// A validated job submission, ready to insert.
#[derive(Debug, Clone)]
pub struct Submission {
    /// Generated v4 UUID, or the validated producer-supplied one.
    pub job_id: Uuid,
    /// Target queue, denormalized out of the payload.
    pub queue: String,
    /// The payload with the `job_id` key stripped; still contains
    /// `job_queue` (and `reserve_data`, when present) so reads can return
    /// the original definition flattened with the id.
    pub job_data: Value,
    /// True when the producer supplied the id (resubmission).
    pub resubmission: bool,
    /// True when the payload carries a `reserve_data` section.
    pub reservation: bool,
}

/// Validate a raw submission payload and assign its job id.
pub fn parse_submission(payload: Value) -> Result<Submission, CoreError> {
    let mut data = match payload {
        Value::Object(map) => map,
        _ => {
            return Err(CoreError::Validation(
                "job payload must be a JSON object".into(),
            ))
        }
    };

    let queue = data
        .get(JOB_QUEUE_KEY)
        .and_then(Value::as_str)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| CoreError::Validation("invalid data or no job_queue specified".into()))?
        .to_string();

    // A supplied job_id means resubmission; keep it as long as it parses.
    let (job_id, resubmission) = match data.remove(JOB_ID_KEY) {
        Some(Value::String(id)) => {
            let parsed = Uuid::parse_str(&id)
                .map_err(|_| CoreError::Validation("invalid job_id specified".into()))?;
            (parsed, true)
        }
        Some(_) => {
            return Err(CoreError::Validation("invalid job_id specified".into()));
        }
        None => (Uuid::new_v4(), false),
    };

    let reservation = data.contains_key(RESERVE_DATA_KEY);

    Ok(Submission {
        job_id,
        queue,
        job_data: Value::Object(data),
        resubmission,
        reservation,
    })
}
