use serde::{Deserialize, Serialize};
use serde_json as json;
use serde_path_to_error as spte;

use crate::models::{ActivityResult, ElapsedDuration, UserProfile};
use crate::pipeline::{ActivityRequest, TrackingPipeline};

#[derive(Debug, Deserialize)]
struct ActivityRequestIn {
    #[serde(default, alias = "user_id", alias = "session")]
    session_id: String,
    #[serde(flatten)]
    duration: ElapsedDuration,
    profile: UserProfile,
}

#[derive(Debug, Serialize)]
struct RequestEcho {
    hour: u32,
    minute: u32,
    second: u32,
}

#[derive(Debug, Serialize)]
struct ActivityResponse<'a> {
    #[serde(flatten)]
    result: &'a ActivityResult,
    request: RequestEcho,
    time_limit: &'a str,
    artifact_path: String,
}

/// JSON in → run pipeline → JSON out. Errors come back as a message naming
/// the failing field path (decode) or the pipeline error.
///
/// Input: `{"session_id": "...", "hour": 0, "minute": 30, "second": 0,
///          "profile": {"gender": "Male", "age": 30, "weight": 70, "height": 175}}`
pub fn compute_activity_json(pipeline: &TrackingPipeline, json_in: &str) -> Result<String, String> {
    let mut de = json::Deserializer::from_str(json_in);
    let parsed: ActivityRequestIn = spte::deserialize(&mut de).map_err(|e| {
        let path = e.path().to_string();
        format!("parse error (ActivityRequest) at {}: {}", path, e.inner())
    })?;

    let request = ActivityRequest {
        session_id: parsed.session_id,
        duration: parsed.duration,
        profile: parsed.profile,
    };
    let outcome = pipeline.run(&request).map_err(|e| e.to_string())?;

    let resp = ActivityResponse {
        result: &outcome.result,
        request: RequestEcho {
            hour: request.duration.hours,
            minute: request.duration.minutes,
            second: request.duration.seconds,
        },
        time_limit: &outcome.time_limit,
        artifact_path: outcome.artifact_path.display().to_string(),
    };
    json::to_string(&resp).map_err(|e| e.to_string())
}

/// `{"time_limit": "H:MM:SS", "seconds": N}` for the configured log.
pub fn time_limit_json(pipeline: &TrackingPipeline) -> Result<String, String> {
    let span = pipeline.time_limit().map_err(|e| e.to_string())?;
    Ok(json::json!({
        "time_limit": crate::window::format_time_limit(span),
        "seconds": span.num_seconds(),
    })
    .to_string())
}
