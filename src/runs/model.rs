//! Run record models

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

/// A single recorded running session
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    #[serde(rename = "runId")]
    pub id: Uuid,
    pub account_id: Uuid,
    pub pace: f32,
    /// Elapsed time as entered by the runner, e.g. "00:31:20"
    #[sqlx(rename = "run_time")]
    pub time: String,
    pub distance: f32,
    pub lap: i32,
    pub incline: f32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial run update; `None` fields keep their stored value
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunPatch {
    pub pace: Option<f32>,
    pub time: Option<String>,
    pub distance: Option<f32>,
    pub lap: Option<i32>,
    pub incline: Option<f32>,
}

impl RunPatch {
    /// Apply the patch to a run in place, refreshing `updated_at`
    pub fn apply(self, run: &mut Run) {
        if let Some(pace) = self.pace {
            run.pace = pace;
        }
        if let Some(time) = self.time {
            run.time = time;
        }
        if let Some(distance) = self.distance {
            run.distance = distance;
        }
        if let Some(lap) = self.lap {
            run.lap = lap;
        }
        if let Some(incline) = self.incline {
            run.incline = incline;
        }
        run.updated_at = Utc::now();
    }
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Request to record a run
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRunRequest {
    pub account_id: Uuid,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub pace: f32,
    #[serde(default)]
    pub time: String,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub distance: f32,
    #[validate(range(min = 0))]
    #[serde(default)]
    pub lap: i32,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub incline: f32,
}

/// Identifies a single run of an account
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunKey {
    pub account_id: Uuid,
    pub run_id: Uuid,
}

/// Optional day filter for run listings (Unix epoch milliseconds)
#[derive(Debug, Deserialize, Default)]
pub struct RunFetchQuery {
    pub date: Option<i64>,
}

/// Partial run update; zero values and empty strings mean "unchanged"
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRunRequest {
    pub account_id: Uuid,
    pub run_id: Uuid,
    #[validate(range(min = 0.0))]
    pub pace: Option<f32>,
    pub time: Option<String>,
    #[validate(range(min = 0.0))]
    pub distance: Option<f32>,
    #[validate(range(min = 0))]
    pub lap: Option<i32>,
    #[validate(range(min = 0.0))]
    pub incline: Option<f32>,
}

impl UpdateRunRequest {
    pub fn into_patch(self) -> RunPatch {
        RunPatch {
            pace: self.pace.filter(|v| *v != 0.0),
            time: self.time.filter(|v| !v.trim().is_empty()),
            distance: self.distance.filter(|v| *v != 0.0),
            lap: self.lap.filter(|v| *v != 0),
            incline: self.incline.filter(|v| *v != 0.0),
        }
    }
}

impl CreateRunRequest {
    /// Field rules plus the finiteness check `range` does not cover
    pub fn validate_run(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        ensure_finite([
            ("pace", Some(self.pace)),
            ("distance", Some(self.distance)),
            ("incline", Some(self.incline)),
        ])
    }
}

impl UpdateRunRequest {
    /// Field rules plus the finiteness check `range` does not cover
    pub fn validate_run(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        ensure_finite([
            ("pace", self.pace),
            ("distance", self.distance),
            ("incline", self.incline),
        ])
    }
}

// JSON numbers beyond f32::MAX deserialize to infinity
fn ensure_finite(fields: [(&'static str, Option<f32>); 3]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for (name, value) in fields {
        if value.is_some_and(|v| !v.is_finite()) {
            let mut error = ValidationError::new("finite");
            error.message = Some("must be a finite number".into());
            errors.add(name, error);
        }
    }

    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_run() -> Run {
        let now = Utc::now();
        Run {
            id: Uuid::new_v4(),
            account_id: Uuid::new_v4(),
            pace: 5.5,
            time: "00:30:00".to_string(),
            distance: 5.0,
            lap: 1,
            incline: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_zero_values_are_not_applied() {
        let request = UpdateRunRequest {
            account_id: Uuid::new_v4(),
            run_id: Uuid::new_v4(),
            pace: Some(0.0),
            time: Some("  ".to_string()),
            distance: Some(10.0),
            lap: Some(0),
            incline: None,
        };

        let mut run = sample_run();
        request.into_patch().apply(&mut run);

        assert_eq!(run.pace, 5.5);
        assert_eq!(run.time, "00:30:00");
        assert_eq!(run.distance, 10.0);
        assert_eq!(run.lap, 1);
    }

    #[test]
    fn test_run_serializes_with_client_field_names() {
        let json = serde_json::to_value(sample_run()).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.contains_key("runId"));
        assert!(object.contains_key("accountId"));
        assert!(object.contains_key("createdAt"));
        assert!(object.contains_key("time"));
    }

    #[test]
    fn test_negative_distance_fails_validation() {
        let request = CreateRunRequest {
            account_id: Uuid::new_v4(),
            pace: 5.0,
            time: "00:20:00".to_string(),
            distance: -1.0,
            lap: 1,
            incline: 0.0,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_infinite_values_fail_validation() {
        let request: CreateRunRequest = serde_json::from_value(serde_json::json!({
            "accountId": Uuid::new_v4(),
            "distance": 1e39,
        }))
        .unwrap();
        assert!(request.distance.is_infinite());

        let errors = request.validate_run().unwrap_err();
        assert!(errors.field_errors().contains_key("distance"));

        let update = UpdateRunRequest {
            account_id: Uuid::new_v4(),
            run_id: Uuid::new_v4(),
            pace: Some(f32::NAN),
            time: None,
            distance: None,
            lap: None,
            incline: Some(f32::INFINITY),
        };
        let errors = update.validate_run().unwrap_err();
        assert!(errors.field_errors().contains_key("pace"));
        assert!(errors.field_errors().contains_key("incline"));
    }

    #[test]
    fn test_finite_values_pass_validation() {
        let request = CreateRunRequest {
            account_id: Uuid::new_v4(),
            pace: 5.0,
            time: "00:20:00".to_string(),
            distance: 4.2,
            lap: 2,
            incline: 0.5,
        };
        assert!(request.validate_run().is_ok());
    }
}
