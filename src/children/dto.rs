use serde::Deserialize;

use crate::error::ApiError;

/// Request body for creating a child profile.
#[derive(Debug, Deserialize)]
pub struct ChildCreate {
    pub name: String,
    pub grade: String,
    pub subjects: Vec<String>,
    pub learning_style: Option<String>,
    #[serde(default)]
    pub preferences: Option<serde_json::Value>,
}

impl ChildCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut problems = Vec::new();
        if self.subjects.is_empty() {
            problems.push("at least one subject must be specified".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(problems))
        }
    }
}

/// Partial update for a child profile. Omitted fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct ChildUpdate {
    pub name: Option<String>,
    pub grade: Option<String>,
    pub subjects: Option<Vec<String>>,
    pub learning_style: Option<String>,
    pub preferences: Option<serde_json::Value>,
}

impl ChildUpdate {
    /// Invariants are re-checked only for the fields actually supplied.
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut problems = Vec::new();
        if matches!(&self.subjects, Some(subjects) if subjects.is_empty()) {
            problems.push("at least one subject must be specified".to_string());
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation(problems))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_input(subjects: Vec<&str>) -> ChildCreate {
        ChildCreate {
            name: "Test Child".into(),
            grade: "3rd grade".into(),
            subjects: subjects.into_iter().map(String::from).collect(),
            learning_style: Some("Visual".into()),
            preferences: None,
        }
    }

    #[test]
    fn create_requires_at_least_one_subject() {
        let err = create_input(vec![]).validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(create_input(vec!["Math"]).validate().is_ok());
    }

    #[test]
    fn update_allows_omitted_subjects() {
        let patch: ChildUpdate = serde_json::from_str(r#"{"grade": "4th grade"}"#).unwrap();
        assert!(patch.validate().is_ok());
        assert!(patch.subjects.is_none());
    }

    #[test]
    fn update_rejects_emptied_subjects() {
        let patch: ChildUpdate = serde_json::from_str(r#"{"subjects": []}"#).unwrap();
        let err = patch.validate().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn preferences_accept_nested_json() {
        let input: ChildCreate = serde_json::from_str(
            r#"{
                "name": "C",
                "grade": "3",
                "subjects": ["Math"],
                "preferences": {"response_style": "concise", "topics": {"math": "fractions"}}
            }"#,
        )
        .unwrap();
        assert!(input.validate().is_ok());
        assert_eq!(
            input.preferences.as_ref().unwrap()["topics"]["math"],
            "fractions"
        );
    }
}
