use serde::{Deserialize, Serialize};

/// Lifecycle of a tracked request.
///
/// Transitions are driven entirely by dispatched actions; `Null` is the
/// untracked (or reset) state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[default]
    Null,
    Pending,
    Succeeded,
    Failed,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "NULL",
            Self::Pending => "PENDING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        }
    }

    pub fn is_null(self) -> bool {
        self == Self::Null
    }

    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }

    pub fn is_succeeded(self) -> bool {
        self == Self::Succeeded
    }

    pub fn is_failed(self) -> bool {
        self == Self::Failed
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn defaults_to_null() {
        assert_eq!(RequestStatus::default(), RequestStatus::Null);
        assert!(RequestStatus::default().is_null());
    }

    #[test]
    fn serializes_as_upper_snake_constants() {
        assert_eq!(
            serde_json::to_value(RequestStatus::Succeeded).unwrap(),
            json!("SUCCEEDED")
        );
        let status: RequestStatus = serde_json::from_value(json!("PENDING")).unwrap();
        assert!(status.is_pending());
    }

    #[test]
    fn displays_like_it_serializes() {
        assert_eq!(RequestStatus::Failed.to_string(), "FAILED");
    }
}
