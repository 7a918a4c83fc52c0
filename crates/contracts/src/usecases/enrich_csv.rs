use serde::{Deserialize, Serialize};

/// Processing summary attached to error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingStatus {
    pub status: String,
    pub message: String,
}

impl ProcessingStatus {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

/// Response body for `GET /api/files`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileListResponse {
    pub files: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processing_status_error_serializes() {
        let status = ProcessingStatus::error("only CSV files are accepted");
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "status": "error",
                "message": "only CSV files are accepted",
            })
        );
    }
}
