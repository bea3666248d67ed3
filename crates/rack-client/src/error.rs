use rack_domain::DomainError;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("not signed in")]
    Unauthorized,
    #[error("http {status}: {}", message.as_deref().unwrap_or("no message"))]
    Server { status: u16, message: Option<String> },
    #[error("json error: {0}")]
    Decode(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Error body returned by the server
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl ApiError {
    /// Build from a non-success status and its raw body
    pub fn from_status(status: u16, body: &str) -> Self {
        if status == 401 {
            return ApiError::Unauthorized;
        }
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        ApiError::Server { status, message }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Unauthorized => Some(401),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Text for a notice: the server's message verbatim, else a fallback for `operation`
    pub fn user_message(&self, operation: ApiOperation) -> String {
        match self {
            ApiError::Server { message: Some(message), .. } => message.clone(),
            ApiError::InvalidInput(message) => message.clone(),
            ApiError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            ApiError::Timeout => format!("{} The server did not respond in time.", operation.fallback()),
            _ => operation.fallback().to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::InvalidInput(err.detail().to_string())
    }
}

pub(crate) fn map_reqwest_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::Timeout
    } else if e.is_decode() {
        ApiError::Decode(e.to_string())
    } else {
        ApiError::Transport(e.to_string())
    }
}

/// What the user was doing when a request failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    Login,
    Register,
    LoadRacks,
    CreateRack,
    UpdateRack,
    DeleteRack,
    LoadGecko,
    SaveGecko,
    DeleteGecko,
    MoveGecko,
    SwapGeckos,
    LoadLogs,
    AddLog,
    DeleteLog,
    LoadPhotos,
    UploadPhoto,
    SetMainPhoto,
    DeletePhoto,
    LoadAlerts,
}

impl ApiOperation {
    pub fn fallback(&self) -> &'static str {
        match self {
            ApiOperation::Login => "Failed to sign in.",
            ApiOperation::Register => "Failed to create the account.",
            ApiOperation::LoadRacks => "Failed to load racks.",
            ApiOperation::CreateRack => "Failed to create the rack.",
            ApiOperation::UpdateRack => "Failed to update the rack.",
            ApiOperation::DeleteRack => "Failed to delete the rack.",
            ApiOperation::LoadGecko => "Failed to load the gecko.",
            ApiOperation::SaveGecko => "Failed to save the gecko.",
            ApiOperation::DeleteGecko => "Failed to delete the gecko.",
            ApiOperation::MoveGecko => "Failed to move the gecko.",
            ApiOperation::SwapGeckos => "Failed to swap the geckos.",
            ApiOperation::LoadLogs => "Failed to load care logs.",
            ApiOperation::AddLog => "Failed to add the care log.",
            ApiOperation::DeleteLog => "Failed to delete the care log.",
            ApiOperation::LoadPhotos => "Failed to load photos.",
            ApiOperation::UploadPhoto => "Failed to upload the photo.",
            ApiOperation::SetMainPhoto => "Failed to set the main photo.",
            ApiOperation::DeletePhoto => "Failed to delete the photo.",
            ApiOperation::LoadAlerts => "Failed to load alerts.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_is_shown_verbatim() {
        let err = ApiError::from_status(409, r#"{"message":"Target cell is occupied"}"#);
        assert_eq!(err.status(), Some(409));
        assert_eq!(err.user_message(ApiOperation::MoveGecko), "Target cell is occupied");
    }

    #[test]
    fn test_fallback_without_message() {
        let err = ApiError::from_status(500, "<html>Internal Server Error</html>");
        assert_eq!(err, ApiError::Server { status: 500, message: None });
        assert_eq!(err.user_message(ApiOperation::MoveGecko), "Failed to move the gecko.");

        let err = ApiError::Transport("connection refused (os error 111)".to_string());
        assert_eq!(err.user_message(ApiOperation::LoadRacks), "Failed to load racks.");
    }

    #[test]
    fn test_error_key_and_blank_message() {
        let err = ApiError::from_status(400, r#"{"error":"Invalid rows"}"#);
        assert_eq!(err.user_message(ApiOperation::CreateRack), "Invalid rows");

        let err = ApiError::from_status(400, r#"{"message":"  "}"#);
        assert_eq!(err.user_message(ApiOperation::CreateRack), "Failed to create the rack.");
    }

    #[test]
    fn test_401_is_unauthorized() {
        let err = ApiError::from_status(401, r#"{"message":"jwt expired"}"#);
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_domain_error_detail() {
        let err: ApiError = DomainError::InvalidInput("name is required".to_string()).into();
        assert_eq!(err.user_message(ApiOperation::SaveGecko), "name is required");
    }
}
