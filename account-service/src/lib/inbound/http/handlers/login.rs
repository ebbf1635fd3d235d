use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::SignedInResponseData;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn login<S: AccountServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<SignedInResponseData>, ApiError> {
    state
        .account_service
        .login(LoginCommand::new(body.identifier, body.password))
        .await
        .map_err(ApiError::from)
        .map(|ref signed_in| ApiSuccess::new(StatusCode::OK, signed_in.into()))
}

/// HTTP request body for login. The identifier may be sent as `email` or `username`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    #[serde(default, alias = "email", alias = "username")]
    identifier: String,
    #[serde(default)]
    password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_aliases() {
        for body in [
            r#"{"email":"alice@example.com","password":"pw"}"#,
            r#"{"username":"alice@example.com","password":"pw"}"#,
            r#"{"identifier":"alice@example.com","password":"pw"}"#,
        ] {
            let request: LoginRequest = serde_json::from_str(body).unwrap();
            assert_eq!(request.identifier, "alice@example.com");
            assert_eq!(request.password, "pw");
        }
    }
}
