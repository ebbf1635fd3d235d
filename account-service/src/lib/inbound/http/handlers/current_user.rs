use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::domain::account::models::AuthenticatedUser;

/// Identity of the bearer, as established by the authentication middleware.
pub async fn current_user(
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiSuccess<CurrentUserResponseData> {
    ApiSuccess::new(StatusCode::OK, (&user).into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUserResponseData {
    pub subject_id: String,
    pub email: String,
}

impl From<&AuthenticatedUser> for CurrentUserResponseData {
    fn from(user: &AuthenticatedUser) -> Self {
        Self {
            subject_id: user.user_id.to_string(),
            email: user.email.clone(),
        }
    }
}
