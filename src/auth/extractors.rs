use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::UserView;

/// The user authenticated for this request.
///
/// Populated by the authentication middleware; handlers that take a
/// `CurrentUser` parameter can only be reached with a valid session.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserView);

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = Ready<Result<CurrentUser, AppError>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<UserView>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Not authorized to access this route".into()));
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use chrono::Utc;
    use uuid::Uuid;

    #[actix_rt::test]
    async fn test_extracts_user_from_extensions() {
        let user = UserView {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: crate::models::Role::User,
            is_active: true,
            created_at: Utc::now(),
        };

        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(user.clone());

        let current = CurrentUser::extract(&req).await.unwrap();
        assert_eq!(current.0.id, user.id);
        assert_eq!(current.0.email, user.email);
    }

    #[actix_rt::test]
    async fn test_missing_user_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let result = CurrentUser::extract(&req).await;

        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
