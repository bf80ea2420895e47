use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::identity::models::Caller;
use crate::identity::models::Role;
use crate::identity::models::UserId;

pub const USER_ID_HEADER: &str = "X-User-ID";
pub const USER_ROLE_HEADER: &str = "X-User-Role";

/// Reads the identity asserted by the gateway into a [`Caller`] extension.
///
/// Requests without a well-formed `X-User-ID` / `X-User-Role` pair are
/// rejected with 403 before reaching the handler.
pub async fn require_caller(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let caller = caller_from_headers(req.headers()).map_err(|reason| {
        tracing::warn!(uri = %req.uri(), reason, "Caller identity rejected");
        ApiError::Forbidden("Access denied: caller identity headers are missing or invalid".to_string())
    })?;

    req.extensions_mut().insert(caller);

    Ok(next.run(req).await)
}

fn caller_from_headers(headers: &HeaderMap) -> Result<Caller, &'static str> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .ok_or("missing user id header")?
        .to_str()
        .map_err(|_| "user id header is not ascii")?;
    let role = headers
        .get(USER_ROLE_HEADER)
        .ok_or("missing role header")?
        .to_str()
        .map_err(|_| "role header is not ascii")?;

    Ok(Caller {
        user_id: UserId::from_string(user_id).map_err(|_| "user id is not a uuid")?,
        role: role.parse::<Role>().map_err(|_| "unknown role")?,
    })
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(user_id: &'static str, role: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static(user_id));
        headers.insert(USER_ROLE_HEADER, HeaderValue::from_static(role));
        headers
    }

    #[test]
    fn test_caller_from_valid_headers() {
        let caller = caller_from_headers(&headers(
            "7f1c0e4a-3a57-4f0e-9a43-2b1a4d2f8c11",
            "SYS_ADMIN",
        ))
        .unwrap();

        assert_eq!(caller.role, Role::SysAdmin);
        assert_eq!(
            caller.user_id.to_string(),
            "7f1c0e4a-3a57-4f0e-9a43-2b1a4d2f8c11"
        );
    }

    #[test]
    fn test_role_parsing_is_exact() {
        for role in ["sys_admin", "SYS_ADMIN ", "ROLE_SYS_ADMIN", ""] {
            assert!(
                caller_from_headers(&headers("7f1c0e4a-3a57-4f0e-9a43-2b1a4d2f8c11", role))
                    .is_err(),
                "{:?} should be rejected",
                role
            );
        }
    }

    #[test]
    fn test_missing_headers() {
        assert!(caller_from_headers(&HeaderMap::new()).is_err());
        assert!(caller_from_headers(&headers("not-a-uuid", "SYS_ADMIN")).is_err());
    }
}
