use crate::error::ApiError;
use tower_oauth2_resource_server::claims::DefaultClaims;
use uuid::Uuid;

/// The calling student, identified by the token's subject claim
pub fn student_id(claims: &DefaultClaims) -> Result<Uuid, ApiError> {
    parse_subject(claims.sub.as_deref())
}

fn parse_subject(sub: Option<&str>) -> Result<Uuid, ApiError> {
    let sub = sub.ok_or_else(|| ApiError::unauthorized("Token has no subject"))?;
    Uuid::parse_str(sub).map_err(|_| ApiError::unauthorized("Token subject is not a student id"))
}

#[cfg(test)]
mod test {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_parse_subject() {
        let id = Uuid::new_v4();
        assert_eq!(parse_subject(Some(&id.to_string())).unwrap(), id);
    }

    #[test]
    fn test_parse_subject_rejects() {
        assert_eq!(
            parse_subject(None).unwrap_err().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            parse_subject(Some("alice")).unwrap_err().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
