use super::*;
use axum::http::HeaderValue;
use jsonwebtoken::{EncodingKey, Header, encode};

const SECRET: &str = "supersecretjwtsecretforunittesting123";

fn make_token(secret: &str, exp: usize) -> String {
    let claims = IdentityClaims {
        sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        email: Some("test@example.com".to_string()),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[test]
fn test_validate_identity_jwt_success() {
    let token = make_token(SECRET, 9999999999);

    let claims = validate_identity_jwt(SECRET, &token).expect("Valid token should pass");
    assert_eq!(claims.sub, "123e4567-e89b-12d3-a456-426614174000");
    assert_eq!(claims.email, Some("test@example.com".to_string()));
}

#[test]
fn test_validate_identity_jwt_expired() {
    let token = make_token(SECRET, 1);

    let result = validate_identity_jwt(SECRET, &token);
    assert!(result.is_err());
}

#[test]
fn test_validate_identity_jwt_invalid_signature() {
    let token = make_token("wrongsecret", 9999999999);

    let result = validate_identity_jwt(SECRET, &token);
    assert!(result.is_err());
}

#[test]
fn test_jwt_authenticator_accepts_valid_bearer() {
    let authenticator = Authenticator::from_config(Stage::Production, SECRET.to_string());
    let token = make_token(SECRET, 9999999999);

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );

    let user = authenticator.authenticate(&headers).expect("should pass");
    assert_eq!(
        user.user_id,
        Uuid::parse_str("123e4567-e89b-12d3-a456-426614174000").unwrap()
    );
}

#[test]
fn test_jwt_authenticator_rejects_missing_header() {
    let authenticator = Authenticator::from_config(Stage::Production, SECRET.to_string());

    let result = authenticator.authenticate(&HeaderMap::new());
    assert!(result.is_err());
}

#[test]
fn test_fixture_authenticator_only_selected_in_local_stage() {
    let local = Authenticator::from_config(Stage::Local, SECRET.to_string());
    assert!(matches!(local, Authenticator::Fixture { .. }));

    let production = Authenticator::from_config(Stage::Production, SECRET.to_string());
    assert!(matches!(production, Authenticator::Jwt { .. }));
}

#[test]
fn test_fixture_authenticator_ignores_headers() {
    let authenticator = Authenticator::from_config(Stage::Local, SECRET.to_string());

    let user = authenticator
        .authenticate(&HeaderMap::new())
        .expect("fixture should authenticate without headers");
    assert_eq!(user.user_id, Uuid::nil());
}
