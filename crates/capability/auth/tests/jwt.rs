use api_contract::{CLAIMS_VERSION, TokenClaims};
use domain::{Role, User};
use idf_auth::{AuthError, JwtManager, TokenVerifier};
use jsonwebtoken::{EncodingKey, Header};
use std::time::{SystemTime, UNIX_EPOCH};

fn user(role: Role) -> User {
    User::new("user-1", Some("a@b.com".to_string()), "Alice", role)
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_secs()
}

fn sign(secret: &str, claims: &TokenClaims) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("encode")
}

#[test]
fn jwt_issue_and_verify() {
    let jwt = JwtManager::new("secret".to_string(), 3600, 7200);
    let tokens = jwt.issue_tokens(&user(Role::Admin)).expect("tokens");

    let access = jwt.verify(&tokens.access_token).expect("access");
    assert_eq!(access.sub, "user-1");
    assert_eq!(access.role, Some(Role::Admin));
    assert_eq!(access.email.as_deref(), Some("a@b.com"));
    assert_eq!(access.ver, CLAIMS_VERSION);

    let refresh = jwt.verify_refresh(&tokens.refresh_token).expect("refresh");
    assert_eq!(refresh.sub, "user-1");
    assert!(refresh.exp > access.exp);
}

#[test]
fn token_types_are_not_interchangeable() {
    let jwt = JwtManager::new("secret".to_string(), 3600, 7200);
    let tokens = jwt.issue_tokens(&user(Role::User)).expect("tokens");
    assert!(matches!(
        jwt.verify(&tokens.refresh_token),
        Err(AuthError::InvalidToken)
    ));
    assert!(matches!(
        jwt.verify_refresh(&tokens.access_token),
        Err(AuthError::InvalidToken)
    ));
}

#[test]
fn expired_token_is_reported_as_expired() {
    let claims = TokenClaims {
        ver: CLAIMS_VERSION,
        sub: "user-1".to_string(),
        email: None,
        role: Some(Role::User),
        exp: now() - 600,
        token_type: "access".to_string(),
    };
    let token = sign("secret", &claims);
    let jwt = JwtManager::new("secret".to_string(), 3600, 7200);
    assert!(matches!(jwt.verify(&token), Err(AuthError::ExpiredToken)));
}

#[test]
fn zero_ttl_token_is_already_expired() {
    let jwt = JwtManager::new("secret".to_string(), 0, 0);
    let token = jwt.issue_access(&user(Role::User)).expect("token");
    assert!(matches!(jwt.verify(&token), Err(AuthError::ExpiredToken)));
}

#[test]
fn wrong_secret_or_garbage_is_invalid() {
    let issuer = JwtManager::new("secret".to_string(), 3600, 7200);
    let verifier = JwtManager::new("other".to_string(), 3600, 7200);
    let token = issuer.issue_access(&user(Role::User)).expect("token");
    assert!(matches!(verifier.verify(&token), Err(AuthError::InvalidToken)));
    assert!(matches!(verifier.verify("not-a-jwt"), Err(AuthError::InvalidToken)));
}

#[test]
fn unknown_claims_version_is_invalid() {
    let claims = TokenClaims {
        ver: CLAIMS_VERSION + 1,
        sub: "user-1".to_string(),
        email: None,
        role: Some(Role::User),
        exp: now() + 600,
        token_type: "access".to_string(),
    };
    let token = sign("secret", &claims);
    let jwt = JwtManager::new("secret".to_string(), 3600, 7200);
    assert!(matches!(jwt.verify(&token), Err(AuthError::InvalidToken)));
}
