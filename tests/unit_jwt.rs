use inkwell_auth::{
    Identity, Role, TokenError, decode_claims_at, issue_token, issue_token_at, verify_token,
    verify_token_at,
};
use inkwell_config::JwtConfig;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::json;

const NOW: i64 = 1_700_000_000;

fn config() -> JwtConfig {
    JwtConfig {
        secret: "jwt-unit-test-secret".to_string(),
        token_expiry: 43_200,
    }
}

fn identities() -> Vec<Identity> {
    vec![
        Identity::new(1, Role::User),
        Identity::new(1, Role::Admin),
        Identity::new(42, Role::User),
        Identity::new(i64::MAX, Role::Admin),
    ]
}

#[test]
fn test_verify_returns_issued_identity() {
    let config = config();
    for identity in identities() {
        let token = issue_token(&identity, &config).unwrap();
        assert_eq!(verify_token(&token, &config).unwrap(), identity);
    }
}

#[test]
fn test_default_expiry_is_twelve_hours() {
    let token = issue_token_at(&Identity::new(3, Role::User), &config(), NOW).unwrap();
    let claims = decode_claims_at(&token, &config(), NOW).unwrap();
    assert_eq!(claims.exp - claims.iat, 12 * 60 * 60);
}

#[test]
fn test_mutating_any_signature_char_fails() {
    let config = config();
    let token = issue_token_at(&Identity::new(7, Role::User), &config, NOW).unwrap();
    let (signed_part, signature) = token.rsplit_once('.').unwrap();

    for (i, original) in signature.char_indices() {
        let replacement = if original == 'A' { 'B' } else { 'A' };
        let mut mutated = signature.to_string();
        mutated.replace_range(i..i + 1, &replacement.to_string());

        let tampered = format!("{signed_part}.{mutated}");
        assert_eq!(
            verify_token_at(&tampered, &config, NOW),
            Err(TokenError::InvalidSignature),
            "signature char {i} mutated"
        );
    }
}

#[test]
fn test_expiry_boundary() {
    let config = config();
    let token = issue_token_at(&Identity::new(7, Role::Admin), &config, NOW).unwrap();
    let exp = NOW + config.token_expiry;

    assert!(verify_token_at(&token, &config, exp - 1).is_ok());
    assert_eq!(
        verify_token_at(&token, &config, exp + 1),
        Err(TokenError::Expired)
    );
}

#[test]
fn test_tampered_payload_fails_signature() {
    let config = config();
    let token = issue_token_at(&Identity::new(7, Role::User), &config, NOW).unwrap();
    let admin = issue_token_at(&Identity::new(7, Role::Admin), &config, NOW).unwrap();

    // user token's header and signature around the admin payload
    let user_parts: Vec<&str> = token.split('.').collect();
    let admin_parts: Vec<&str> = admin.split('.').collect();
    let forged = format!("{}.{}.{}", user_parts[0], admin_parts[1], user_parts[2]);

    assert_eq!(
        verify_token_at(&forged, &config, NOW),
        Err(TokenError::InvalidSignature)
    );
}

#[test]
fn test_wrong_secret_fails_signature() {
    let token = issue_token_at(&Identity::new(7, Role::User), &config(), NOW).unwrap();
    let other = JwtConfig {
        secret: "some-other-secret".to_string(),
        token_expiry: 43_200,
    };
    assert_eq!(
        verify_token_at(&token, &other, NOW),
        Err(TokenError::InvalidSignature)
    );
}

#[test]
fn test_malformed_tokens() {
    let config = config();
    for token in ["", "abc", "a.b", "a.b.c", "not.a.token.at.all"] {
        assert_eq!(
            verify_token_at(token, &config, NOW),
            Err(TokenError::Malformed),
            "{token:?}"
        );
    }
}

#[test]
fn test_unknown_role_is_malformed() {
    let config = config();
    let token = encode(
        &Header::default(),
        &json!({ "id": 1, "role": "superuser", "iat": NOW, "exp": NOW + 60 }),
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .unwrap();

    assert_eq!(
        verify_token_at(&token, &config, NOW),
        Err(TokenError::Malformed)
    );
}

#[test]
fn test_missing_exp_is_malformed() {
    let config = config();
    let token = encode(
        &Header::default(),
        &json!({ "id": 1, "role": "user", "iat": NOW }),
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .unwrap();

    assert_eq!(
        verify_token_at(&token, &config, NOW),
        Err(TokenError::Malformed)
    );
}
