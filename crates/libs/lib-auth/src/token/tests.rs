//! # Token Issuance Tests

use super::*;
use crate::_dev_utils::{
    public_key_pair, standard_key_pair, token_keys, PUBLIC_TOKEN_PRIVATE_PEM,
    STANDARD_PRIVATE_PEM, STANDARD_PUBLIC_PEM,
};

fn assert_expiry(iat: i64, exp: i64, ttl: Duration) {
    let now = Utc::now().timestamp();
    assert!((now - iat).abs() <= 2, "iat {iat} too far from now {now}");
    assert_eq!(exp - iat, ttl.num_seconds());
}

#[test]
fn test_issue_standard_token_decodes_with_standard_pair() {
    let standard = standard_key_pair();
    let issued = issue(&IdentityClaim::access("u1", "alice"), &standard, Duration::hours(1))
        .expect("Issuing with the standard pair should succeed");

    let claims: Claims<IdentityClaim> =
        decode(&issued.token, &standard).expect("Token should decode with the standard pair");

    assert_eq!(claims.payload, IdentityClaim::access("u1", "alice"));
    assert_eq!(claims.aud, "standard");
    assert_expiry(claims.iat, claims.exp, Duration::hours(1));
    assert_eq!(issued.expires_at.timestamp(), claims.exp);
    assert_eq!(issued.audience, TokenAudience::Standard);
}

#[test]
fn test_standard_token_fails_against_public_pair() {
    let issued = issue(
        &IdentityClaim::access("u1", "alice"),
        &standard_key_pair(),
        Duration::hours(1),
    )
    .unwrap();

    let result = decode::<IdentityClaim>(&issued.token, &public_key_pair());
    assert!(matches!(result, Err(Error::InvalidToken(_))));
}

#[test]
fn test_public_token_fails_against_standard_pair() {
    let public = public_key_pair();
    let payload = PublicClaim::anonymous(Some("web".to_string()));
    let issued = issue_public_token(&payload, &public, Duration::minutes(30)).unwrap();

    let claims: Claims<PublicClaim> = decode(&issued.token, &public).unwrap();
    assert_eq!(claims.payload, payload);
    assert_eq!(claims.aud, "public");
    assert_expiry(claims.iat, claims.exp, Duration::minutes(30));

    let result = decode::<PublicClaim>(&issued.token, &standard_key_pair());
    assert!(matches!(result, Err(Error::InvalidToken(_))));
}

#[test]
fn test_issue_paths_refuse_the_other_pair() {
    let identity = IdentityClaim::access("u1", "alice");
    let result = issue(&identity, &public_key_pair(), Duration::hours(1));
    assert!(matches!(
        result,
        Err(Error::AudienceMismatch { expected: "standard", actual: "public" })
    ));

    let result = issue_public_token(
        &PublicClaim::anonymous(None),
        &standard_key_pair(),
        Duration::hours(1),
    );
    assert!(matches!(
        result,
        Err(Error::AudienceMismatch { expected: "public", actual: "standard" })
    ));
}

#[test]
fn test_token_keys_refuse_swapped_slots() {
    let result = TokenKeys::new(public_key_pair(), standard_key_pair());
    assert!(matches!(result, Err(Error::AudienceMismatch { .. })));

    let keys = token_keys();
    assert_eq!(keys.get(TokenAudience::Standard).audience(), TokenAudience::Standard);
    assert_eq!(keys.get(TokenAudience::Public).audience(), TokenAudience::Public);
}

#[test]
fn test_non_positive_ttl_is_signing_error() {
    let result = issue(
        &IdentityClaim::access("u1", "alice"),
        &standard_key_pair(),
        Duration::zero(),
    );
    assert!(matches!(result, Err(Error::Signing(_))));
}

#[test]
fn test_expired_token_is_reported_as_expired() {
    let standard = standard_key_pair();
    let past = Utc::now() - Duration::hours(2);
    let claims = Claims {
        payload: IdentityClaim::access("u1", "alice"),
        aud: "standard".to_string(),
        iat: past.timestamp(),
        exp: (past + Duration::hours(1)).timestamp(),
        jti: "expired".to_string(),
    };
    let token = jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &standard.encoding).unwrap();

    assert!(matches!(
        decode::<IdentityClaim>(&token, &standard),
        Err(Error::TokenExpired)
    ));
}

#[test]
fn test_tampered_token_is_invalid() {
    let standard = standard_key_pair();
    let issued = issue(&IdentityClaim::access("u1", "alice"), &standard, Duration::hours(1)).unwrap();

    let mut parts: Vec<&str> = issued.token.split('.').collect();
    let forged_payload = issue(&IdentityClaim::access("admin", "root"), &standard, Duration::hours(1))
        .unwrap()
        .token
        .split('.')
        .nth(1)
        .unwrap()
        .to_string();
    parts[1] = &forged_payload;
    let tampered = parts.join(".");

    assert!(matches!(
        decode::<IdentityClaim>(&tampered, &standard),
        Err(Error::InvalidToken(_))
    ));
}

#[test]
fn test_key_pair_rejects_bad_or_mismatched_material() {
    let result = KeyPair::from_rsa_pem(TokenAudience::Standard, b"not a pem", STANDARD_PUBLIC_PEM.as_bytes());
    assert!(matches!(result, Err(Error::KeyMaterial(_))));

    let result = KeyPair::from_rsa_pem(
        TokenAudience::Standard,
        PUBLIC_TOKEN_PRIVATE_PEM.as_bytes(),
        STANDARD_PUBLIC_PEM.as_bytes(),
    );
    match result {
        Err(Error::KeyMaterial(msg)) => assert!(msg.contains("do not form a pair")),
        other => panic!("expected key material error, got {other:?}"),
    }
}

#[test]
fn test_key_pair_debug_redacts_keys() {
    let rendered = format!("{:?}", standard_key_pair());
    assert!(rendered.contains("Standard"));
    assert!(!rendered.contains("BEGIN"));
    assert!(!STANDARD_PRIVATE_PEM.is_empty());
}

#[tokio::test]
async fn test_token_issuer_uses_the_right_slot_per_path() {
    let ttls = TokenTtls {
        access: Duration::hours(1),
        refresh: Duration::days(7),
        public: Duration::minutes(30),
    };
    let issuer = TokenIssuer::new(Arc::new(token_keys()), ttls);

    let access = issuer.issue_access("u1", "alice").await.unwrap();
    let claims: Claims<IdentityClaim> = decode(&access.token, issuer.keys().standard()).unwrap();
    assert_eq!(claims.payload.kind, TokenKind::Access);
    assert_expiry(claims.iat, claims.exp, ttls.access);

    let refresh = issuer.issue_refresh("u1", "alice").await.unwrap();
    let claims: Claims<IdentityClaim> = decode(&refresh.token, issuer.keys().standard()).unwrap();
    assert_eq!(claims.payload.kind, TokenKind::Refresh);
    assert_expiry(claims.iat, claims.exp, ttls.refresh);

    let public = issuer.issue_public(PublicClaim::anonymous(None)).await.unwrap();
    let claims: Claims<PublicClaim> = decode(&public.token, issuer.keys().public()).unwrap();
    assert!(claims.payload.sub.starts_with("public:"));
    assert!(decode::<PublicClaim>(&public.token, issuer.keys().standard()).is_err());
}

#[test]
fn test_claims_wire_format_is_flat() {
    let claims = Claims {
        payload: IdentityClaim::access("u1", "alice"),
        aud: "standard".to_string(),
        iat: 1,
        exp: 2,
        jti: "id".to_string(),
    };
    let json = serde_json::to_value(&claims).unwrap();
    assert_eq!(json["sub"], "u1");
    assert_eq!(json["kind"], "access");
    assert_eq!(json["aud"], "standard");
}

#[test]
fn test_payload_cannot_override_registered_claims() {
    let public = public_key_pair();

    for key in ["aud", "exp", "iat", "jti"] {
        let mut payload = serde_json::json!({ "sub": "x" });
        payload[key] = serde_json::json!(1);

        let result = issue_public_token(&payload, &public, Duration::hours(1));
        assert!(
            matches!(&result, Err(Error::Signing(msg)) if msg.contains(key)),
            "{key}: {result:?}"
        );
    }

    let result = issue_public_token(
        &serde_json::json!({ "exp": 1, "aud": "standard", "sub": "x" }),
        &public,
        Duration::hours(1),
    );
    assert!(matches!(result, Err(Error::Signing(_))));
}

#[test]
fn test_non_object_payload_is_signing_error() {
    let result = issue_public_token(&"just-a-string", &public_key_pair(), Duration::hours(1));
    assert!(matches!(result, Err(Error::Signing(_))));
}
