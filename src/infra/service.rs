pub mod security {
    use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
    use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
    use serde::{de::DeserializeOwned, Serialize};

    use crate::domain::datatype::security::{
        PasswordHash, PasswordHashError, TokenAudience, TokenEncryptionError, TokenIssuer,
        TokenPayload,
    };
    use crate::domain::service::{PasswordHashService, TokenEncryptionService};

    pub struct Argon2HashService(Argon2<'static>);

    impl Argon2HashService {
        pub fn new() -> Self {
            Self(Argon2::new(
                Algorithm::Argon2id,
                Version::V0x13,
                Params::new(
                    Params::DEFAULT_M_COST,
                    Params::DEFAULT_T_COST,
                    Params::DEFAULT_P_COST,
                    Some(Params::DEFAULT_OUTPUT_LEN),
                )
                .expect("Expect valid default Argon2 params"),
            ))
        }
    }

    impl PasswordHashService for Argon2HashService {
        fn hash_password(&self, pwd: &str) -> Result<PasswordHash, PasswordHashError> {
            let salt = password_hash::SaltString::generate(&mut rand_core::OsRng);

            let hash = self.0.hash_password(pwd.as_bytes(), &salt)?;

            hash.to_string()
                .parse()
                .map_err(|_| PasswordHashError::InvalidPasswordHash)
        }

        fn verify_password(&self, pwd: &str, hash: &PasswordHash) -> Result<(), PasswordHashError> {
            let parsed = password_hash::PasswordHash::new(hash.as_str())?;

            self.0
                .verify_password(pwd.as_bytes(), &parsed)
                .map_err(|_| PasswordHashError::InvalidPassword)
        }
    }

    pub struct JWTEncryptionService {
        header: Header,
        encoding_key: EncodingKey,
        decoding_key: DecodingKey,
        validation: Validation,
    }

    impl JWTEncryptionService {
        pub fn new(secret: String) -> Self {
            let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
            validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
            validation.set_issuer(&[TokenIssuer::as_str()]);
            validation.set_audience(&[TokenAudience::as_str()]);
            validation.leeway = 60;
            validation.validate_exp = true;
            validation.validate_nbf = false;

            Self {
                encoding_key: EncodingKey::from_secret(secret.as_ref()),
                decoding_key: DecodingKey::from_secret(secret.as_ref()),
                header: Header::new(jsonwebtoken::Algorithm::HS256),
                validation,
            }
        }
    }

    impl TokenEncryptionService for JWTEncryptionService {
        fn issue_token<T>(&self, payload: &TokenPayload<T>) -> Result<String, TokenEncryptionError>
        where
            T: Serialize,
        {
            let token = jsonwebtoken::encode(&self.header, payload, &self.encoding_key)?;
            Ok(token)
        }

        fn verify_token<T>(&self, token: &str) -> Result<TokenPayload<T>, TokenEncryptionError>
        where
            T: DeserializeOwned,
        {
            let token_data = jsonwebtoken::decode::<TokenPayload<T>>(
                token,
                &self.decoding_key,
                &self.validation,
            )?;
            Ok(token_data.claims)
        }
    }

    #[cfg(test)]
    mod tests {
        use std::time::Duration;

        use pretty_assertions::assert_eq;
        use uuid::Uuid;

        use super::{Argon2HashService, JWTEncryptionService};
        use crate::domain::datatype::security::{
            TokenAudience, TokenEncryptionError, TokenIssuer, TokenPayload, TokenSubject,
            UserClaims,
        };
        use crate::domain::service::{PasswordHashService, TokenEncryptionService};

        fn claims() -> UserClaims {
            UserClaims {
                email: "someone@example.com".into(),
                roles: vec!["user".into()],
            }
        }

        #[test]
        fn hashed_password_verifies_the_original_and_rejects_another() {
            let service = Argon2HashService::new();
            let hash = service.hash_password("Secret123").unwrap();

            assert!(service.verify_password("Secret123", &hash).is_ok());
            assert!(service.verify_password("Secret124", &hash).is_err());
        }

        #[test]
        fn issued_token_verifies_with_the_same_key() {
            let service = JWTEncryptionService::new("test-key".into());
            let subject = TokenSubject::User(Uuid::new_v4());
            let payload = TokenPayload::new(Duration::from_secs(300), subject, claims());

            let token = service.issue_token(&payload).unwrap();
            let verified: TokenPayload<UserClaims> = service.verify_token(&token).unwrap();

            assert_eq!(verified.sub, subject);
            assert_eq!(verified.claims.email, "someone@example.com");
        }

        #[test]
        fn token_does_not_verify_with_another_key() {
            let issuer = JWTEncryptionService::new("first-key".into());
            let verifier = JWTEncryptionService::new("second-key".into());
            let payload = TokenPayload::new(
                Duration::from_secs(300),
                TokenSubject::User(Uuid::new_v4()),
                claims(),
            );

            let token = issuer.issue_token(&payload).unwrap();
            let result = verifier.verify_token::<UserClaims>(&token);

            assert!(matches!(result, Err(TokenEncryptionError::InvalidToken)));
        }

        #[test]
        fn expired_token_is_rejected() {
            let service = JWTEncryptionService::new("test-key".into());
            // Build an already expired payload, past the verifier leeway.
            let payload = TokenPayload {
                iss: TokenIssuer::as_str().into(),
                aud: TokenAudience::as_str().into(),
                sub: TokenSubject::User(Uuid::new_v4()),
                iat: 1_600_000_000,
                exp: 1_600_000_300,
                claims: claims(),
            };

            let token = service.issue_token(&payload).unwrap();
            let result = service.verify_token::<UserClaims>(&token);

            assert!(matches!(result, Err(TokenEncryptionError::Expired)));
        }
    }
}
