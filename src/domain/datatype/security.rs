use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::base::resource_id;
use crate::error::resource::{ValidationErrorKind, ValidationFieldError};
use crate::error::UnknownError;

/// Password hash in the [PHC string format][1].
///
/// The string is validated on construction; the hashing crates own the
/// format, this type only guarantees a well formed value reached the
/// database or the verifier.
///
/// [1]: https://github.com/P-H-C/phc-string-format/blob/master/phc-sf-spec.md#specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(Box<str>);

resource_id!(PasswordHash, "base::password_hash");

impl PasswordHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PasswordHash {
    type Err = ValidationFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        password_hash::PasswordHash::parse(s, password_hash::Encoding::B64).map_err(|_| {
            Self::Err::from_resource::<Self>(
                s.into(),
                String::new(),
                vec![ValidationErrorKind::Invalid],
            )
        })?;

        Ok(Self(Box::from(s)))
    }
}

impl std::fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Display)]
pub enum PasswordHashError {
    /// Unsupported Algorithm.
    UnsupportedAlgorithm,

    /// Invalid password.
    InvalidPassword,

    /// Invalid password hash.
    InvalidPasswordHash,

    /// Cryptographic error.
    Cryptographic,

    /// Error in the hasher configuration.
    Config,

    /// Error without a dedicated kind.
    Unknown,
}

impl std::error::Error for PasswordHashError {}

impl From<password_hash::Error> for PasswordHashError {
    fn from(err: password_hash::Error) -> Self {
        match err {
            password_hash::Error::Algorithm => Self::UnsupportedAlgorithm,
            password_hash::Error::Version => Self::UnsupportedAlgorithm,
            password_hash::Error::B64Encoding(_) => Self::InvalidPasswordHash,
            password_hash::Error::Crypto => Self::Cryptographic,
            password_hash::Error::OutputTooShort => Self::Cryptographic,
            password_hash::Error::OutputTooLong => Self::Cryptographic,
            password_hash::Error::Password => Self::InvalidPassword,
            password_hash::Error::PhcStringInvalid => Self::InvalidPasswordHash,
            password_hash::Error::PhcStringTooShort => Self::InvalidPasswordHash,
            password_hash::Error::PhcStringTooLong => Self::InvalidPasswordHash,
            password_hash::Error::ParamNameDuplicated => Self::Config,
            password_hash::Error::ParamNameInvalid => Self::Config,
            password_hash::Error::ParamValueInvalid(_) => Self::Config,
            password_hash::Error::ParamsMaxExceeded => Self::Config,
            password_hash::Error::SaltInvalid(_) => Self::Config,
            _ => Self::Unknown,
        }
    }
}

impl From<argon2::Error> for PasswordHashError {
    fn from(err: argon2::Error) -> Self {
        match err {
            argon2::Error::AlgorithmInvalid => Self::UnsupportedAlgorithm,
            argon2::Error::VersionInvalid => Self::UnsupportedAlgorithm,
            argon2::Error::PwdTooLong => Self::InvalidPassword,
            argon2::Error::KeyIdTooLong => Self::InvalidPasswordHash,
            argon2::Error::B64Encoding(_) => Self::InvalidPasswordHash,
            _ => Self::Config,
        }
    }
}

pub struct TokenIssuer;

impl TokenIssuer {
    pub const fn as_str() -> &'static str {
        "storefront_api"
    }
}

pub struct TokenAudience;

impl TokenAudience {
    pub const fn as_str() -> &'static str {
        "storefront_client"
    }
}

/// Principal a token was issued to.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum TokenSubject {
    #[display(fmt = "user:{_0}")]
    User(Uuid),
}

impl FromStr for TokenSubject {
    type Err = TokenEncryptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s
            .strip_prefix("user:")
            .ok_or(TokenEncryptionError::MalformedSubject)?;
        id.parse()
            .map(Self::User)
            .map_err(|_| TokenEncryptionError::MalformedSubject)
    }
}

impl Serialize for TokenSubject {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TokenSubject {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let sub = String::deserialize(deserializer)?;
        sub.parse().map_err(serde::de::Error::custom)
    }
}

/// Claims of a signed token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPayload<T> {
    pub iss: String,
    pub aud: String,
    pub sub: TokenSubject,
    pub iat: u64,
    pub exp: u64,
    #[serde(flatten)]
    pub claims: T,
}

impl<T> TokenPayload<T> {
    pub fn new(expires_in: Duration, sub: TokenSubject, claims: T) -> Self {
        let iat = Utc::now().timestamp() as u64;

        Self {
            iss: TokenIssuer::as_str().into(),
            aud: TokenAudience::as_str().into(),
            sub,
            iat,
            exp: iat + expires_in.as_secs(),
            claims,
        }
    }

    pub fn caller(&self) -> Caller {
        match self.sub {
            TokenSubject::User(user) => Caller { user },
        }
    }
}

/// Extra claims asserted by an authentication token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub email: String,
    pub roles: Vec<String>,
}

/// Authenticated request context.
///
/// Carries the subject extracted from a verified bearer token and is passed
/// explicitly into each use case; the acting user is never read from the
/// request payload.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub user: Uuid,
}

/// A signed token together with its verified payload.
#[derive(Debug)]
pub struct Token<T> {
    pub(in crate::domain) token: String,
    pub(in crate::domain) payload: TokenPayload<T>,
}

impl<T> Token<T> {
    pub fn payload(&self) -> &TokenPayload<T> {
        &self.payload
    }
}

impl<T> From<Token<T>> for String {
    fn from(token: Token<T>) -> Self {
        token.token
    }
}

#[derive(Debug, Display)]
pub enum TokenEncryptionError {
    #[display(fmt = "expired_token")]
    Expired,
    #[display(fmt = "invalid_token")]
    InvalidToken,
    #[display(fmt = "malformed_subject")]
    MalformedSubject,
    #[display(fmt = "unknown token encryption error: {_0}")]
    Unknown(UnknownError),
}

impl std::error::Error for TokenEncryptionError {}

impl From<jsonwebtoken::errors::Error> for TokenEncryptionError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => return Self::Expired,
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::InvalidIssuer
            | ErrorKind::InvalidAudience
            | ErrorKind::InvalidSubject
            | ErrorKind::ImmatureSignature
            | ErrorKind::InvalidAlgorithm => return Self::InvalidToken,
            _ => {}
        }

        Self::Unknown(UnknownError::new(err.into()))
    }
}
