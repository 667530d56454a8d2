use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serial_test::serial;
use uuid::Uuid;

use crate::setup::setup_test;

mod setup;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUser<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserCredential<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticateUserResponse {
    pub user: UserResponse,
    pub token: String,
}

fn register_dto() -> RegisterUser<'static> {
    RegisterUser {
        email: "ada@example.com",
        password: "Secret123",
        first_name: "Ada",
        last_name: "Lovelace",
    }
}

#[tokio::test]
#[serial]
async fn register_then_login_issues_a_token_both_times() {
    let (client, url, _pool) = setup_test().await;
    let dto = register_dto();

    let res = client
        .post(url.join("/api/auth/register").unwrap())
        .json(&dto)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let registered: AuthenticateUserResponse = res.json().await.unwrap();
    assert!(!registered.token.is_empty());
    assert_eq!(registered.user.email, dto.email);
    assert_eq!(registered.user.first_name, dto.first_name);
    assert_eq!(registered.user.last_name, dto.last_name);
    assert!(registered.user.is_active);

    let res = client
        .post(url.join("/api/auth/login").unwrap())
        .json(&UserCredential {
            email: dto.email,
            password: dto.password,
        })
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let logged_in: AuthenticateUserResponse = res.json().await.unwrap();
    assert!(!logged_in.token.is_empty());
    assert_eq!(logged_in.user.id, registered.user.id);
}

#[tokio::test]
#[serial]
async fn login_with_wrong_password_is_unauthorized() {
    let (client, url, _pool) = setup_test().await;
    let dto = register_dto();

    let res = client
        .post(url.join("/api/auth/register").unwrap())
        .json(&dto)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(url.join("/api/auth/login").unwrap())
        .json(&UserCredential {
            email: dto.email,
            password: "Secret124",
        })
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn login_with_deactivated_account_is_unauthorized() {
    let (client, url, pool) = setup_test().await;
    let dto = register_dto();

    let res = client
        .post(url.join("/api/auth/register").unwrap())
        .json(&dto)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    sqlx::query("UPDATE iam.\"user\" SET is_active = FALSE WHERE email = $1")
        .bind(dto.email)
        .execute(&pool)
        .await
        .unwrap();

    let res = client
        .post(url.join("/api/auth/login").unwrap())
        .json(&UserCredential {
            email: dto.email,
            password: dto.password,
        })
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn login_with_unknown_email_is_unauthorized() {
    let (client, url, _pool) = setup_test().await;

    let res = client
        .post(url.join("/api/auth/login").unwrap())
        .json(&UserCredential {
            email: "nobody@example.com",
            password: "Secret123",
        })
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[serial]
async fn register_with_taken_email_is_rejected() {
    let (client, url, _pool) = setup_test().await;
    let dto = register_dto();

    let res = client
        .post(url.join("/api/auth/register").unwrap())
        .json(&dto)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(url.join("/api/auth/register").unwrap())
        .json(&dto)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn register_with_weak_password_is_rejected() {
    let (client, url, _pool) = setup_test().await;

    let res = client
        .post(url.join("/api/auth/register").unwrap())
        .json(&RegisterUser {
            password: "abc",
            ..register_dto()
        })
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
