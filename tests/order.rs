use pretty_assertions::assert_eq;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serial_test::serial;
use url::Url;

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

#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticateUserResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: f64,
    pub stock: i32,
    pub image_url: Option<&'a str>,
    pub category_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductResponse {
    pub id: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder<'a> {
    pub items: Vec<OrderLine>,
    pub notes: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i64,
    pub order_number: String,
    pub status: String,
    pub total_amount: f64,
    pub items: Vec<OrderItemResponse>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
}

async fn register(client: &Client, url: &Url, email: &str) -> String {
    let res = client
        .post(url.join("/api/auth/register").unwrap())
        .json(&RegisterUser {
            email,
            password: "Secret123",
            first_name: "Grace",
            last_name: "Hopper",
        })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let auth: AuthenticateUserResponse = res.json().await.unwrap();
    auth.token
}

async fn create_product(client: &Client, url: &Url, token: &str, name: &str, price: f64) -> i64 {
    let res = client
        .post(url.join("/api/products").unwrap())
        .bearer_auth(token)
        .json(&CreateProduct {
            name,
            description: None,
            price,
            stock: 10,
            image_url: None,
            category_id: 1,
        })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let product: ProductResponse = res.json().await.unwrap();
    product.id
}

#[tokio::test]
#[serial]
async fn placed_order_totals_its_lines_from_snapshot_prices() {
    let (client, url, _pool) = setup_test().await;
    let token = register(&client, &url, "buyer@example.com").await;
    let keyboard = create_product(&client, &url, &token, "Mechanical Keyboard", 89.99).await;
    let cable = create_product(&client, &url, &token, "USB Cable", 4.99).await;

    let res = client
        .post(url.join("/api/orders").unwrap())
        .bearer_auth(&token)
        .json(&PlaceOrder {
            items: vec![
                OrderLine {
                    product_id: keyboard,
                    quantity: 1,
                },
                OrderLine {
                    product_id: cable,
                    quantity: 3,
                },
            ],
            notes: Some("leave at the door"),
        })
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let order: OrderResponse = res.json().await.unwrap();
    assert!(order.order_number.starts_with("ORD-"));
    assert_eq!(order.status, "pending");
    assert_eq!(order.items.len(), 2);
    assert_eq!(order.total_amount, 104.96);

    let cable_line = order
        .items
        .iter()
        .find(|item| item.product_id == cable)
        .unwrap();
    assert_eq!(cable_line.quantity, 3);
    assert_eq!(cable_line.unit_price, 4.99);
    assert_eq!(cable_line.total_price, 14.97);

    let res = client
        .get(url.join(&format!("/api/orders/{}", order.id)).unwrap())
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let fetched: OrderResponse = res.json().await.unwrap();
    assert_eq!(fetched.id, order.id);
    assert_eq!(fetched.items.len(), 2);
}

#[tokio::test]
#[serial]
async fn order_with_unknown_product_is_rejected_and_nothing_persists() {
    let (client, url, pool) = setup_test().await;
    let token = register(&client, &url, "buyer@example.com").await;
    let keyboard = create_product(&client, &url, &token, "Mechanical Keyboard", 89.99).await;

    let res = client
        .post(url.join("/api/orders").unwrap())
        .bearer_auth(&token)
        .json(&PlaceOrder {
            items: vec![
                OrderLine {
                    product_id: keyboard,
                    quantity: 1,
                },
                OrderLine {
                    product_id: 999,
                    quantity: 1,
                },
            ],
            notes: None,
        })
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let (orders,): (i64,) = sqlx::query_as("SELECT count(*) FROM shop.\"order\"")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(orders, 0);
}

#[tokio::test]
#[serial]
async fn order_without_items_is_rejected() {
    let (client, url, _pool) = setup_test().await;
    let token = register(&client, &url, "buyer@example.com").await;

    let res = client
        .post(url.join("/api/orders").unwrap())
        .bearer_auth(&token)
        .json(&PlaceOrder {
            items: vec![],
            notes: None,
        })
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[serial]
async fn order_is_invisible_to_other_users() {
    let (client, url, _pool) = setup_test().await;
    let buyer = register(&client, &url, "buyer@example.com").await;
    let product = create_product(&client, &url, &buyer, "Mechanical Keyboard", 89.99).await;

    let res = client
        .post(url.join("/api/orders").unwrap())
        .bearer_auth(&buyer)
        .json(&PlaceOrder {
            items: vec![OrderLine {
                product_id: product,
                quantity: 1,
            }],
            notes: None,
        })
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let order: OrderResponse = res.json().await.unwrap();

    let other = register(&client, &url, "other@example.com").await;
    let res = client
        .get(url.join(&format!("/api/orders/{}", order.id)).unwrap())
        .bearer_auth(&other)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[serial]
async fn placing_an_order_requires_a_token() {
    let (client, url, _pool) = setup_test().await;

    let res = client
        .post(url.join("/api/orders").unwrap())
        .json(&PlaceOrder {
            items: vec![OrderLine {
                product_id: 1,
                quantity: 1,
            }],
            notes: None,
        })
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
