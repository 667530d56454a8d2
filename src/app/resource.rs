pub mod iam {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    use crate::base::resource_id;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RegisterUser<'a> {
        pub email: &'a str,
        // Never echoed back in validation error bodies.
        #[serde(skip_serializing)]
        pub password: &'a str,
        pub first_name: &'a str,
        pub last_name: &'a str,
    }

    resource_id!(RegisterUser<'_>, "iam::RegisterUser");

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct UserCredential<'a> {
        pub email: &'a str,
        #[serde(skip_serializing)]
        pub password: &'a str,
    }

    resource_id!(UserCredential<'_>, "iam::UserCredential");

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct UserResponse {
        pub id: Uuid,
        pub email: String,
        pub first_name: String,
        pub last_name: String,
        pub is_active: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct AuthenticateUserResponse {
        pub user: UserResponse,
        pub token: String,
    }
}

pub mod catalog {
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;
    use serde::{Deserialize, Serialize};
    use url::Url;

    use crate::base::resource_id;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CreateProduct<'a> {
        pub name: &'a str,
        #[serde(default)]
        pub description: Option<&'a str>,
        pub price: Decimal,
        pub stock: i32,
        #[serde(default)]
        pub image_url: Option<&'a str>,
        pub category_id: i64,
    }

    resource_id!(CreateProduct<'_>, "catalog::CreateProduct");

    /// Catalog listing filter, built from the request query string.
    #[derive(Debug, Clone)]
    pub struct ProductFilter {
        pub category_id: Option<i64>,
        pub search_term: Option<String>,
        pub page: Option<u32>,
        pub page_size: Option<u32>,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ProductResponse {
        pub id: i64,
        pub name: String,
        pub description: Option<String>,
        pub price: Decimal,
        pub stock: i32,
        pub image_url: Option<Url>,
        pub category_id: i64,
        pub category_name: String,
        pub seller_name: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryResponse {
        pub id: i64,
        pub name: String,
        pub description: Option<String>,
        pub is_active: bool,
        pub product_count: i64,
        pub created_at: DateTime<Utc>,
    }
}

pub mod order {
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;
    use serde::{Deserialize, Serialize};

    use crate::base::resource_id;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PlaceOrder<'a> {
        pub items: Vec<OrderLine>,
        #[serde(default)]
        pub notes: Option<&'a str>,
    }

    resource_id!(PlaceOrder<'_>, "order::PlaceOrder");

    #[derive(Debug, Clone, Copy, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OrderLine {
        pub product_id: i64,
        pub quantity: i32,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OrderResponse {
        pub id: i64,
        pub order_number: String,
        pub user_id: uuid::Uuid,
        pub status: String,
        pub order_date: DateTime<Utc>,
        pub total_amount: Decimal,
        pub notes: Option<String>,
        pub items: Vec<OrderItemResponse>,
    }

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OrderItemResponse {
        pub id: i64,
        pub product_id: i64,
        pub quantity: i32,
        pub unit_price: Decimal,
        pub total_price: Decimal,
    }
}
