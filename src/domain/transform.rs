use sqlx::{postgres::PgRow, Row};
use uuid::Uuid;

use crate::app::resource::catalog::CreateProduct;

use super::entity::{
    catalog::{Category, CategoryState, Product, ProductDraft, ProductState},
    iam::{User, UserState},
    order::{Order, OrderItem, OrderItemState, OrderState},
    EntityData,
};

impl From<&PgRow> for EntityData<i64> {
    fn from(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            created: row.get("created"),
            updated: row.get("updated"),
        }
    }
}

impl From<&PgRow> for EntityData<Uuid> {
    fn from(row: &PgRow) -> Self {
        Self {
            id: row.get("id"),
            created: row.get("created"),
            updated: row.get("updated"),
        }
    }
}

impl From<&PgRow> for UserState {
    fn from(row: &PgRow) -> Self {
        Self {
            email: row.get("email"),
            password_hash: row
                .get::<String, _>("password_hash")
                .parse()
                .expect("user table to have password_hash of type TEXT with a valid PHC string"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            is_active: row.get("is_active"),
        }
    }
}

impl From<&PgRow> for User {
    fn from(row: &PgRow) -> Self {
        Self::restore(row.into(), row.into())
    }
}

impl From<&PgRow> for CategoryState {
    fn from(row: &PgRow) -> Self {
        Self {
            name: row.get("name"),
            description: row.get("description"),
            is_active: row.get("is_active"),
        }
    }
}

impl From<&PgRow> for Category {
    fn from(row: &PgRow) -> Self {
        Self::restore(row.into(), row.into())
    }
}

impl From<&PgRow> for ProductState {
    fn from(row: &PgRow) -> Self {
        Self {
            name: row.get("name"),
            description: row.get("description"),
            price: row.get("price"),
            stock: row.get("stock"),
            image_url: row.get::<Option<&str>, _>("image_url").map(|s| {
                s.parse()
                    .expect("product table to have image_url of type TEXT with valid url")
            }),
            category_id: row.get("category_id"),
            user_id: row.get("user_id"),
        }
    }
}

impl From<&PgRow> for Product {
    fn from(row: &PgRow) -> Self {
        Self::restore(row.into(), row.into())
    }
}

impl From<&PgRow> for OrderState {
    fn from(row: &PgRow) -> Self {
        Self {
            order_number: row.get("order_number"),
            user_id: row.get("user_id"),
            order_date: row.get("order_date"),
            status: row
                .get::<&str, _>("status")
                .parse()
                .expect("order table to have status of type TEXT with a known order status"),
            total_amount: row.get("total_amount"),
            notes: row.get("notes"),
        }
    }
}

impl From<&PgRow> for Order {
    fn from(row: &PgRow) -> Self {
        Self::restore(row.into(), row.into())
    }
}

impl From<&PgRow> for OrderItemState {
    fn from(row: &PgRow) -> Self {
        Self {
            product_id: row.get("product_id"),
            quantity: row.get("quantity"),
            unit_price: row.get("unit_price"),
            total_price: row.get("total_price"),
        }
    }
}

impl From<&PgRow> for OrderItem {
    fn from(row: &PgRow) -> Self {
        Self::restore(row.into(), row.into())
    }
}

impl ProductDraft {
    /// Project a create/update payload onto a product write model.
    ///
    /// The owning seller always comes from the authenticated caller, never
    /// from the payload. The image url is expected to be validated upfront;
    /// an unparseable value is simply dropped here.
    pub fn from_payload(dto: &CreateProduct<'_>, seller: Uuid) -> Self {
        Self {
            name: dto.name.into(),
            description: dto.description.map(Into::into),
            price: dto.price,
            stock: dto.stock,
            image_url: dto.image_url.and_then(|s| s.parse().ok()),
            category_id: dto.category_id,
            user_id: seller,
        }
    }
}
