use rust_decimal::Decimal;
use url::Url;
use uuid::Uuid;

use super::{impl_entity, state_copy, state_ref, EntityData};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryState {
    pub(in crate::domain) name: String,
    pub(in crate::domain) description: Option<String>,
    pub(in crate::domain) is_active: bool,
}

#[derive(Debug, Clone)]
pub struct Category {
    pub(in crate::domain) data: EntityData<i64>,
    pub(in crate::domain) state: CategoryState,
}

impl_entity!(Category, i64, CategoryState);

impl Category {
    state_ref!(name, String);
    state_ref!(description, Option<String>);
    state_copy!(is_active, bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductState {
    pub(in crate::domain) name: String,
    pub(in crate::domain) description: Option<String>,
    pub(in crate::domain) price: Decimal,
    pub(in crate::domain) stock: i32,
    pub(in crate::domain) image_url: Option<Url>,
    pub(in crate::domain) category_id: i64,
    pub(in crate::domain) user_id: Uuid,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub(in crate::domain) data: EntityData<i64>,
    pub(in crate::domain) state: ProductState,
}

impl_entity!(Product, i64, ProductState);

impl Product {
    state_ref!(name, String);
    state_ref!(description, Option<String>);
    state_ref!(image_url, Option<Url>);
    state_copy!(price, Decimal);
    state_copy!(stock, i32);
    state_copy!(category_id, i64);
    state_copy!(user_id, Uuid);
}

/// Write model for a product insert or update.
///
/// Serial ids and audit stamps only exist once the persistence layer has
/// accepted the draft, so this carries the caller supplied state alone.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub image_url: Option<Url>,
    pub category_id: i64,
    pub user_id: Uuid,
}
