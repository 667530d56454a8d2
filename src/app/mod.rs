pub mod resource;
pub mod use_case;

pub mod transform {
    pub mod user {
        use crate::{
            app::resource::iam::UserResponse,
            domain::entity::{iam::User, Entity},
        };

        impl From<User> for UserResponse {
            fn from(user: User) -> Self {
                Self {
                    id: user.ident(),
                    created_at: user.created(),
                    email: user.email().clone(),
                    first_name: user.first_name().clone(),
                    last_name: user.last_name().clone(),
                    is_active: user.is_active(),
                }
            }
        }
    }

    pub mod catalog {
        use crate::{
            app::resource::catalog::{CategoryResponse, ProductResponse},
            domain::entity::Entity,
            infra::database::query::{CategoryDetail, ProductDetail},
        };

        impl From<ProductDetail> for ProductResponse {
            fn from(detail: ProductDetail) -> Self {
                let product = detail.product;

                Self {
                    id: product.ident(),
                    created_at: product.created(),
                    name: product.name().clone(),
                    description: product.description().clone(),
                    price: product.price(),
                    stock: product.stock(),
                    image_url: product.image_url().clone(),
                    category_id: product.category_id(),
                    category_name: detail.category_name,
                    seller_name: detail.seller_name,
                }
            }
        }

        impl From<CategoryDetail> for CategoryResponse {
            fn from(detail: CategoryDetail) -> Self {
                let category = detail.category;

                Self {
                    id: category.ident(),
                    created_at: category.created(),
                    name: category.name().clone(),
                    description: category.description().clone(),
                    is_active: category.is_active(),
                    product_count: detail.product_count,
                }
            }
        }
    }

    pub mod order {
        use crate::{
            app::resource::order::{OrderItemResponse, OrderResponse},
            domain::entity::{order::OrderItem, Entity},
            infra::database::query::OrderDetail,
        };

        impl From<OrderItem> for OrderItemResponse {
            fn from(item: OrderItem) -> Self {
                Self {
                    id: item.ident(),
                    product_id: item.product_id(),
                    quantity: item.quantity(),
                    unit_price: item.unit_price(),
                    total_price: item.total_price(),
                }
            }
        }

        impl From<OrderDetail> for OrderResponse {
            fn from(detail: OrderDetail) -> Self {
                let items = detail.items.into_iter().map(Into::into).collect();
                let order = detail.order;

                Self {
                    id: order.ident(),
                    order_number: order.order_number().clone(),
                    user_id: order.user_id(),
                    status: order.status().as_str().into(),
                    order_date: order.order_date(),
                    total_amount: order.total_amount(),
                    notes: order.notes().clone(),
                    items,
                }
            }
        }
    }
}
