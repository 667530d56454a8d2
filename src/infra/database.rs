pub mod connection {
    use std::time::Duration;

    use crate::config::env_var;

    pub async fn create_sqlx_pool() -> sqlx::PgPool {
        let dburl = env_var::get().database_url.clone();
        sqlx::postgres::PgPoolOptions::new()
            .min_connections(1)
            .max_connections(env_var::get().database_pool_size)
            .acquire_timeout(Duration::from_millis(1000))
            .idle_timeout(Duration::from_millis(1000 * 30))
            .max_lifetime(Duration::from_millis(1000 * 10))
            .connect(&dburl)
            .await
            .expect("Expect to create a database pool with a open connection")
    }
}

pub mod sql {
    use sqlx::{Database, Encode, QueryBuilder, Type};

    pub fn push_list<'args, I, T, DB>(qb: &mut QueryBuilder<'args, DB>, list: I)
    where
        I: IntoIterator<Item = T>,
        T: 'args + Encode<'args, DB> + Send + Type<DB>,
        DB: Database,
    {
        qb.push("(");
        let mut sep = qb.separated(", ");
        for item in list {
            sep.push_bind(item);
        }
        sep.push_unseparated(")");
    }
}

/// User persistence.
///
/// Users live outside the catalog unit-of-work: registration and login are
/// single statement operations straight on the pool.
pub mod repository {
    use sqlx::{PgPool, QueryBuilder};

    use crate::{
        domain::entity::{iam::User, Entity},
        error::persistence::PersistenceError,
    };

    pub async fn insert_user<'u, I>(pool: &PgPool, users: I) -> Result<(), PersistenceError>
    where
        I: IntoIterator<Item = &'u User>,
    {
        let mut qb = QueryBuilder::new(concat!(
            "INSERT INTO iam.\"user\" ",
            "(id, created, updated, email, password_hash, first_name, last_name, is_active) ",
        ));

        qb.push_values(users.into_iter(), |mut qb, user| {
            qb.push_bind(user.ident());
            qb.push_bind(user.created());
            qb.push_bind(user.updated());
            qb.push_bind(user.email());
            qb.push_bind(user.password_hash().as_str());
            qb.push_bind(user.first_name());
            qb.push_bind(user.last_name());
            qb.push_bind(user.is_active());
        });

        qb.build().execute(pool).await?;

        Ok(())
    }

    pub async fn find_user_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<User>, PersistenceError> {
        let row = sqlx::query(concat!(
            "SELECT id, created, updated, email, password_hash, first_name, last_name, is_active ",
            "FROM iam.\"user\" WHERE email = $1",
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(row.as_ref().map(User::from))
    }

    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, PersistenceError> {
        let row = sqlx::query("SELECT 1 FROM iam.\"user\" WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(row.is_some())
    }
}

pub mod unit_of_work {
    use futures::TryStreamExt;
    use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
    use uuid::Uuid;

    use super::sql;
    use crate::{
        domain::entity::{
            catalog::{Category, Product, ProductDraft},
            order::{Order, OrderDraft, OrderItem, OrderItemDraft},
        },
        error::persistence::PersistenceError,
    };

    /// Transactional session over the catalog aggregates.
    ///
    /// Holds one open transaction plus the acting user stamped into the
    /// audit columns; every repository handed out by the session executes on
    /// the same transaction, so nothing is visible to readers before
    /// [`commit`](UnitOfWork::commit). Audit timestamps are set by the
    /// statements themselves, never by callers.
    ///
    /// There is no automatic rollback: a caller abandoning a multi step
    /// sequence is expected to call [`rollback`](UnitOfWork::rollback).
    pub struct UnitOfWork {
        trx: Transaction<'static, Postgres>,
        actor: Option<Uuid>,
    }

    impl UnitOfWork {
        pub async fn begin(pool: &PgPool, actor: Option<Uuid>) -> Result<Self, PersistenceError> {
            Ok(Self {
                trx: pool.begin().await?,
                actor,
            })
        }

        pub fn products(&mut self) -> ProductRepository<'_> {
            ProductRepository {
                trx: &mut self.trx,
                actor: self.actor,
            }
        }

        pub fn categories(&mut self) -> CategoryRepository<'_> {
            CategoryRepository { trx: &mut self.trx }
        }

        pub fn orders(&mut self) -> OrderRepository<'_> {
            OrderRepository {
                trx: &mut self.trx,
                actor: self.actor,
            }
        }

        pub fn order_items(&mut self) -> OrderItemRepository<'_> {
            OrderItemRepository { trx: &mut self.trx }
        }

        /// Commit every mutation staged through this session atomically.
        pub async fn commit(self) -> Result<(), PersistenceError> {
            self.trx.commit().await?;
            Ok(())
        }

        pub async fn rollback(self) -> Result<(), PersistenceError> {
            self.trx.rollback().await?;
            Ok(())
        }
    }

    pub struct ProductRepository<'t> {
        trx: &'t mut Transaction<'static, Postgres>,
        actor: Option<Uuid>,
    }

    impl<'t> ProductRepository<'t> {
        pub async fn add(&mut self, draft: &ProductDraft) -> Result<Product, PersistenceError> {
            let row = sqlx::query(concat!(
                "INSERT INTO shop.product ",
                "(created, created_by, name, description, price, stock, image_url, category_id, user_id) ",
                "VALUES (now(), $1, $2, $3, $4, $5, $6, $7, $8) ",
                "RETURNING id, created, updated, name, description, price, stock, image_url, category_id, user_id",
            ))
            .bind(self.actor)
            .bind(&draft.name)
            .bind(draft.description.as_deref())
            .bind(draft.price)
            .bind(draft.stock)
            .bind(draft.image_url.as_ref().map(|url| url.to_string()))
            .bind(draft.category_id)
            .bind(draft.user_id)
            .fetch_one(&mut *self.trx)
            .await?;

            Ok(Product::from(&row))
        }

        /// Tracked mutation of a live product. The owning seller is never
        /// reassigned here.
        pub async fn update(
            &mut self,
            id: i64,
            draft: &ProductDraft,
        ) -> Result<Option<Product>, PersistenceError> {
            let row = sqlx::query(concat!(
                "UPDATE shop.product SET updated = now(), updated_by = $1, ",
                "name = $2, description = $3, price = $4, stock = $5, image_url = $6, category_id = $7 ",
                "WHERE id = $8 AND NOT deleted ",
                "RETURNING id, created, updated, name, description, price, stock, image_url, category_id, user_id",
            ))
            .bind(self.actor)
            .bind(&draft.name)
            .bind(draft.description.as_deref())
            .bind(draft.price)
            .bind(draft.stock)
            .bind(draft.image_url.as_ref().map(|url| url.to_string()))
            .bind(draft.category_id)
            .bind(id)
            .fetch_optional(&mut *self.trx)
            .await?;

            Ok(row.as_ref().map(Product::from))
        }

        /// Soft delete: the row stays, every catalog read ignores it from
        /// now on. Returns whether a live row was flagged.
        pub async fn soft_delete(&mut self, id: i64) -> Result<bool, PersistenceError> {
            let done = sqlx::query(concat!(
                "UPDATE shop.product SET deleted = TRUE, updated = now(), updated_by = $1 ",
                "WHERE id = $2 AND NOT deleted",
            ))
            .bind(self.actor)
            .bind(id)
            .execute(&mut *self.trx)
            .await?;

            Ok(done.rows_affected() > 0)
        }

        pub async fn find_by_ids(&mut self, ids: &[i64]) -> Result<Vec<Product>, PersistenceError> {
            if ids.is_empty() {
                return Ok(Vec::new());
            }

            let mut qb = QueryBuilder::new(concat!(
                "SELECT id, created, updated, name, description, price, stock, image_url, category_id, user_id ",
                "FROM shop.product WHERE NOT deleted AND id IN ",
            ));
            sql::push_list(&mut qb, ids.iter().copied());

            let mut rows = qb.build().fetch(&mut *self.trx);

            let mut products = Vec::new();
            while let Some(row) = rows.try_next().await? {
                products.push(Product::from(&row));
            }

            Ok(products)
        }
    }

    pub struct CategoryRepository<'t> {
        trx: &'t mut Transaction<'static, Postgres>,
    }

    impl<'t> CategoryRepository<'t> {
        pub async fn find_by_id(&mut self, id: i64) -> Result<Option<Category>, PersistenceError> {
            let row = sqlx::query(concat!(
                "SELECT id, created, updated, name, description, is_active ",
                "FROM shop.category WHERE id = $1 AND NOT deleted",
            ))
            .bind(id)
            .fetch_optional(&mut *self.trx)
            .await?;

            Ok(row.as_ref().map(Category::from))
        }
    }

    pub struct OrderRepository<'t> {
        trx: &'t mut Transaction<'static, Postgres>,
        actor: Option<Uuid>,
    }

    impl<'t> OrderRepository<'t> {
        pub async fn add(&mut self, draft: &OrderDraft) -> Result<Order, PersistenceError> {
            let row = sqlx::query(concat!(
                "INSERT INTO shop.\"order\" ",
                "(created, created_by, order_number, user_id, order_date, status, total_amount, notes) ",
                "VALUES (now(), $1, $2, $3, now(), $4, $5, $6) ",
                "RETURNING id, created, updated, order_number, user_id, order_date, status, total_amount, notes",
            ))
            .bind(self.actor)
            .bind(&draft.order_number)
            .bind(draft.user_id)
            .bind(draft.status.as_str())
            .bind(draft.total_amount)
            .bind(draft.notes.as_deref())
            .fetch_one(&mut *self.trx)
            .await?;

            Ok(Order::from(&row))
        }
    }

    pub struct OrderItemRepository<'t> {
        trx: &'t mut Transaction<'static, Postgres>,
    }

    impl<'t> OrderItemRepository<'t> {
        pub async fn add(&mut self, draft: &OrderItemDraft) -> Result<OrderItem, PersistenceError> {
            let row = sqlx::query(concat!(
                "INSERT INTO shop.order_item ",
                "(created, order_id, product_id, quantity, unit_price, total_price) ",
                "VALUES (now(), $1, $2, $3, $4, $5) ",
                "RETURNING id, created, updated, product_id, quantity, unit_price, total_price",
            ))
            .bind(draft.order_id)
            .bind(draft.product_id)
            .bind(draft.quantity)
            .bind(draft.unit_price)
            .bind(draft.total_price)
            .fetch_one(&mut *self.trx)
            .await?;

            Ok(OrderItem::from(&row))
        }
    }
}

/// Read side of the catalog: joined projections straight on the pool,
/// bypassing the unit-of-work.
pub mod query {
    use futures::TryStreamExt;
    use sqlx::{postgres::PgRow, PgPool, QueryBuilder, Row};
    use uuid::Uuid;

    use crate::{
        domain::entity::{
            catalog::{Category, Product},
            order::{Order, OrderItem},
        },
        error::persistence::PersistenceError,
    };

    /// Product joined with the display fields of its category and seller.
    #[derive(Debug)]
    pub struct ProductDetail {
        pub product: Product,
        pub category_name: String,
        pub seller_name: String,
    }

    impl From<&PgRow> for ProductDetail {
        fn from(row: &PgRow) -> Self {
            Self {
                product: Product::from(row),
                category_name: row.get("category_name"),
                seller_name: row.get("seller_name"),
            }
        }
    }

    pub async fn product_detail(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<ProductDetail>, PersistenceError> {
        let row = sqlx::query(concat!(
            "SELECT p.id, p.created, p.updated, p.name, p.description, p.price, p.stock, ",
            "p.image_url, p.category_id, p.user_id, c.name AS category_name, ",
            "u.first_name || ' ' || u.last_name AS seller_name ",
            "FROM shop.product p ",
            "JOIN shop.category c ON c.id = p.category_id ",
            "JOIN iam.\"user\" u ON u.id = p.user_id ",
            "WHERE p.id = $1 AND NOT p.deleted",
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.as_ref().map(ProductDetail::from))
    }

    pub async fn product_page(
        pool: &PgPool,
        category: Option<i64>,
        search_term: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProductDetail>, PersistenceError> {
        let mut qb = QueryBuilder::new(concat!(
            "SELECT p.id, p.created, p.updated, p.name, p.description, p.price, p.stock, ",
            "p.image_url, p.category_id, p.user_id, c.name AS category_name, ",
            "u.first_name || ' ' || u.last_name AS seller_name ",
            "FROM shop.product p ",
            "JOIN shop.category c ON c.id = p.category_id ",
            "JOIN iam.\"user\" u ON u.id = p.user_id ",
            "WHERE NOT p.deleted",
        ));

        if let Some(category) = category {
            qb.push(" AND p.category_id = ");
            qb.push_bind(category);
        }

        if let Some(term) = search_term {
            qb.push(" AND p.name ILIKE ");
            qb.push_bind(format!("%{term}%"));
        }

        // Stable order so page windows stay deterministic between requests.
        qb.push(" ORDER BY p.id LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);

        let mut rows = qb.build().fetch(pool);

        let mut details = Vec::new();
        while let Some(row) = rows.try_next().await? {
            details.push(ProductDetail::from(&row));
        }

        Ok(details)
    }

    /// Category joined with its live product count.
    #[derive(Debug)]
    pub struct CategoryDetail {
        pub category: Category,
        pub product_count: i64,
    }

    pub async fn category_list(pool: &PgPool) -> Result<Vec<CategoryDetail>, PersistenceError> {
        let mut rows = sqlx::query(concat!(
            "SELECT c.id, c.created, c.updated, c.name, c.description, c.is_active, ",
            "count(p.id) FILTER (WHERE NOT p.deleted) AS product_count ",
            "FROM shop.category c ",
            "LEFT JOIN shop.product p ON p.category_id = c.id ",
            "WHERE NOT c.deleted ",
            "GROUP BY c.id ",
            "ORDER BY c.id",
        ))
        .fetch(pool);

        let mut details = Vec::new();
        while let Some(row) = rows.try_next().await? {
            details.push(CategoryDetail {
                category: Category::from(&row),
                product_count: row.get("product_count"),
            });
        }

        Ok(details)
    }

    /// Order with its items, scoped to the owning user.
    #[derive(Debug)]
    pub struct OrderDetail {
        pub order: Order,
        pub items: Vec<OrderItem>,
    }

    pub async fn order_detail(
        pool: &PgPool,
        user: Uuid,
        id: i64,
    ) -> Result<Option<OrderDetail>, PersistenceError> {
        let row = sqlx::query(concat!(
            "SELECT id, created, updated, order_number, user_id, order_date, status, total_amount, notes ",
            "FROM shop.\"order\" WHERE id = $1 AND user_id = $2 AND NOT deleted",
        ))
        .bind(id)
        .bind(user)
        .fetch_optional(pool)
        .await?;

        let order = match row.as_ref().map(Order::from) {
            Some(order) => order,
            None => return Ok(None),
        };

        let mut rows = sqlx::query(concat!(
            "SELECT id, created, updated, product_id, quantity, unit_price, total_price ",
            "FROM shop.order_item WHERE order_id = $1 ORDER BY id",
        ))
        .bind(id)
        .fetch(pool);

        let mut items = Vec::new();
        while let Some(row) = rows.try_next().await? {
            items.push(OrderItem::from(&row));
        }

        Ok(Some(OrderDetail { order, items }))
    }
}
