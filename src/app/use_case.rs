pub mod iam {
    use std::time::Duration;

    use sqlx::PgPool;

    use crate::{
        app::resource::iam::{AuthenticateUserResponse, RegisterUser, UserCredential},
        domain::{
            datatype::security::{Token, TokenPayload, TokenSubject, UserClaims},
            entity::{iam::User, Entity},
            service::{PasswordHashService, TokenEncryptionService},
        },
        error::{
            app::ApplicationError,
            resource::{ValidationError, ValidationErrorKind, ValidationFieldError},
            security::AuthenticationError,
        },
        infra::database::repository,
    };

    const AUTHENTICATION_TOKEN_EXPIRATION: Duration = Duration::from_secs(60 * 60 * 8);
    const PASSWORD_MIN_LENGTH: usize = 6;

    mod validation {
        use super::*;

        /// Password policy: minimum length plus one lowercase, one uppercase
        /// and one digit.
        pub fn password_policy(password: &str) -> Vec<ValidationErrorKind> {
            let mut kinds = Vec::new();

            if password.chars().count() < PASSWORD_MIN_LENGTH {
                kinds.push(ValidationErrorKind::MinLength(PASSWORD_MIN_LENGTH as u64));
            }
            if !password.chars().any(|c| c.is_ascii_lowercase()) {
                kinds.push(ValidationErrorKind::Pattern("lowercase letter".into()));
            }
            if !password.chars().any(|c| c.is_ascii_uppercase()) {
                kinds.push(ValidationErrorKind::Pattern("uppercase letter".into()));
            }
            if !password.chars().any(|c| c.is_ascii_digit()) {
                kinds.push(ValidationErrorKind::Pattern("digit".into()));
            }

            kinds
        }

        pub async fn register_user<'dto>(
            pool: &PgPool,
            dto: &RegisterUser<'dto>,
        ) -> Result<(), ApplicationError<RegisterUser<'dto>>> {
            let mut errors = Vec::new();

            if dto.email.is_empty() || !dto.email.contains('@') {
                errors.push(ValidationFieldError::new(
                    "base::email",
                    dto.email.into(),
                    "/email".into(),
                    vec![ValidationErrorKind::Pattern("email".into())],
                ));
            } else if repository::email_exists(pool, dto.email).await? {
                errors.push(ValidationFieldError::new(
                    "base::email",
                    dto.email.into(),
                    "/email".into(),
                    vec![ValidationErrorKind::AlreadyExists],
                ));
            }

            let password_kinds = password_policy(dto.password);
            if !password_kinds.is_empty() {
                errors.push(ValidationFieldError::new(
                    "base::password",
                    String::new(),
                    "/password".into(),
                    password_kinds,
                ));
            }

            if dto.first_name.trim().is_empty() {
                errors.push(ValidationFieldError::new(
                    "base::name",
                    dto.first_name.into(),
                    "/firstName".into(),
                    vec![ValidationErrorKind::Required],
                ));
            }

            if dto.last_name.trim().is_empty() {
                errors.push(ValidationFieldError::new(
                    "base::name",
                    dto.last_name.into(),
                    "/lastName".into(),
                    vec![ValidationErrorKind::Required],
                ));
            }

            if !errors.is_empty() {
                return Err(ValidationError::from_resource(dto.clone(), errors).into());
            }

            Ok(())
        }
    }

    pub async fn register_user<'dto, HS, TS>(
        pool: &PgPool,
        hash_service: &HS,
        token_service: &TS,
        dto: RegisterUser<'dto>,
    ) -> Result<AuthenticateUserResponse, ApplicationError<RegisterUser<'dto>>>
    where
        HS: PasswordHashService,
        TS: TokenEncryptionService,
    {
        tracing::info!(email = dto.email, "user registration attempt");
        validation::register_user(pool, &dto).await?;

        let password_hash = hash_service.hash_password(dto.password).map_err(|_| {
            ValidationError::from_resource(
                dto.clone(),
                vec![ValidationFieldError::new(
                    "base::password",
                    String::new(),
                    "/password".into(),
                    vec![ValidationErrorKind::Invalid],
                )],
            )
        })?;
        let user = User::new(
            dto.email.into(),
            dto.first_name.into(),
            dto.last_name.into(),
            password_hash,
        );

        repository::insert_user(pool, [&user]).await?;
        tracing::info!(email = dto.email, id = %user.ident(), "user registered");

        let token = issue_token(token_service, &user);
        Ok(AuthenticateUserResponse {
            user: user.into(),
            token: token.into(),
        })
    }

    pub async fn authenticate_user<'dto, HS, TS>(
        pool: &PgPool,
        hash_service: &HS,
        token_service: &TS,
        credential: UserCredential<'dto>,
    ) -> Result<AuthenticateUserResponse, ApplicationError<UserCredential<'dto>>>
    where
        HS: PasswordHashService,
        TS: TokenEncryptionService,
    {
        tracing::info!(email = credential.email, "user login attempt");

        let user = match repository::find_user_by_email(pool, credential.email).await? {
            Some(user) => user,
            None => {
                tracing::warn!(email = credential.email, "login failed: unknown email");
                return Err(AuthenticationError::InvalidCredential.into());
            }
        };

        if hash_service
            .verify_password(credential.password, user.password_hash())
            .is_err()
        {
            tracing::warn!(email = credential.email, "login failed: password mismatch");
            return Err(AuthenticationError::InvalidCredential.into());
        }

        if !user.is_active() {
            tracing::warn!(email = credential.email, "login failed: inactive account");
            return Err(AuthenticationError::InvalidCredential.into());
        }

        let token = issue_token(token_service, &user);
        Ok(AuthenticateUserResponse {
            user: user.into(),
            token: token.into(),
        })
    }

    fn issue_token<TS: TokenEncryptionService>(
        token_service: &TS,
        user: &User,
    ) -> Token<UserClaims> {
        let payload = TokenPayload::new(
            AUTHENTICATION_TOKEN_EXPIRATION,
            TokenSubject::User(user.ident()),
            UserClaims {
                email: user.email().clone(),
                roles: vec!["user".into()],
            },
        );
        Token::new(payload, token_service).expect("Expect to sign a user authentication token")
    }

    #[cfg(test)]
    mod tests {
        use pretty_assertions::assert_eq;

        use super::validation::password_policy;
        use crate::error::resource::ValidationErrorKind;

        #[test]
        fn short_password_is_rejected() {
            assert!(password_policy("Ab1").contains(&ValidationErrorKind::MinLength(6)));
        }

        #[test]
        fn password_without_uppercase_is_rejected() {
            assert_eq!(
                password_policy("abcdef1"),
                vec![ValidationErrorKind::Pattern("uppercase letter".into())]
            );
        }

        #[test]
        fn password_without_digit_is_rejected() {
            assert_eq!(
                password_policy("Abcdefg"),
                vec![ValidationErrorKind::Pattern("digit".into())]
            );
        }

        #[test]
        fn compliant_password_is_accepted() {
            assert_eq!(password_policy("Secret123"), vec![]);
        }
    }
}

pub mod catalog {
    use rust_decimal::Decimal;
    use sqlx::PgPool;

    use crate::{
        app::resource::catalog::{CategoryResponse, CreateProduct, ProductFilter, ProductResponse},
        domain::{
            datatype::security::Caller,
            entity::{catalog::ProductDraft, Entity},
        },
        error::{
            app::ApplicationError,
            persistence::PersistenceError,
            resource::{NotFoundError, ValidationError, ValidationErrorKind, ValidationFieldError},
        },
        infra::database::{query, unit_of_work::UnitOfWork},
    };

    const NAME_MAX_LENGTH: usize = 200;
    const DESCRIPTION_MAX_LENGTH: usize = 1000;
    const DEFAULT_PAGE_SIZE: u32 = 10;
    const MAX_PAGE_SIZE: u32 = 100;

    mod validation {
        use super::*;

        /// Collecting rule set over the create/update payload; every broken
        /// rule is reported, not just the first.
        pub fn create_product<'dto>(
            dto: &CreateProduct<'dto>,
        ) -> Result<(), ValidationError<CreateProduct<'dto>>> {
            let mut errors = Vec::new();

            if dto.name.trim().is_empty() {
                errors.push(field("/name", dto.name, ValidationErrorKind::Required));
            } else if dto.name.chars().count() > NAME_MAX_LENGTH {
                errors.push(field(
                    "/name",
                    dto.name,
                    ValidationErrorKind::MaxLength(NAME_MAX_LENGTH as u64),
                ));
            }

            if let Some(description) = dto.description {
                if description.chars().count() > DESCRIPTION_MAX_LENGTH {
                    errors.push(field(
                        "/description",
                        description,
                        ValidationErrorKind::MaxLength(DESCRIPTION_MAX_LENGTH as u64),
                    ));
                }
            }

            if dto.price <= Decimal::ZERO {
                errors.push(field(
                    "/price",
                    &dto.price.to_string(),
                    ValidationErrorKind::Positive,
                ));
            }

            if dto.stock < 0 {
                errors.push(field(
                    "/stock",
                    &dto.stock.to_string(),
                    ValidationErrorKind::Minimum(0),
                ));
            }

            if dto.category_id <= 0 {
                errors.push(field(
                    "/categoryId",
                    &dto.category_id.to_string(),
                    ValidationErrorKind::Positive,
                ));
            }

            if let Some(image_url) = dto.image_url {
                if image_url.parse::<url::Url>().is_err() {
                    errors.push(field(
                        "/imageUrl",
                        image_url,
                        ValidationErrorKind::Pattern("url".into()),
                    ));
                }
            }

            if errors.is_empty() {
                Ok(())
            } else {
                Err(ValidationError::from_resource(dto.clone(), errors))
            }
        }

        fn field(path: &str, value: &str, kind: ValidationErrorKind) -> ValidationFieldError {
            ValidationFieldError::new(
                "catalog::CreateProduct",
                value.into(),
                path.into(),
                vec![kind],
            )
        }
    }

    fn unknown_category<'dto>(
        dto: CreateProduct<'dto>,
    ) -> ApplicationError<CreateProduct<'dto>> {
        let category_id = dto.category_id;
        ValidationError::from_resource(
            dto,
            vec![ValidationFieldError::new(
                "catalog::Category",
                category_id.to_string(),
                "/categoryId".into(),
                vec![ValidationErrorKind::NotFound],
            )],
        )
        .into()
    }

    pub async fn create_product<'dto>(
        pool: &PgPool,
        caller: &Caller,
        dto: CreateProduct<'dto>,
    ) -> Result<ProductResponse, ApplicationError<CreateProduct<'dto>>> {
        tracing::info!(user = %caller.user, "creating product");
        validation::create_product(&dto)?;

        let mut uow = UnitOfWork::begin(pool, Some(caller.user)).await?;

        if uow.categories().find_by_id(dto.category_id).await?.is_none() {
            uow.rollback().await?;
            return Err(unknown_category(dto));
        }

        let draft = ProductDraft::from_payload(&dto, caller.user);
        let product = uow.products().add(&draft).await?;
        uow.commit().await?;

        // Fresh read so the category and seller projections never come from
        // the in-memory graph.
        let detail = query::product_detail(pool, product.ident())
            .await?
            .ok_or(PersistenceError::NotFound)?;

        Ok(detail.into())
    }

    pub async fn update_product<'dto>(
        pool: &PgPool,
        caller: &Caller,
        id: i64,
        dto: CreateProduct<'dto>,
    ) -> Result<ProductResponse, ApplicationError<CreateProduct<'dto>>> {
        tracing::info!(user = %caller.user, product = id, "updating product");
        validation::create_product(&dto)?;

        let mut uow = UnitOfWork::begin(pool, Some(caller.user)).await?;

        if uow.categories().find_by_id(dto.category_id).await?.is_none() {
            uow.rollback().await?;
            return Err(unknown_category(dto));
        }

        let draft = ProductDraft::from_payload(&dto, caller.user);
        let product = match uow.products().update(id, &draft).await? {
            Some(product) => product,
            None => {
                uow.rollback().await?;
                return Err(NotFoundError::new("catalog::Product", id).into());
            }
        };
        uow.commit().await?;

        if product.user_id() != caller.user {
            tracing::warn!(user = %caller.user, product = id, "updated a product owned by another seller");
        }

        let detail = query::product_detail(pool, product.ident())
            .await?
            .ok_or(PersistenceError::NotFound)?;

        Ok(detail.into())
    }

    pub async fn delete_product(
        pool: &PgPool,
        caller: &Caller,
        id: i64,
    ) -> Result<(), ApplicationError<()>> {
        tracing::info!(user = %caller.user, product = id, "deleting product");

        let mut uow = UnitOfWork::begin(pool, Some(caller.user)).await?;

        if !uow.products().soft_delete(id).await? {
            uow.rollback().await?;
            return Err(NotFoundError::new("catalog::Product", id).into());
        }
        uow.commit().await?;

        Ok(())
    }

    pub async fn get_product(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<ProductResponse>, ApplicationError<()>> {
        let detail = query::product_detail(pool, id).await?;
        Ok(detail.map(Into::into))
    }

    pub async fn list_products(
        pool: &PgPool,
        filter: ProductFilter,
    ) -> Result<Vec<ProductResponse>, ApplicationError<()>> {
        let page = filter.page.unwrap_or(1).max(1);
        let page_size = filter
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let offset = i64::from(page - 1) * i64::from(page_size);

        let details = query::product_page(
            pool,
            filter.category_id,
            filter.search_term.as_deref(),
            i64::from(page_size),
            offset,
        )
        .await?;

        Ok(details.into_iter().map(Into::into).collect())
    }

    pub async fn list_categories(
        pool: &PgPool,
    ) -> Result<Vec<CategoryResponse>, ApplicationError<()>> {
        let details = query::category_list(pool).await?;
        Ok(details.into_iter().map(Into::into).collect())
    }

    #[cfg(test)]
    mod tests {
        use pretty_assertions::assert_eq;
        use rust_decimal::Decimal;

        use super::validation;
        use crate::app::resource::catalog::CreateProduct;
        use crate::error::resource::{ValidationError, ValidationErrorKind};

        fn valid_payload() -> CreateProduct<'static> {
            CreateProduct {
                name: "Valid Product",
                description: Some("Valid description"),
                price: Decimal::new(1099, 2),
                stock: 5,
                image_url: None,
                category_id: 1,
            }
        }

        fn errors_on<'dto>(
            result: Result<(), ValidationError<CreateProduct<'dto>>>,
            path: &str,
        ) -> Vec<ValidationErrorKind> {
            result
                .err()
                .into_iter()
                .flat_map(|err| err.fields)
                .filter(|field| field.path == path)
                .flat_map(|field| field.kinds)
                .collect()
        }

        #[test]
        fn empty_name_is_required() {
            let dto = CreateProduct {
                name: "",
                ..valid_payload()
            };

            assert_eq!(
                errors_on(validation::create_product(&dto), "/name"),
                vec![ValidationErrorKind::Required]
            );
        }

        #[test]
        fn name_over_max_length_is_rejected() {
            let name = "a".repeat(201);
            let dto = CreateProduct {
                name: &name,
                ..valid_payload()
            };

            assert_eq!(
                errors_on(validation::create_product(&dto), "/name"),
                vec![ValidationErrorKind::MaxLength(200)]
            );
        }

        #[test]
        fn name_at_max_length_is_accepted() {
            let name = "a".repeat(200);
            let dto = CreateProduct {
                name: &name,
                ..valid_payload()
            };

            assert_eq!(errors_on(validation::create_product(&dto), "/name"), vec![]);
        }

        #[test]
        fn non_positive_price_is_rejected() {
            for price in [Decimal::ZERO, Decimal::new(-100, 2)] {
                let dto = CreateProduct {
                    price,
                    ..valid_payload()
                };

                assert_eq!(
                    errors_on(validation::create_product(&dto), "/price"),
                    vec![ValidationErrorKind::Positive]
                );
            }
        }

        #[test]
        fn negative_stock_is_rejected() {
            let dto = CreateProduct {
                stock: -1,
                ..valid_payload()
            };

            assert_eq!(
                errors_on(validation::create_product(&dto), "/stock"),
                vec![ValidationErrorKind::Minimum(0)]
            );
        }

        #[test]
        fn zero_stock_is_accepted() {
            let dto = CreateProduct {
                stock: 0,
                ..valid_payload()
            };

            assert_eq!(errors_on(validation::create_product(&dto), "/stock"), vec![]);
        }

        #[test]
        fn unselected_category_is_rejected() {
            let dto = CreateProduct {
                category_id: 0,
                ..valid_payload()
            };

            assert_eq!(
                errors_on(validation::create_product(&dto), "/categoryId"),
                vec![ValidationErrorKind::Positive]
            );
        }

        #[test]
        fn unparseable_image_url_is_rejected() {
            let dto = CreateProduct {
                image_url: Some("not a url"),
                ..valid_payload()
            };

            assert_eq!(
                errors_on(validation::create_product(&dto), "/imageUrl"),
                vec![ValidationErrorKind::Pattern("url".into())]
            );
        }

        #[test]
        fn valid_payload_has_no_errors() {
            assert!(validation::create_product(&valid_payload()).is_ok());
        }

        #[test]
        fn every_broken_rule_is_reported() {
            let dto = CreateProduct {
                name: "",
                price: Decimal::ZERO,
                stock: -1,
                category_id: 0,
                ..valid_payload()
            };

            let err = validation::create_product(&dto).unwrap_err();
            assert_eq!(err.fields.len(), 4);
        }
    }
}

pub mod order {
    use rust_decimal::Decimal;
    use sqlx::PgPool;
    use uuid::Uuid;

    use crate::{
        app::resource::order::{OrderResponse, PlaceOrder},
        domain::{
            datatype::security::Caller,
            entity::{
                order::{OrderDraft, OrderItemDraft, OrderStatus},
                Entity,
            },
        },
        error::{
            app::ApplicationError,
            resource::{ValidationError, ValidationErrorKind, ValidationFieldError},
        },
        infra::database::{
            query::{self, OrderDetail},
            unit_of_work::UnitOfWork,
        },
    };

    mod validation {
        use super::*;

        pub fn place_order<'dto>(
            dto: &PlaceOrder<'dto>,
        ) -> Result<(), ValidationError<PlaceOrder<'dto>>> {
            let mut errors = Vec::new();

            if dto.items.is_empty() {
                errors.push(ValidationFieldError::new(
                    "order::PlaceOrder",
                    "[]".into(),
                    "/items".into(),
                    vec![ValidationErrorKind::MinItems(1)],
                ));
            }

            for (index, line) in dto.items.iter().enumerate() {
                if line.quantity < 1 {
                    errors.push(ValidationFieldError::new(
                        "order::OrderLine",
                        line.quantity.to_string(),
                        format!("/items/{index}/quantity"),
                        vec![ValidationErrorKind::Minimum(1)],
                    ));
                }
            }

            if errors.is_empty() {
                Ok(())
            } else {
                Err(ValidationError::from_resource(dto.clone(), errors))
            }
        }
    }

    pub async fn place_order<'dto>(
        pool: &PgPool,
        caller: &Caller,
        dto: PlaceOrder<'dto>,
    ) -> Result<OrderResponse, ApplicationError<PlaceOrder<'dto>>> {
        tracing::info!(user = %caller.user, items = dto.items.len(), "placing order");
        validation::place_order(&dto)?;

        let mut uow = UnitOfWork::begin(pool, Some(caller.user)).await?;

        // Multi aggregate sequence: any failure past this point must roll
        // back whatever was already staged.
        match build_order(&mut uow, caller, &dto).await {
            Ok(detail) => {
                uow.commit().await?;
                tracing::info!(user = %caller.user, order = detail.order.ident(), "order placed");
                Ok(detail.into())
            }
            Err(err) => {
                uow.rollback().await?;
                Err(err)
            }
        }
    }

    async fn build_order<'dto>(
        uow: &mut UnitOfWork,
        caller: &Caller,
        dto: &PlaceOrder<'dto>,
    ) -> Result<OrderDetail, ApplicationError<PlaceOrder<'dto>>> {
        let ids: Vec<i64> = dto.items.iter().map(|line| line.product_id).collect();
        let products = uow.products().find_by_ids(&ids).await?;

        let mut lines = Vec::with_capacity(dto.items.len());
        let mut missing = Vec::new();
        for (index, line) in dto.items.iter().enumerate() {
            match products
                .iter()
                .find(|product| product.ident() == line.product_id)
            {
                Some(product) => {
                    // Unit price is snapshot from the product at placement.
                    let unit_price = product.price();
                    lines.push((line, unit_price, unit_price * Decimal::from(line.quantity)));
                }
                None => missing.push(ValidationFieldError::new(
                    "catalog::Product",
                    line.product_id.to_string(),
                    format!("/items/{index}/productId"),
                    vec![ValidationErrorKind::NotFound],
                )),
            }
        }

        if !missing.is_empty() {
            return Err(ValidationError::from_resource(dto.clone(), missing).into());
        }

        let total_amount = lines.iter().map(|(_, _, total)| *total).sum();
        let order = uow
            .orders()
            .add(&OrderDraft {
                order_number: order_number(),
                user_id: caller.user,
                status: OrderStatus::Pending,
                total_amount,
                notes: dto.notes.map(Into::into),
            })
            .await?;

        let mut items = Vec::with_capacity(lines.len());
        for (line, unit_price, total_price) in lines {
            let item = uow
                .order_items()
                .add(&OrderItemDraft {
                    order_id: order.ident(),
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price,
                    total_price,
                })
                .await?;
            items.push(item);
        }

        Ok(OrderDetail { order, items })
    }

    pub async fn get_order(
        pool: &PgPool,
        caller: &Caller,
        id: i64,
    ) -> Result<Option<OrderResponse>, ApplicationError<()>> {
        let detail = query::order_detail(pool, caller.user, id).await?;
        Ok(detail.map(Into::into))
    }

    fn order_number() -> String {
        format!("ORD-{}", Uuid::new_v4().simple())
    }

}
