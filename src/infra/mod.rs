pub mod controller;
pub mod database;
pub mod service;

pub mod router {
    use std::sync::Arc;

    use salvo::{logging::Logger, Router};
    use sqlx::PgPool;

    use super::{
        controller::*,
        service::security::{Argon2HashService, JWTEncryptionService},
    };

    pub fn app(
        pool: &PgPool,
        hash_service: Arc<Argon2HashService>,
        token_service: Arc<JWTEncryptionService>,
    ) -> Router {
        Router::new()
            .push(
                Router::with_path("api")
                    .push(
                        Router::with_path("auth")
                            .push(Router::with_path("register").post(RegisterUserController::new(
                                pool.clone(),
                                hash_service.clone(),
                                token_service.clone(),
                            )))
                            .push(Router::with_path("login").post(AuthenticateUserController::new(
                                pool.clone(),
                                hash_service,
                                token_service.clone(),
                            ))),
                    )
                    .push(
                        Router::with_path("products")
                            .get(ListProductsController::new(pool.clone()))
                            .post(CreateProductController::new(
                                pool.clone(),
                                token_service.clone(),
                            ))
                            .push(
                                Router::with_path("<id:num>")
                                    .get(GetProductController::new(pool.clone()))
                                    .put(UpdateProductController::new(
                                        pool.clone(),
                                        token_service.clone(),
                                    ))
                                    .delete(DeleteProductController::new(
                                        pool.clone(),
                                        token_service.clone(),
                                    )),
                            ),
                    )
                    .push(
                        Router::with_path("categories")
                            .get(ListCategoriesController::new(pool.clone())),
                    )
                    .push(
                        Router::with_path("orders")
                            .post(PlaceOrderController::new(pool.clone(), token_service.clone()))
                            .push(
                                Router::with_path("<id:num>")
                                    .get(GetOrderController::new(pool.clone(), token_service)),
                            ),
                    ),
            )
            .hoop(Logger)
    }
}
