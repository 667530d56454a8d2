use std::sync::Arc;

use async_trait::async_trait;
use salvo::{http::StatusCode, prelude::StatusError, writer::Json, Depot, FlowCtrl, Handler, Request, Response};
use sqlx::PgPool;

use crate::app::{
    resource::{
        catalog::{CreateProduct, ProductFilter},
        iam::{RegisterUser, UserCredential},
        order::PlaceOrder,
    },
    use_case,
};
use crate::domain::datatype::security::{Caller, Token, UserClaims};
use crate::error::{app::ApplicationError, http::BadRequest, security::UnauthorizedError};
use crate::infra::service::security::{Argon2HashService, JWTEncryptionService};

macro_rules! map_res_err {
    ($result:ident, $response:ident) => {
        match $result {
            Err(err) => {
                $response.render(err);
                return;
            }
            Ok(ok) => ok,
        }
    };
}

/// Extract a authorization token from a request.
///
/// Token must be formated in the Bearer authentication scheme
/// described in [RFC 7617](https://datatracker.ietf.org/doc/html/rfc7617)
fn extract_token<'req>(req: &'req Request) -> Result<&'req str, UnauthorizedError> {
    let scheme: Option<&str> = req.header("authorization");
    scheme
        .ok_or(UnauthorizedError::TokenNotPresent)?
        .strip_prefix("Bearer ")
        .ok_or(UnauthorizedError::MalformattedToken)
}

/// Resolve the acting user from the request's bearer token.
fn authenticate(
    req: &Request,
    token_service: &JWTEncryptionService,
) -> Result<Caller, UnauthorizedError> {
    let token = extract_token(req)?;
    let verified = Token::<UserClaims>::verify(token.into(), token_service)?;
    Ok(verified.payload().caller())
}

/// Extract a numeric id from a request id param
///
/// # Panic
///
/// Panics if a id param is not present or the content is not numeric
fn extract_id(req: &Request) -> i64 {
    req.params()
        .get("id")
        .expect("Expect to route only with a numeric id")
        .parse()
        .expect("Expect id param as a numeric id")
}

pub struct RegisterUserController {
    pool: PgPool,
    hash_service: Arc<Argon2HashService>,
    token_service: Arc<JWTEncryptionService>,
}

impl RegisterUserController {
    pub fn new(
        pool: PgPool,
        hash_service: Arc<Argon2HashService>,
        token_service: Arc<JWTEncryptionService>,
    ) -> Self {
        Self {
            pool,
            hash_service,
            token_service,
        }
    }
}

#[async_trait]
impl Handler for RegisterUserController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result: Result<RegisterUser, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::iam::register_user(
            &self.pool,
            self.hash_service.as_ref(),
            self.token_service.as_ref(),
            dto,
        )
        .await;
        let auth_response = map_res_err!(result, res);

        res.render(Json(auth_response));
        res.set_status_code(StatusCode::OK);
    }
}

pub struct AuthenticateUserController {
    pool: PgPool,
    hash_service: Arc<Argon2HashService>,
    token_service: Arc<JWTEncryptionService>,
}

impl AuthenticateUserController {
    pub fn new(
        pool: PgPool,
        hash_service: Arc<Argon2HashService>,
        token_service: Arc<JWTEncryptionService>,
    ) -> Self {
        Self {
            pool,
            hash_service,
            token_service,
        }
    }
}

#[async_trait]
impl Handler for AuthenticateUserController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result: Result<UserCredential, _> = req.parse_body().await.map_err(BadRequest::from);
        let credential = map_res_err!(result, res);

        let result = use_case::iam::authenticate_user(
            &self.pool,
            self.hash_service.as_ref(),
            self.token_service.as_ref(),
            credential,
        )
        .await;
        let auth_response = map_res_err!(result, res);

        res.render(Json(auth_response));
        res.set_status_code(StatusCode::OK);
    }
}

pub struct ListProductsController {
    pool: PgPool,
}

impl ListProductsController {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Handler for ListProductsController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let filter = ProductFilter {
            category_id: req.query("categoryId"),
            search_term: req.query("searchTerm"),
            page: req.query("page"),
            page_size: req.query("pageSize"),
        };

        let result = use_case::catalog::list_products(&self.pool, filter).await;
        let products = map_res_err!(result, res);

        res.render(Json(products));
    }
}

pub struct GetProductController {
    pool: PgPool,
}

impl GetProductController {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Handler for GetProductController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let id = extract_id(req);

        let result = use_case::catalog::get_product(&self.pool, id).await;
        let product = map_res_err!(result, res);

        match product {
            Some(product) => res.render(Json(product)),
            None => res.set_status_error(StatusError::not_found()),
        }
    }
}

pub struct CreateProductController {
    pool: PgPool,
    token_service: Arc<JWTEncryptionService>,
}

impl CreateProductController {
    pub fn new(pool: PgPool, token_service: Arc<JWTEncryptionService>) -> Self {
        Self {
            pool,
            token_service,
        }
    }
}

#[async_trait]
impl Handler for CreateProductController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result =
            authenticate(req, self.token_service.as_ref()).map_err(ApplicationError::<()>::from);
        let caller = map_res_err!(result, res);

        let result: Result<CreateProduct, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::catalog::create_product(&self.pool, &caller, dto).await;
        let product = map_res_err!(result, res);

        let location = format!("/api/products/{}", product.id);
        res.headers_mut().insert(
            salvo::http::header::LOCATION,
            location
                .parse()
                .expect("Expect a valid location header value"),
        );
        res.render(Json(product));
        res.set_status_code(StatusCode::CREATED);
    }
}

pub struct UpdateProductController {
    pool: PgPool,
    token_service: Arc<JWTEncryptionService>,
}

impl UpdateProductController {
    pub fn new(pool: PgPool, token_service: Arc<JWTEncryptionService>) -> Self {
        Self {
            pool,
            token_service,
        }
    }
}

#[async_trait]
impl Handler for UpdateProductController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result =
            authenticate(req, self.token_service.as_ref()).map_err(ApplicationError::<()>::from);
        let caller = map_res_err!(result, res);

        let id = extract_id(req);
        let result: Result<CreateProduct, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::catalog::update_product(&self.pool, &caller, id, dto).await;
        let product = map_res_err!(result, res);

        res.render(Json(product));
        res.set_status_code(StatusCode::OK);
    }
}

pub struct DeleteProductController {
    pool: PgPool,
    token_service: Arc<JWTEncryptionService>,
}

impl DeleteProductController {
    pub fn new(pool: PgPool, token_service: Arc<JWTEncryptionService>) -> Self {
        Self {
            pool,
            token_service,
        }
    }
}

#[async_trait]
impl Handler for DeleteProductController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result =
            authenticate(req, self.token_service.as_ref()).map_err(ApplicationError::<()>::from);
        let caller = map_res_err!(result, res);

        let id = extract_id(req);
        let result = use_case::catalog::delete_product(&self.pool, &caller, id).await;
        map_res_err!(result, res);

        res.set_status_code(StatusCode::NO_CONTENT);
    }
}

pub struct ListCategoriesController {
    pool: PgPool,
}

impl ListCategoriesController {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Handler for ListCategoriesController {
    async fn handle(&self, _: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result = use_case::catalog::list_categories(&self.pool).await;
        let categories = map_res_err!(result, res);

        res.render(Json(categories));
    }
}

pub struct PlaceOrderController {
    pool: PgPool,
    token_service: Arc<JWTEncryptionService>,
}

impl PlaceOrderController {
    pub fn new(pool: PgPool, token_service: Arc<JWTEncryptionService>) -> Self {
        Self {
            pool,
            token_service,
        }
    }
}

#[async_trait]
impl Handler for PlaceOrderController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result =
            authenticate(req, self.token_service.as_ref()).map_err(ApplicationError::<()>::from);
        let caller = map_res_err!(result, res);

        let result: Result<PlaceOrder, _> = req.parse_body().await.map_err(BadRequest::from);
        let dto = map_res_err!(result, res);

        let result = use_case::order::place_order(&self.pool, &caller, dto).await;
        let order = map_res_err!(result, res);

        res.render(Json(order));
        res.set_status_code(StatusCode::CREATED);
    }
}

pub struct GetOrderController {
    pool: PgPool,
    token_service: Arc<JWTEncryptionService>,
}

impl GetOrderController {
    pub fn new(pool: PgPool, token_service: Arc<JWTEncryptionService>) -> Self {
        Self {
            pool,
            token_service,
        }
    }
}

#[async_trait]
impl Handler for GetOrderController {
    async fn handle(&self, req: &mut Request, _: &mut Depot, res: &mut Response, _: &mut FlowCtrl) {
        let result =
            authenticate(req, self.token_service.as_ref()).map_err(ApplicationError::<()>::from);
        let caller = map_res_err!(result, res);

        let id = extract_id(req);
        let result = use_case::order::get_order(&self.pool, &caller, id).await;
        let order = map_res_err!(result, res);

        match order {
            Some(order) => res.render(Json(order)),
            None => res.set_status_error(StatusError::not_found()),
        }
    }
}
