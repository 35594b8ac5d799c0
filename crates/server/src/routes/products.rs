use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use service::auth::domain::Identity;
use service::errors::ServiceError;
use service::product::repository::{ProductFields, SeaOrmProductRepository};
use service::product::ProductService;

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

/// Wire shape shared by insert and update; field names follow the client.
#[derive(Debug, Deserialize)]
pub struct ProductInput {
    #[serde(rename = "ProductName")]
    pub name: String,
    #[serde(rename = "ProductPrice")]
    pub price: f64,
    #[serde(rename = "ProductBarcode")]
    pub barcode: i64,
    #[serde(rename = "ProductQuantity", default)]
    pub quantity: i32,
}

impl From<ProductInput> for ProductFields {
    fn from(input: ProductInput) -> Self {
        Self {
            name: input.name,
            price: input.price,
            barcode: input.barcode,
            quantity: input.quantity,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductOutput {
    pub id: Uuid,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    #[serde(rename = "ProductName")]
    pub name: String,
    #[serde(rename = "ProductPrice")]
    pub price: f64,
    #[serde(rename = "ProductBarcode")]
    pub barcode: i64,
    #[serde(rename = "ProductQuantity")]
    pub quantity: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<FixedOffset>,
}

impl From<models::product::Model> for ProductOutput {
    fn from(m: models::product::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            name: m.name,
            price: m.price,
            barcode: m.barcode,
            quantity: m.quantity,
            created_at: m.created_at,
        }
    }
}

fn product_service(state: &ServerState) -> ProductService<SeaOrmProductRepository> {
    ProductService::new(Arc::new(SeaOrmProductRepository { db: state.db.clone() }))
}

#[utoipa::path(post, path = "/insertproduct", tag = "products", request_body = crate::openapi::ProductRequest, responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"), (status = 422, description = "Duplicate Barcode"), (status = 500, description = "Create Failed")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ProductOutput>), JsonApiError> {
    match product_service(&state).create(identity.user_id, input.into()).await {
        Ok(m) => Ok((StatusCode::CREATED, Json(m.into()))),
        Err(e @ (ServiceError::Validation(_) | ServiceError::Model(_))) => Err(JsonApiError::new(
            StatusCode::BAD_REQUEST,
            "Validation Error",
            Some(e.to_string()),
        )),
        Err(ServiceError::Conflict(_)) => Err(JsonApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Product is already added.",
            None,
        )),
        Err(e) => {
            error!(err = %e, "create product failed");
            Err(JsonApiError::internal("Create Failed", Some(e.to_string())))
        }
    }
}

// The reference client expects 201 for reads as well; kept for wire
// compatibility.
#[utoipa::path(get, path = "/products", tag = "products", responses((status = 201, description = "List OK"), (status = 500, description = "List Failed")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
) -> Result<(StatusCode, Json<Vec<ProductOutput>>), JsonApiError> {
    match product_service(&state).list(identity.user_id).await {
        Ok(items) => Ok((
            StatusCode::CREATED,
            Json(items.into_iter().map(Into::into).collect()),
        )),
        Err(e) => {
            error!(err = %e, "list products failed");
            Err(JsonApiError::internal("List Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(get, path = "/products/{id}", tag = "products", params(("id" = Uuid, Path, description = "Product ID")), responses((status = 201, description = "OK"), (status = 404, description = "Not Found")))]
pub async fn get_one(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ProductOutput>), JsonApiError> {
    match product_service(&state).get(identity.user_id, id).await {
        Ok(Some(m)) => Ok((StatusCode::CREATED, Json(m.into()))),
        Ok(None) => Err(JsonApiError::new(StatusCode::NOT_FOUND, "Product not found", None)),
        Err(e) => {
            error!(err = %e, "get product failed");
            Err(JsonApiError::internal("Fetch Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(put, path = "/updateproduct/{id}", tag = "products", params(("id" = Uuid, Path, description = "Product ID")), request_body = crate::openapi::ProductRequest, responses((status = 201, description = "Updated"), (status = 400, description = "Validation Error"), (status = 403, description = "Forbidden"), (status = 422, description = "Duplicate Barcode"), (status = 500, description = "Update Failed")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<ProductOutput>), JsonApiError> {
    match product_service(&state).update(identity.user_id, id, input.into()).await {
        Ok(m) => Ok((StatusCode::CREATED, Json(m.into()))),
        Err(ServiceError::Forbidden(_)) => Err(JsonApiError::new(
            StatusCode::FORBIDDEN,
            "You are not authorized to update this product",
            None,
        )),
        Err(ServiceError::Conflict(_)) => Err(JsonApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Product with this barcode already exists.",
            None,
        )),
        Err(e @ (ServiceError::Validation(_) | ServiceError::Model(_))) => Err(JsonApiError::new(
            StatusCode::BAD_REQUEST,
            "Validation Error",
            Some(e.to_string()),
        )),
        Err(e) => {
            error!(err = %e, "update product failed");
            Err(JsonApiError::internal("Update Failed", Some(e.to_string())))
        }
    }
}

#[utoipa::path(delete, path = "/deleteproduct/{id}", tag = "products", params(("id" = Uuid, Path, description = "Product ID")), responses((status = 201, description = "Deleted"), (status = 403, description = "Forbidden"), (status = 500, description = "Delete Failed")))]
pub async fn remove(
    State(state): State<ServerState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<ProductOutput>), JsonApiError> {
    match product_service(&state).delete(identity.user_id, id).await {
        Ok(m) => Ok((StatusCode::CREATED, Json(m.into()))),
        Err(ServiceError::Forbidden(_)) => Err(JsonApiError::new(
            StatusCode::FORBIDDEN,
            "You are not authorized to delete this product",
            None,
        )),
        Err(e) => {
            error!(err = %e, "delete product failed");
            Err(JsonApiError::internal("Delete Failed", Some(e.to_string())))
        }
    }
}
