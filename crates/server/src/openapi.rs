use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

// Field names mirror the wire format expected by the browser client.
#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirmPassword: String,
}

#[derive(ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema)]
#[allow(non_snake_case)]
pub struct ProductRequest {
    pub ProductName: String,
    pub ProductPrice: f64,
    pub ProductBarcode: i64,
    pub ProductQuantity: i32,
}

#[derive(ToSchema)]
pub struct UserDoc {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::products::create,
        crate::routes::products::list,
        crate::routes::products::get_one,
        crate::routes::products::update,
        crate::routes::products::remove,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ProductRequest,
            UserDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "products")
    )
)]
pub struct ApiDoc;
