/// Product catalog routes
///
/// Reads are public so the storefront can browse without a session; every
/// write takes the `AdminUser` extractor. Stock updates get their own
/// endpoint with strict validation, since the storefront checkout calls it
/// with client-supplied numbers.

use crate::{
    app::AppState,
    envelope::{Envelope, FieldError},
    error::{validation_errors, ApiError, ApiResult},
    extract::Json,
    middleware::auth::AdminUser,
    routes::double_option,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
};
use mercado_shared::models::product::{CreateProduct, Product, UpdateProduct};
use mercado_shared::models::product_image::{CreateProductImage, ProductImage};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default page size for product listings
const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound on page size, to keep a single request from dumping the table
const MAX_PAGE_SIZE: i64 = 100;

/// Largest price DECIMAL(10,2) can hold
fn max_price() -> Decimal {
    Decimal::new(9_999_999_999, 2)
}

/// Pagination query parameters (`?limite=20&pagina=1`)
///
/// Unknown query parameters are ignored; out-of-range values are clamped
/// rather than rejected.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Page size
    pub limite: Option<i64>,

    /// 1-based page number
    pub pagina: Option<i64>,
}

impl ListQuery {
    fn page_size(&self) -> i64 {
        self.limite.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    fn page(&self) -> i64 {
        self.pagina.unwrap_or(1).max(1)
    }

    /// Row offset for the requested page
    ///
    /// Saturates instead of overflowing: an absurd `pagina` yields a huge
    /// offset and an empty page, never a panic or a negative offset.
    fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.page_size())
    }
}

/// Paginated product listing
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// Products on this page, newest first
    pub produtos: Vec<Product>,

    /// Total number of products in the catalog
    pub total: i64,

    /// Page that was returned (1-based)
    pub pagina: i64,

    /// Page size that was applied
    pub limite: i64,
}

/// Product creation request body
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    /// Product name
    #[validate(length(min = 1, max = 255, message = "Nome é obrigatório"))]
    pub name: String,

    /// Optional long description
    pub description: Option<String>,

    /// Unit price, non-negative
    pub price: Decimal,

    /// Initial stock quantity (defaults to 0)
    #[serde(default)]
    pub stock: i32,

    /// Optional category label
    #[validate(length(max = 100, message = "Categoria muito longa"))]
    pub category: Option<String>,
}

/// Partial product update request body
///
/// Absent fields keep their stored value; an explicit `null` on a nullable
/// field clears it.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProductRequest {
    /// New name
    #[validate(length(min = 1, max = 255, message = "Nome não pode ser vazio"))]
    pub name: Option<String>,

    /// New description (`null` clears)
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    /// New price
    pub price: Option<Decimal>,

    /// New stock quantity
    pub stock: Option<i32>,

    /// New category (`null` clears)
    #[serde(default, deserialize_with = "double_option")]
    pub category: Option<Option<String>>,
}

/// Stock update request body (`PUT /api/produtos/:id/estoque`)
#[derive(Debug, Deserialize)]
pub struct StockUpdateRequest {
    /// Absolute stock quantity to set
    pub quantidade: i64,
}

/// Image association request body
#[derive(Debug, Deserialize, Validate)]
pub struct AddImageRequest {
    /// Image URL
    #[validate(url(message = "URL inválida"), length(max = 512, message = "URL muito longa"))]
    pub url: String,

    /// Sort position within the gallery (defaults to 0)
    #[serde(default)]
    pub position: i32,
}

/// `GET /api/produtos`
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Envelope<ListResponse>>> {
    let limite = query.page_size();
    let pagina = query.page();
    let offset = query.offset();

    let produtos = Product::list(&state.db, limite, offset).await?;
    let total = Product::count(&state.db).await?;

    Ok(Json(Envelope::ok(ListResponse {
        produtos,
        total,
        pagina,
        limite,
    })))
}

/// `GET /api/produtos/:id`
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Envelope<Product>>> {
    let product = Product::find_by_id(&state.db, id)
        .await?
        .ok_or_else(product_not_found)?;

    Ok(Json(Envelope::ok(product)))
}

/// `POST /api/produtos` (admin)
pub async fn create_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<Product>>)> {
    req.validate().map_err(validation_errors)?;
    validate_price(req.price)?;
    validate_stock(req.stock as i64)?;

    let product = Product::create(
        &state.db,
        CreateProduct {
            name: req.name,
            description: req.description,
            price: req.price,
            stock: req.stock,
            category: req.category,
        },
    )
    .await?;

    tracing::info!(product_id = product.id, admin_id = admin.id, "Product created");

    Ok((StatusCode::CREATED, Json(Envelope::ok(product))))
}

/// `PUT /api/produtos/:id` (admin)
///
/// Partial update: only the provided fields change. An empty body is
/// accepted and answers with the unchanged row.
pub async fn update_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProductRequest>,
) -> ApiResult<Json<Envelope<Product>>> {
    req.validate().map_err(validation_errors)?;

    if let Some(price) = req.price {
        validate_price(price)?;
    }
    if let Some(stock) = req.stock {
        validate_stock(stock as i64)?;
    }

    let product = Product::update(
        &state.db,
        id,
        UpdateProduct {
            name: req.name,
            description: req.description,
            price: req.price,
            stock: req.stock,
            category: req.category,
        },
    )
    .await?
    .ok_or_else(product_not_found)?;

    tracing::info!(product_id = id, admin_id = admin.id, "Product updated");

    Ok(Json(Envelope::ok(product)))
}

/// `PUT /api/produtos/:id/estoque` (admin)
///
/// Sets the absolute stock quantity. The value is validated before any
/// database work: negative numbers and values beyond the column range are
/// rejected as validation failures, never truncated.
pub async fn update_stock(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<StockUpdateRequest>,
) -> ApiResult<Json<Envelope<Product>>> {
    validate_stock(req.quantidade)?;

    let product = Product::set_stock(&state.db, id, req.quantidade as i32)
        .await?
        .ok_or_else(product_not_found)?;

    tracing::info!(
        product_id = id,
        stock = product.stock,
        admin_id = admin.id,
        "Stock updated"
    );

    Ok(Json(Envelope::ok(product)))
}

/// `DELETE /api/produtos/:id` (admin)
pub async fn delete_product(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Envelope<()>>> {
    let deleted = Product::delete(&state.db, id).await?;
    if !deleted {
        return Err(product_not_found());
    }

    tracing::info!(product_id = id, admin_id = admin.id, "Product deleted");

    Ok(Json(Envelope::message("Produto removido")))
}

/// `GET /api/produtos/:id/imagens`
pub async fn list_images(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Envelope<Vec<ProductImage>>>> {
    Product::find_by_id(&state.db, id)
        .await?
        .ok_or_else(product_not_found)?;

    let images = ProductImage::list_by_product(&state.db, id).await?;

    Ok(Json(Envelope::ok(images)))
}

/// `POST /api/produtos/:id/imagens` (admin)
pub async fn add_image(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<i64>,
    Json(req): Json<AddImageRequest>,
) -> ApiResult<(StatusCode, Json<Envelope<ProductImage>>)> {
    req.validate().map_err(validation_errors)?;

    if req.position < 0 {
        return Err(ApiError::ValidationError(vec![FieldError {
            campo: "position".to_string(),
            mensagem: "deve ser um inteiro não negativo".to_string(),
        }]));
    }

    Product::find_by_id(&state.db, id)
        .await?
        .ok_or_else(product_not_found)?;

    let image = ProductImage::create(
        &state.db,
        CreateProductImage {
            produto_id: id,
            url: req.url,
            position: req.position,
        },
    )
    .await?;

    tracing::info!(product_id = id, image_id = image.id, admin_id = admin.id, "Image added");

    Ok((StatusCode::CREATED, Json(Envelope::ok(image))))
}

/// `DELETE /api/produtos/:id/imagens/:image_id` (admin)
pub async fn remove_image(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path((id, image_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Envelope<()>>> {
    let removed = ProductImage::delete(&state.db, id, image_id).await?;
    if !removed {
        return Err(ApiError::NotFound("Imagem não encontrada".to_string()));
    }

    tracing::info!(product_id = id, image_id, admin_id = admin.id, "Image removed");

    Ok(Json(Envelope::message("Imagem removida")))
}

fn product_not_found() -> ApiError {
    ApiError::NotFound("Produto não encontrado".to_string())
}

/// Rejects negative prices and values DECIMAL(10,2) cannot hold
fn validate_price(price: Decimal) -> Result<(), ApiError> {
    if price.is_sign_negative() || price > max_price() {
        return Err(ApiError::ValidationError(vec![FieldError {
            campo: "price".to_string(),
            mensagem: "deve ser um valor entre 0 e 99999999.99".to_string(),
        }]));
    }

    Ok(())
}

/// Rejects stock quantities outside the INT column range
///
/// Takes i64 so the stock endpoint can validate the raw client value
/// before it is narrowed to i32.
fn validate_stock(quantity: i64) -> Result<(), ApiError> {
    if !(0..=i32::MAX as i64).contains(&quantity) {
        return Err(ApiError::ValidationError(vec![FieldError {
            campo: "quantidade".to_string(),
            mensagem: "deve ser um inteiro não negativo".to_string(),
        }]));
    }

    Ok(())
}
