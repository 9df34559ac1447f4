use crate::{
    auth::AuthenticatedIdentity,
    error::AppError,
    models::{CreateCardRequest, SearchCardCriteria, UpdateCardRequest},
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// Creates a new card owned by the authenticated caller.
///
/// The request may only set name, description and color; status is forced to
/// TODO and the creation date is server-assigned.
///
/// ## Responses:
/// - `201 Created`: the new `Card` as JSON.
/// - `400 Bad Request`: blank name or malformed color.
/// - `401 Unauthorized`: missing or invalid bearer token.
#[post("")]
pub async fn create_card(
    pool: web::Data<PgPool>,
    identity: AuthenticatedIdentity,
    card_data: web::Json<CreateCardRequest>,
) -> Result<impl Responder, AppError> {
    card_data.validate()?;

    let card = crate::cards::create_card(&pool, &identity, card_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(card))
}

/// Retrieves a single card by id.
///
/// ## Responses:
/// - `200 OK`: the `Card` as JSON.
/// - `404 Not Found`: no card with this id.
/// - `403 Forbidden`: the card exists but belongs to another user and the
///   caller is not an admin.
#[get("/{card_id}")]
pub async fn get_card(
    pool: web::Data<PgPool>,
    identity: AuthenticatedIdentity,
    card_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let card = crate::cards::read_card(&pool, &identity, card_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(card))
}

/// Updates a card. The card id travels in the body (`cardId`); name,
/// description, color and status overwrite the stored values once the
/// ownership check passes.
///
/// ## Responses:
/// - `200 OK`: the updated `Card` as JSON.
/// - `400 Bad Request`: validation failure.
/// - `404 Not Found` / `403 Forbidden`: as for retrieval.
#[put("")]
pub async fn update_card(
    pool: web::Data<PgPool>,
    identity: AuthenticatedIdentity,
    card_data: web::Json<UpdateCardRequest>,
) -> Result<impl Responder, AppError> {
    card_data.validate()?;

    let card = crate::cards::update_card(&pool, &identity, card_data.into_inner()).await?;

    Ok(HttpResponse::Ok().json(card))
}

/// Deletes a card.
///
/// ## Responses:
/// - `204 No Content`: deleted.
/// - `404 Not Found` / `403 Forbidden`: as for retrieval.
#[delete("/{card_id}")]
pub async fn delete_card(
    pool: web::Data<PgPool>,
    identity: AuthenticatedIdentity,
    card_id: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    crate::cards::delete_card(&pool, &identity, card_id.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Searches cards with optional filters, multi-field sorting and pagination.
///
/// Non-admin callers are transparently scoped to their own cards. Sort
/// fields outside the whitelist and unparseable directions are rejected.
///
/// ## Request body:
/// `{name?, color?, status?, creationDate?, page, size, sortMap: [{fieldName, direction}]}`
///
/// ## Responses:
/// - `200 OK`: a `Page<Card>` as JSON.
/// - `400 Bad Request`: invalid criteria or pagination bounds.
#[get("/search")]
pub async fn search_cards(
    pool: web::Data<PgPool>,
    identity: AuthenticatedIdentity,
    criteria: web::Json<SearchCardCriteria>,
) -> Result<impl Responder, AppError> {
    criteria.validate()?;

    let page = crate::cards::search_cards(&pool, &identity, criteria.into_inner()).await?;

    Ok(HttpResponse::Ok().json(page))
}
