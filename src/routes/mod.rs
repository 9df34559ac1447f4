pub mod auth;
pub mod cards;
pub mod health;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/open/auth")
            .service(auth::register)
            .service(auth::authenticate),
    )
    .service(
        // "/search" is registered ahead of "/{card_id}" so it is matched
        // as a literal segment, not a card id.
        web::scope("/private/cards")
            .service(cards::search_cards)
            .service(cards::create_card)
            .service(cards::get_card)
            .service(cards::update_card)
            .service(cards::delete_card),
    );
}
