pub mod card;
pub mod user;

pub use card::{Card, CardStatus, CreateCardRequest, Page, SearchCardCriteria, SortBy, UpdateCardRequest};
pub use user::{Role, User};
