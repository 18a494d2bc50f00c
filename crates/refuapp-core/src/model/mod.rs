// ── Domain model ──
//
// Client-side copies of server records and the request-side
// projections the UI builds from form state.

pub mod photo;
pub mod refuge;
pub mod refuge_id;
pub mod token;

pub use photo::Photo;
pub use refuge::{Capacity, Coordinates, CreateRefuge, DEFAULT_IMAGE, Refuge, UpdateRefuge};
pub use refuge_id::{InvalidRefugeId, REFUGE_ID_LEN, RefugeId, is_valid_id};
pub use token::Token;
