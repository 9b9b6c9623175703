pub mod pokemon;
pub mod user;

pub use pokemon::{Pokemon, ScoredPokemon, TagCategory};
pub use user::{User, UserInfo, UserLike};
