pub mod card;
pub mod error;
pub mod generator;
pub mod play;
pub mod render;
pub mod shuffle;
pub mod song;
pub mod store;
pub mod uniqueness;

pub use card::{Card, COLUMNS, ROWS, SONGS_PER_CARD};
pub use error::Error;
pub use generator::{GeneratedBatch, generate_cards};
pub use song::Song;
