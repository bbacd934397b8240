pub mod entity;

pub use entity::{NewWatchlist, Watchlist};
