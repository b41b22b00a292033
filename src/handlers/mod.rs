pub mod auth;
pub mod category;
pub mod post;
pub mod stats;
pub mod thread;
pub mod user;
pub mod vote;

pub use auth::*;
