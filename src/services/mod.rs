pub mod auth;
pub mod category;
pub mod counters;
pub mod post;
pub mod reply_tree;
pub mod seed;
pub mod stats;
pub mod thread;
pub mod user;
pub mod vote;
