pub mod category;
pub mod post;
pub mod thread;
pub mod user;
pub mod vote;

pub use category::{Entity as Category, Model as CategoryModel};
pub use post::{Entity as Post, Model as PostModel};
pub use thread::{Entity as Thread, Model as ThreadModel};
pub use user::{Entity as User, Model as UserModel};
pub use vote::{Entity as Vote, Model as VoteModel};
