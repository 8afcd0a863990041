pub mod task;
pub mod transaction;
pub mod user;

pub use task::Task;
pub use transaction::Transaction;
pub use user::{AuthUser, CustomUser, UserProfile};
