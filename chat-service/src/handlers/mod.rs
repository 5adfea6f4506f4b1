pub mod chat;
pub mod health;

pub use chat::{method_not_allowed, relay_chat};
pub use health::health_check;
