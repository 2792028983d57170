pub mod comments;
pub mod error;
pub mod likes;
pub mod posts;
pub mod query;
pub mod users;
