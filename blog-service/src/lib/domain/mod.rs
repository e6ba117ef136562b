pub mod blog;
pub mod tag;
pub mod user;
