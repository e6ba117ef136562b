pub mod blog;
pub mod memory;
pub mod user;

pub use blog::PostgresBlogRepository;
pub use memory::InMemoryBlogRepository;
pub use memory::InMemoryUserRepository;
pub use user::PostgresUserRepository;
