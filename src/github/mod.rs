pub mod auth;
pub mod graphql;
pub mod models;
pub mod queries;
pub mod repo;

pub use graphql::GithubClient;
pub use models::*;
pub use repo::RepoSpec;
