/// Database access layer.
///
/// Repositories are free async functions over the connection pool (or an
/// open transaction for the multi-statement vote path), one module per
/// entity, with parameterized SQL throughout.
pub mod post_repo;
pub mod user_repo;
pub mod vote_repo;
