/// Business logic layer.
///
/// - `voting`: applies vote intents to the ledger and the post score
/// - `feed`: cursor-paginated reverse-chronological post pages
/// - `auth`: credential handling with field-level validation outcomes
/// - `email`: outbound SMTP mail
pub mod auth;
pub mod email;
pub mod feed;
pub mod voting;

pub use auth::{AuthOutcome, AuthService};
pub use email::EmailService;
pub use feed::FeedService;
pub use voting::VoteService;
