//! Spot repository abstraction.
//!
//! The repository is the `{fetch, submit, vote, chat, trending}` capability behind
//! the discovery engine. Two concrete implementations exist: a REST client
//! and an in-memory fixture set. Which one runs is decided once at process
//! start through [`RepositoryFactory`], never branched per call.

mod factory;
mod fixture;
mod http;
mod remote;
mod types;

pub use factory::{RepositoryConfig, RepositoryFactory, RepositoryKind};
pub use fixture::FixtureRepository;
pub use http::{AsyncHttpClient, ReqwestHttpClient};
pub use remote::RemoteRepository;
pub use types::{
    ChatReply, RepositoryError, SpotRepository, SpotSubmission, VerificationVote, Vote,
};
