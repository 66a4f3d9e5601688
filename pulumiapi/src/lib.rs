//! Typed client for the Pulumi Cloud REST API.
//!
//! One module per resource family, all sharing the request/response/error
//! pipeline in [`client`]. Every call is a single stateless HTTP round trip.

pub mod access_tokens;
pub mod agent_pools;
pub mod client;
pub mod common;
pub mod error;
pub mod members;
pub mod oidc;
pub mod org_tokens;
pub mod policy_groups;
pub mod policy_packs;
pub mod schedules;
pub mod stack_tags;
pub mod stacks;
pub mod team_tokens;
pub mod teams;
pub mod user;
pub mod webhooks;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use client::Client;
pub use common::{PulumiDuration, SecretValue};
pub use error::ApiError;
pub use stacks::StackIdentifier;
