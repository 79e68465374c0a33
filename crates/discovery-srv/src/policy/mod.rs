//! Discovery policy evaluation.
//!
//! - **State**: the swappable [`PolicyStore`] snapshot
//! - **Keys**: how stored ban/group keys are compared against a token
//! - **Bans**: ban list matching
//! - **Groups**: per-group endpoint resolution
//! - **Fabricator**: fixed-precedence evaluation of one request

pub mod bans;
pub mod fabricator;
pub mod groups;
pub mod keys;
pub mod state;

pub use bans::{is_banned, BanEntry};
pub use fabricator::Fabricator;
pub use groups::resolve;
pub use keys::TokenKeys;
pub use state::{BanList, EndpointTable, GroupDefinitions, PolicyState, PolicyStore};
