//! Group-Layer: Prioritäts-Arbitrierung zwischen konkurrierenden Actors.

pub mod arbiter;
pub mod member;

pub use arbiter::{GroupError, InteractionGroup};
pub use member::GroupMember;
