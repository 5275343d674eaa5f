//! Core-Domänentypen: Interactables, Collider, Registry, Spatial-Index.

pub mod interactable;
pub mod registry;
pub mod spatial;

pub use interactable::{
    AttachPreference, Collider, ColliderShape, Handedness, Interactable, SelectMode,
};
pub use registry::{ColliderBinding, ColliderKind, InteractionRegistry};
pub use spatial::{ColliderIndex, SpatialMatch};

/// ID eines Actors (Interactor).
pub type ActorId = u64;
/// ID einer Interaction-Group.
pub type GroupId = u64;
/// ID eines Interactables.
pub type InteractableId = u64;
/// ID eines Colliders.
pub type ColliderId = u64;
