//! Spatial Interaction Arbiter.
//! Arbitrierungs- und Targeting-Engine für räumliche Zeigegeräte: logische
//! Input-Interpretation, Dual-Region-Zielauflösung (Near/Far) und
//! Prioritäts-Arbitrierung zwischen konkurrierenden Actors.

pub mod core;
pub mod events;
pub mod group;
pub mod input;
pub mod interactor;
pub mod manager;
pub mod shared;

pub use crate::core::{
    ActorId, AttachPreference, Collider, ColliderId, ColliderKind, ColliderShape, GroupId,
    Handedness, Interactable, InteractableId, InteractionRegistry, SelectMode,
};
pub use events::{EventLog, InteractionEvent};
pub use group::{GroupError, GroupMember, InteractionGroup};
pub use input::{
    ConstantInput, InputReader, InputSample, LogicalInputState, ScriptedInput, TriggerMode,
};
pub use interactor::{
    Actor, AttachController, Candidate, CastSource, ColliderProbe, CurveHit, CurveProbe,
    LineCastProbe, NearFarResolver, Region, SphereOverlapProbe, TargetFilter, TargetPriorityMode,
    TargetSortMode, UiRaycastHit, UiRaycastProvider,
};
pub use manager::InteractionManager;
pub use shared::{FarAttachMode, InteractionOptions};
