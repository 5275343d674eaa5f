//! Interactor-Layer: Actors, Dual-Region-Resolver, Probes und Attach-Logik.

pub mod actor;
pub mod attach;
pub mod near_far;
pub mod probes;
pub mod targeting;

pub use actor::{Actor, TargetPriorityMode};
pub use attach::AttachController;
pub use near_far::{NearFarResolver, RayCastState, Region};
pub use probes::{LineCastProbe, SphereOverlapProbe};
pub use targeting::{
    ActorContext, Candidate, CastSource, ColliderProbe, CurveHit, CurveProbe, TargetFilter,
    TargetSortMode, UiRaycastHit, UiRaycastProvider,
};
