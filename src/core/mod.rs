pub mod behavior;
pub mod collision;
pub mod entity;
pub mod input;
pub mod physics;
pub mod session;

pub use entity::{Aabb, Body, Entity, EntityId, Kind, Millis, World};
pub use input::{Action, InputState};
pub use session::{GameEvent, Hud, Ruleset, Session, Status};
