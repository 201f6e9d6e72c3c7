use gw_core::EntityId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorldError {
    #[error("object {0} is not in the world")]
    UnknownObject(EntityId),

    #[error("mount on {entity} rejected: {reason}")]
    InvalidMount { entity: EntityId, reason: String },
}

pub type WorldResult<T> = Result<T, WorldError>;
