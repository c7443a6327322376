//! # Framework Errors
//!
//! Errors produced by the actor plumbing itself. Domain failures raised inside
//! entity hooks travel inside [`FrameworkError::EntityError`].

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    AlreadyExists(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the entity's own error type from an [`FrameworkError::EntityError`].
    ///
    /// Returns `Err(self)` unchanged when this is a plumbing error or the boxed
    /// error is of a different type.
    pub fn downcast_entity<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => match inner.downcast::<E>() {
                Ok(e) => Ok(*e),
                Err(other) => Err(FrameworkError::EntityError(other)),
            },
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error, PartialEq)]
    #[error("out of beans")]
    struct BeanError;

    #[test]
    fn downcast_recovers_entity_error() {
        let err = FrameworkError::EntityError(Box::new(BeanError));
        assert_eq!(err.downcast_entity::<BeanError>().unwrap(), BeanError);
    }

    #[test]
    fn downcast_leaves_plumbing_errors_alone() {
        let err = FrameworkError::NotFound("P001".into());
        assert!(matches!(
            err.downcast_entity::<BeanError>(),
            Err(FrameworkError::NotFound(id)) if id == "P001"
        ));
    }

    #[test]
    fn downcast_of_foreign_error_keeps_it_boxed() {
        let err = FrameworkError::EntityError(Box::new(std::io::Error::other("disk")));
        match err.downcast_entity::<BeanError>() {
            Err(FrameworkError::EntityError(inner)) => assert_eq!(inner.to_string(), "disk"),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
