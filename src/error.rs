pub type RigResult<T> = Result<T, RigError>;

#[derive(thiserror::Error, Debug)]
pub enum RigError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RigError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefix_is_stable() {
        assert!(
            RigError::validation("x")
                .to_string()
                .contains("validation error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = RigError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
