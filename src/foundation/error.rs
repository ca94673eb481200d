pub type KnobResult<T> = Result<T, KnobError>;

#[derive(thiserror::Error, Debug)]
pub enum KnobError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KnobError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            KnobError::validation("x")
                .to_string()
                .contains("validation error:")
        );
        assert!(KnobError::decode("x").to_string().contains("decode error:"));
        assert!(KnobError::render("x").to_string().contains("render error:"));
        assert!(
            KnobError::serde("x")
                .to_string()
                .contains("serialization error:")
        );
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = KnobError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
