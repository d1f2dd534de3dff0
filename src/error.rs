pub type NeonResult<T> = Result<T, NeonError>;

#[derive(thiserror::Error, Debug)]
pub enum NeonError {
    #[error("config error: {0}")]
    Config(String),

    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("codec error: {0}")]
    Codec(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl NeonError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn unsupported_input(msg: impl Into<String>) -> Self {
        Self::UnsupportedInput(msg.into())
    }

    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_unsupported_input(&self) -> bool {
        matches!(self, Self::UnsupportedInput(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(NeonError::config("x").to_string().contains("config error:"));
        assert!(
            NeonError::unsupported_input("x")
                .to_string()
                .contains("unsupported input:")
        );
        assert!(NeonError::codec("x").to_string().contains("codec error:"));
    }

    #[test]
    fn kind_predicates_match_variants() {
        assert!(NeonError::config("x").is_config());
        assert!(!NeonError::config("x").is_unsupported_input());
        assert!(NeonError::unsupported_input("x").is_unsupported_input());
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = NeonError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
