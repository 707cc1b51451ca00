use thiserror::Error;

/// Errors surfaced while configuring tweens. Per-frame updates never fail.
#[derive(Debug, Error)]
pub enum EaseError {
    #[error("unknown easing curve `{0}`")]
    UnknownCurve(String),

    #[error("invalid value for property `{name}`: {reason}")]
    InvalidProperty { name: String, reason: &'static str },

    #[error("invalid tween configuration: {0}")]
    Config(#[from] serde_json::Error),
}
