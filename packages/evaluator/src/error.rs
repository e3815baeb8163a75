use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Unknown device '{0}' (expected mobile, tablet or desktop)")]
    UnknownDevice(String),

    #[error("Unknown render mode '{0}' (expected preview or canvas)")]
    UnknownMode(String),
}
