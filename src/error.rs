use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnimationError {
    #[error("clip duration must be finite and positive, got {0}")]
    InvalidDuration(f32),

    #[error("ticks per second must be finite and non-negative, got {0}")]
    InvalidTicksPerSecond(f32),

    #[error("skeleton hierarchy has no root node")]
    EmptyHierarchy,

    #[error("joint '{joint}' has no {channel} keyframes")]
    EmptyChannel { joint: String, channel: &'static str },

    #[error("joint '{joint}' has decreasing {channel} timestamps")]
    UnsortedKeyframes { joint: String, channel: &'static str },

    #[error("joint '{0}' is animated more than once in the same clip")]
    DuplicateJoint(String),

    #[error("joint '{0}' has no joint table entry")]
    MissingJointEntry(String),

    #[error("clip index {index} out of range ({count} clips)")]
    ClipIndexOutOfRange { index: usize, count: usize },

    #[error("glTF error: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnimationError>;
