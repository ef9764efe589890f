//! Skeletal animation evaluation: keyframed joints, hierarchy composition and the
//! per-model skinning matrices handed to the vertex shader.

pub mod animation;
pub mod animator;
pub mod config;
pub mod error;
pub mod gpu;
pub mod import;
pub mod model;
pub mod skeleton;
pub mod skinning_cache;

pub use animation::{AnimationClip, ClipData, Joint, Keyframe, KeyframeTrack};
pub use animator::{Animator, PlaybackState};
pub use config::AnimationConfig;
pub use error::{AnimationError, Result};
pub use model::AnimatedModel;
pub use skeleton::{JointTable, SkeletonBuilder, SkeletonHierarchy};
pub use skinning_cache::SkinningCache;

/// Skinning matrix slots available to the vertex shader.
pub const MAX_JOINTS: usize = 100;
