pub mod clip;
pub mod keyframe;

pub use clip::{AnimationClip, ChannelData, ClipData};
pub use keyframe::{Joint, Keyframe, KeyframeTrack};
