use glam::{Mat4, Quat, Vec3};

use crate::error::{AnimationError, Result};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keyframe<T> {
    /// in ticks
    pub time: f32,
    pub value: T,
}

impl<T> Keyframe<T> {
    pub fn new(time: f32, value: T) -> Self {
        Self { time, value }
    }
}

enum Bracket<'a, T> {
    Constant(&'a T),
    Between(&'a T, &'a T, f32),
}

/// Normalized position of `time` between two keyframe timestamps. A zero-length span yields 0.
pub fn interpolation_factor(t0: f32, t1: f32, time: f32) -> f32 {
    let span = t1 - t0;
    if span == 0.0 {
        0.0
    } else {
        (time - t0) / span
    }
}

/// First pair whose upper timestamp lies after `time`. Past the last key, clamp to it.
/// Times before the first key fall into the first pair and extrapolate.
fn bracket<T>(keys: &[Keyframe<T>], time: f32) -> Option<Bracket<'_, T>> {
    let last = keys.last()?;
    if keys.len() == 1 {
        return Some(Bracket::Constant(&last.value));
    }
    match keys.windows(2).find(|pair| time < pair[1].time) {
        Some(pair) => Some(Bracket::Between(
            &pair[0].value,
            &pair[1].value,
            interpolation_factor(pair[0].time, pair[1].time, time),
        )),
        None => Some(Bracket::Constant(&last.value)),
    }
}

fn sample_vec3(keys: &[Keyframe<Vec3>], time: f32, fallback: Vec3) -> Vec3 {
    match bracket(keys, time) {
        Some(Bracket::Constant(v)) => *v,
        Some(Bracket::Between(v0, v1, alpha)) => v0.lerp(*v1, alpha),
        None => fallback,
    }
}

fn sample_quat(keys: &[Keyframe<Quat>], time: f32) -> Quat {
    match bracket(keys, time) {
        Some(Bracket::Constant(q)) => q.normalize(),
        Some(Bracket::Between(q0, q1, alpha)) => q0.slerp(*q1, alpha).normalize(),
        None => Quat::IDENTITY,
    }
}

fn check_channel<T>(keys: &[Keyframe<T>], joint: &str, channel: &'static str) -> Result<()> {
    if keys.is_empty() {
        return Err(AnimationError::EmptyChannel { joint: joint.to_string(), channel });
    }
    if keys.windows(2).any(|pair| pair[1].time < pair[0].time) {
        return Err(AnimationError::UnsortedKeyframes { joint: joint.to_string(), channel });
    }
    Ok(())
}

/// Translation, rotation and scale samples of one joint, each ordered by time.
#[derive(Clone, Debug, Default)]
pub struct KeyframeTrack {
    pub positions: Vec<Keyframe<Vec3>>,
    pub rotations: Vec<Keyframe<Quat>>,
    pub scales: Vec<Keyframe<Vec3>>,
}

impl KeyframeTrack {
    pub fn new(
        positions: Vec<Keyframe<Vec3>>,
        rotations: Vec<Keyframe<Quat>>,
        scales: Vec<Keyframe<Vec3>>,
    ) -> Self {
        Self { positions, rotations, scales }
    }

    /// A track holding one rest pose sample per channel.
    pub fn constant(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            positions: vec![Keyframe::new(0.0, translation)],
            rotations: vec![Keyframe::new(0.0, rotation)],
            scales: vec![Keyframe::new(0.0, scale)],
        }
    }

    pub fn validate(&self, joint: &str) -> Result<()> {
        check_channel(&self.positions, joint, "position")?;
        check_channel(&self.rotations, joint, "rotation")?;
        check_channel(&self.scales, joint, "scale")
    }

    pub fn sample_translation(&self, time: f32) -> Vec3 {
        sample_vec3(&self.positions, time, Vec3::ZERO)
    }

    pub fn sample_rotation(&self, time: f32) -> Quat {
        sample_quat(&self.rotations, time)
    }

    pub fn sample_scale(&self, time: f32) -> Vec3 {
        sample_vec3(&self.scales, time, Vec3::ONE)
    }

    /// T * R * S at `time`
    pub fn local_transform(&self, time: f32) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.sample_scale(time),
            self.sample_rotation(time),
            self.sample_translation(time),
        )
    }
}

/// An animated skeleton joint: its name, its skinning index and its keyframes.
#[derive(Clone, Debug)]
pub struct Joint {
    name: String,
    index: u32,
    track: KeyframeTrack,
}

impl Joint {
    pub fn new(name: impl Into<String>, index: u32, track: KeyframeTrack) -> Result<Self> {
        let name = name.into();
        track.validate(&name)?;
        Ok(Self { name, index, track })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn track(&self) -> &KeyframeTrack {
        &self.track
    }

    pub fn evaluate_local_transform(&self, time: f32) -> Mat4 {
        self.track.local_transform(time)
    }
}
