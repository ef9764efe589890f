use std::sync::Arc;

use glam::Mat4;

use crate::{animation::AnimationClip, config::AnimationConfig, MAX_JOINTS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// no clip assigned, matrices hold the bind pose
    Idle,
    Playing,
}

/// Wraps `time` into [0, duration). Non-finite input restarts the clip.
pub fn wrap_time(time: f32, duration: f32) -> f32 {
    if !time.is_finite() {
        return 0.0;
    }
    let wrapped = time.rem_euclid(duration);
    // rem_euclid of a tiny negative value can round up to `duration`
    if wrapped >= duration {
        0.0
    } else {
        wrapped
    }
}

/// Walks the clip's skeleton at `time` and writes `global * inverse_bind` into `out` for every
/// skinned node. Slots past the end of `out` are skipped, slots never visited keep their value.
pub fn compose_global_transforms(clip: &AnimationClip, time: f32, out: &mut [Mat4]) {
    let skeleton = clip.skeleton();
    let bindings = clip.bindings();
    let joints = clip.joints();
    skeleton.walk(skeleton.global_inverse(), |idx, node, parent_global| {
        let binding = bindings[idx];
        let local = match binding.animated {
            Some(joint_idx) => joints[joint_idx].evaluate_local_transform(time),
            None => node.transform,
        };
        let global = parent_global * local;
        if let Some(info) = binding.skin {
            match out.get_mut(info.index as usize) {
                Some(slot) => *slot = global * info.inverse_bind,
                None => log::trace!("skipping joint '{}' (index {})", node.name, info.index),
            }
        }
        global
    });
}

/// Plays one clip at a time and keeps the resulting skinning matrices.
pub struct Animator {
    clip: Option<Arc<AnimationClip>>,
    /// in ticks, always within [0, duration)
    current_time: f32,
    last_evaluated_time: f32,
    has_evaluated: bool,
    force_update: bool,
    time_epsilon: f32,
    final_matrices: Box<[Mat4; MAX_JOINTS]>,
}

impl Animator {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            clip: None,
            current_time: 0.0,
            last_evaluated_time: 0.0,
            has_evaluated: false,
            force_update: false,
            time_epsilon: config.time_epsilon,
            final_matrices: Box::new([Mat4::IDENTITY; MAX_JOINTS]),
        }
    }

    pub fn state(&self) -> PlaybackState {
        match self.clip {
            Some(_) => PlaybackState::Playing,
            None => PlaybackState::Idle,
        }
    }

    pub fn clip(&self) -> Option<&Arc<AnimationClip>> {
        self.clip.as_ref()
    }

    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    pub fn final_matrices(&self) -> &[Mat4; MAX_JOINTS] {
        &self.final_matrices
    }

    /// Restarts playback from 0 with `clip`. The next `advance` always re-evaluates.
    pub fn switch_clip(&mut self, clip: Arc<AnimationClip>) {
        log::debug!("switching to clip '{}'", clip.name());
        self.clip = Some(clip);
        self.current_time = 0.0;
        self.force_update = true;
    }

    /// Back to idle: no clip and the bind pose in every slot.
    pub fn stop(&mut self) {
        if let Some(clip) = self.clip.take() {
            log::debug!("stopping clip '{}'", clip.name());
        }
        self.current_time = 0.0;
        self.last_evaluated_time = 0.0;
        self.has_evaluated = false;
        self.force_update = false;
        self.final_matrices.fill(Mat4::IDENTITY);
    }

    /// Moves playback forward by `dt` seconds. Returns whether the pose was recomputed.
    pub fn advance(&mut self, dt: f32) -> bool {
        let Some(clip) = &self.clip else {
            return false;
        };
        let new_time = wrap_time(self.current_time + clip.ticks_per_second() * dt, clip.duration());

        let significant = self.force_update
            || !self.has_evaluated
            || (new_time - self.last_evaluated_time).abs() >= self.time_epsilon;
        if !significant {
            return false;
        }

        self.current_time = new_time;
        self.last_evaluated_time = new_time;
        self.force_update = false;
        self.has_evaluated = true;
        compose_global_transforms(clip, new_time, &mut self.final_matrices[..]);
        true
    }
}
