use std::sync::Arc;

use glam::Mat4;

use crate::{
    animation::{AnimationClip, ClipData},
    animator::{Animator, PlaybackState},
    config::AnimationConfig,
    error::{AnimationError, Result},
    skeleton::{JointTable, SkeletonHierarchy},
    skinning_cache::SkinningCache,
};

/// One skinned model: its skeleton, its clips and the per-frame update that feeds the
/// skinning buffer.
pub struct AnimatedModel {
    skeleton: Arc<SkeletonHierarchy>,
    joints: Arc<JointTable>,
    clips: Vec<Arc<AnimationClip>>,
    animator: Animator,
    cache: SkinningCache,
    config: AnimationConfig,
    frame: u64,
    /// seconds from frames skipped by the update interval
    pending_dt: f32,
}

impl AnimatedModel {
    pub fn new(skeleton: Arc<SkeletonHierarchy>, joints: Arc<JointTable>, config: AnimationConfig) -> Self {
        Self {
            animator: Animator::new(&config),
            cache: SkinningCache::new(joints.len()),
            skeleton,
            joints,
            clips: vec![],
            config,
            frame: 0,
            pending_dt: 0.0,
        }
    }

    /// Validates and stores a clip. On error the model is left exactly as it was.
    pub fn add_clip(&mut self, data: ClipData) -> Result<usize> {
        let clip = AnimationClip::new(data, self.joints.clone(), self.skeleton.clone(), &self.config)?;
        self.clips.push(Arc::new(clip));
        Ok(self.clips.len() - 1)
    }

    pub fn clips(&self) -> &[Arc<AnimationClip>] {
        &self.clips
    }

    pub fn find_clip(&self, name: &str) -> Option<usize> {
        self.clips.iter().position(|clip| clip.name() == name)
    }

    pub fn skeleton(&self) -> &Arc<SkeletonHierarchy> {
        &self.skeleton
    }

    pub fn joint_table(&self) -> &Arc<JointTable> {
        &self.joints
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn state(&self) -> PlaybackState {
        self.animator.state()
    }

    pub fn play(&mut self, index: usize) -> Result<()> {
        let clip = self.clips.get(index).ok_or(AnimationError::ClipIndexOutOfRange {
            index,
            count: self.clips.len(),
        })?;
        self.animator.switch_clip(clip.clone());
        self.cache.mark_dirty();
        Ok(())
    }

    pub fn stop(&mut self) {
        self.animator.stop();
        self.cache.mark_dirty();
        self.pending_dt = 0.0;
    }

    /// Called once per frame. Only every `update_interval`-th frame evaluates the pose; the
    /// time of the skipped frames is carried over. Returns true when new matrices are waiting
    /// in `take_upload`.
    pub fn update(&mut self, dt: f32) -> bool {
        self.pending_dt += dt;
        let due = self.frame % self.config.effective_update_interval() as u64 == 0;
        self.frame += 1;
        if !due {
            return false;
        }
        let dt = std::mem::take(&mut self.pending_dt);
        let changed = self.animator.advance(dt);
        if !changed && self.animator.state() == PlaybackState::Playing {
            // steps under the time epsilon add up until one is large enough
            self.pending_dt = dt;
        }
        self.cache.refresh(changed, self.animator.final_matrices())
    }

    /// Skinning matrices as last cached, `min(MAX_JOINTS, joint count)` of them.
    pub fn joint_matrices(&self) -> &[Mat4] {
        &self.cache.snapshot()[..self.cache.active_len()]
    }

    pub fn take_upload(&mut self) -> Option<&[Mat4]> {
        self.cache.take_upload()
    }
}
