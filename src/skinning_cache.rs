use glam::Mat4;

use crate::MAX_JOINTS;

/// Last skinning matrices handed to the GPU, and whether they still need to go out.
pub struct SkinningCache {
    snapshot: Box<[Mat4; MAX_JOINTS]>,
    joint_count: usize,
    /// compare-and-copy on the next refresh even if the animator reported no change
    force: bool,
    /// snapshot changed since the last `take_upload`
    dirty: bool,
}

impl SkinningCache {
    pub fn new(joint_count: usize) -> Self {
        Self {
            snapshot: Box::new([Mat4::IDENTITY; MAX_JOINTS]),
            joint_count,
            force: true,
            dirty: false,
        }
    }

    /// Slots that are compared and uploaded.
    pub fn active_len(&self) -> usize {
        self.joint_count.min(MAX_JOINTS)
    }

    pub fn mark_dirty(&mut self) {
        self.force = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn snapshot(&self) -> &[Mat4; MAX_JOINTS] {
        &self.snapshot
    }

    /// Takes in freshly evaluated matrices. Returns true when the snapshot was replaced.
    pub fn refresh(&mut self, changed: bool, matrices: &[Mat4; MAX_JOINTS]) -> bool {
        if !changed && !self.force {
            return false;
        }
        let n = self.active_len();
        let replace = self.force || self.snapshot[..n] != matrices[..n];
        if replace {
            *self.snapshot = *matrices;
            self.dirty = true;
        }
        self.force = false;
        replace
    }

    /// The matrices to upload, once per change.
    pub fn take_upload(&mut self) -> Option<&[Mat4]> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        let n = self.active_len();
        Some(&self.snapshot[..n])
    }
}
