use std::{collections::HashSet, sync::Arc};

use glam::Mat4;

use crate::animation::clip::ClipData;

use super::joint_table::JointTable;

/// Collects joints while one model is being loaded.
///
/// Skin joints are indexed first, in the order they were registered. Joints that only show
/// up as animation targets come after them and get an identity inverse bind matrix.
/// Nothing persists between loads: each model gets its own builder.
#[derive(Default)]
pub struct SkeletonBuilder {
    skin: Vec<(String, Mat4)>,
    skin_names: HashSet<String>,
    animated: Vec<String>,
    animated_names: HashSet<String>,
}

impl SkeletonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The first registration of a name wins.
    pub fn register_skin_joint(&mut self, name: impl Into<String>, inverse_bind: Mat4) {
        let name = name.into();
        if self.skin_names.insert(name.clone()) {
            self.skin.push((name, inverse_bind));
        }
    }

    pub fn register_animated_joint(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.animated_names.insert(name.clone()) {
            self.animated.push(name);
        }
    }

    pub fn register_clip(&mut self, clip: &ClipData) {
        for channel in &clip.channels {
            self.register_animated_joint(channel.joint.as_str());
        }
    }

    pub fn joint_count(&self) -> usize {
        self.skin.len() + self.animated_names.difference(&self.skin_names).count()
    }

    pub fn finish(self) -> Arc<JointTable> {
        let mut table = JointTable::default();
        for (name, inverse_bind) in self.skin {
            table.push(name, inverse_bind);
        }
        for name in self.animated {
            if !self.skin_names.contains(&name) {
                table.push(name, Mat4::IDENTITY);
            }
        }
        Arc::new(table)
    }
}
