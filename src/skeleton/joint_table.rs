use std::collections::HashMap;

use glam::Mat4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointInfo {
    /// slot in the skinning matrix array
    pub index: u32,
    /// maps a mesh-space vertex into the joint's space at bind time
    pub inverse_bind: Mat4,
}

/// Joint name -> skinning slot and inverse bind matrix, shared by every clip of a model.
/// Indices are dense and zero-based. Built by `SkeletonBuilder`.
#[derive(Clone, Debug, Default)]
pub struct JointTable {
    by_name: HashMap<String, JointInfo>,
    /// names[index] => joint name
    names: Vec<String>,
}

impl JointTable {
    pub(crate) fn push(&mut self, name: String, inverse_bind: Mat4) -> u32 {
        let index = self.names.len() as u32;
        self.by_name.insert(name.clone(), JointInfo { index, inverse_bind });
        self.names.push(name);
        index
    }

    pub fn get(&self, name: &str) -> Option<&JointInfo> {
        self.by_name.get(name)
    }

    pub fn name_of(&self, index: u32) -> Option<&str> {
        self.names.get(index as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Joints in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JointInfo)> {
        self.names.iter().map(|name| (name.as_str(), &self.by_name[name]))
    }
}
