use std::{collections::HashMap, sync::Arc};

use crate::{
    config::AnimationConfig,
    error::{AnimationError, Result},
    skeleton::{JointInfo, JointTable, SkeletonHierarchy},
    MAX_JOINTS,
};

use super::keyframe::{Joint, KeyframeTrack};

/// Keyframes of one joint as produced by a model loader.
#[derive(Clone, Debug)]
pub struct ChannelData {
    pub joint: String,
    pub track: KeyframeTrack,
}

/// Raw clip description as produced by a model loader.
#[derive(Clone, Debug)]
pub struct ClipData {
    pub name: String,
    /// in ticks
    pub duration: f32,
    pub ticks_per_second: f32,
    pub channels: Vec<ChannelData>,
}

/// What a hierarchy node resolves to in one clip.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct NodeBinding {
    /// index into `AnimationClip::joints`
    pub animated: Option<usize>,
    pub skin: Option<JointInfo>,
}

pub struct AnimationClip {
    name: String,
    duration: f32,
    ticks_per_second: f32,
    joints: Vec<Joint>,
    lookup: HashMap<String, usize>,
    joint_table: Arc<JointTable>,
    skeleton: Arc<SkeletonHierarchy>,
    /// bindings[node_idx] => NodeBinding
    bindings: Vec<NodeBinding>,
}

impl AnimationClip {
    pub fn new(
        data: ClipData,
        joint_table: Arc<JointTable>,
        skeleton: Arc<SkeletonHierarchy>,
        config: &AnimationConfig,
    ) -> Result<Self> {
        if !data.duration.is_finite() || data.duration <= 0.0 {
            return Err(AnimationError::InvalidDuration(data.duration));
        }
        if !data.ticks_per_second.is_finite() || data.ticks_per_second < 0.0 {
            return Err(AnimationError::InvalidTicksPerSecond(data.ticks_per_second));
        }
        let ticks_per_second = if data.ticks_per_second == 0.0 {
            log::warn!(
                "clip '{}' reports 0 ticks per second, using {}",
                data.name,
                config.default_ticks_per_second
            );
            config.default_ticks_per_second
        } else {
            data.ticks_per_second
        };
        if skeleton.is_empty() {
            return Err(AnimationError::EmptyHierarchy);
        }

        let mut joints = Vec::with_capacity(data.channels.len());
        let mut lookup = HashMap::with_capacity(data.channels.len());
        for channel in data.channels {
            let info = joint_table
                .get(&channel.joint)
                .ok_or_else(|| AnimationError::MissingJointEntry(channel.joint.clone()))?;
            if lookup.contains_key(&channel.joint) {
                return Err(AnimationError::DuplicateJoint(channel.joint));
            }
            lookup.insert(channel.joint.clone(), joints.len());
            joints.push(Joint::new(channel.joint, info.index, channel.track)?);
        }

        let bindings: Vec<NodeBinding> = skeleton
            .nodes()
            .iter()
            .map(|node| NodeBinding {
                animated: lookup.get(&node.name).copied(),
                skin: joint_table.get(&node.name).copied(),
            })
            .collect();

        let dropped = bindings
            .iter()
            .filter(|b| b.skin.is_some_and(|info| info.index as usize >= MAX_JOINTS))
            .count();
        if dropped > 0 {
            log::warn!(
                "clip '{}': {} joint(s) exceed the {} joint limit and won't be animated",
                data.name,
                dropped,
                MAX_JOINTS
            );
        }
        log::debug!(
            "clip '{}': {} animated joints, duration {} ticks at {} ticks/s",
            data.name,
            joints.len(),
            data.duration,
            ticks_per_second
        );

        Ok(Self {
            name: data.name,
            duration: data.duration,
            ticks_per_second,
            joints,
            lookup,
            joint_table,
            skeleton,
            bindings,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn find_joint(&self, name: &str) -> Option<&Joint> {
        self.lookup.get(name).map(|idx| &self.joints[*idx])
    }

    pub fn joint_table(&self) -> &Arc<JointTable> {
        &self.joint_table
    }

    pub fn skeleton(&self) -> &Arc<SkeletonHierarchy> {
        &self.skeleton
    }

    /// Number of skinning slots the model uses, which may exceed `MAX_JOINTS`.
    pub fn joint_count(&self) -> usize {
        self.joint_table.len()
    }

    pub(crate) fn bindings(&self) -> &[NodeBinding] {
        &self.bindings
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Quat, Vec3};

    use super::*;
    use crate::{
        animation::keyframe::Keyframe,
        skeleton::{NodeData, SkeletonBuilder},
    };

    fn skeleton() -> Arc<SkeletonHierarchy> {
        Arc::new(SkeletonHierarchy::from_tree(
            NodeData::new("armature", Mat4::IDENTITY).with_children(vec![
                NodeData::new("hip", Mat4::IDENTITY)
                    .with_children(vec![NodeData::new("knee", Mat4::IDENTITY)]),
            ]),
        ))
    }

    fn channel(joint: &str) -> ChannelData {
        ChannelData {
            joint: joint.to_string(),
            track: KeyframeTrack::new(
                vec![Keyframe::new(0.0, Vec3::ZERO), Keyframe::new(4.0, Vec3::X)],
                vec![Keyframe::new(0.0, Quat::IDENTITY)],
                vec![Keyframe::new(0.0, Vec3::ONE)],
            ),
        }
    }

    fn clip_data(duration: f32, ticks_per_second: f32, channels: Vec<ChannelData>) -> ClipData {
        ClipData { name: "test".into(), duration, ticks_per_second, channels }
    }

    fn table(data: &ClipData) -> Arc<JointTable> {
        let mut builder = SkeletonBuilder::new();
        builder.register_skin_joint("hip", Mat4::IDENTITY);
        builder.register_clip(data);
        builder.finish()
    }

    #[test]
    fn bad_duration_fails_at_construction() {
        for duration in [0.0, -1.0, f32::NAN] {
            let data = clip_data(duration, 24.0, vec![channel("hip")]);
            let joints = table(&data);
            let result = AnimationClip::new(data, joints, skeleton(), &AnimationConfig::default());
            assert!(matches!(result, Err(AnimationError::InvalidDuration(_))));
        }
    }

    #[test]
    fn zero_rate_is_defaulted_and_negative_rate_rejected() {
        let config = AnimationConfig { default_ticks_per_second: 30.0, ..Default::default() };
        let data = clip_data(10.0, 0.0, vec![channel("hip")]);
        let joints = table(&data);
        let clip = AnimationClip::new(data, joints, skeleton(), &config).unwrap();
        assert_eq!(clip.ticks_per_second(), 30.0);

        let data = clip_data(10.0, -2.0, vec![channel("hip")]);
        let joints = table(&data);
        assert!(matches!(
            AnimationClip::new(data, joints, skeleton(), &config),
            Err(AnimationError::InvalidTicksPerSecond(_))
        ));
    }

    #[test]
    fn joints_take_their_index_from_the_table() {
        let data = clip_data(10.0, 24.0, vec![channel("knee"), channel("hip")]);
        let joints = table(&data);
        let clip = AnimationClip::new(data, joints, skeleton(), &AnimationConfig::default()).unwrap();
        assert_eq!(clip.find_joint("hip").map(Joint::index), Some(0));
        assert_eq!(clip.find_joint("knee").map(Joint::index), Some(1));
        assert!(clip.find_joint("armature").is_none());
        assert_eq!(clip.joint_count(), 2);

        let bindings = clip.bindings();
        assert!(bindings[0].animated.is_none() && bindings[0].skin.is_none());
        assert_eq!(bindings[1].animated, Some(1));
        assert_eq!(bindings[2].skin.map(|s| s.index), Some(1));
    }

    #[test]
    fn duplicate_and_unknown_joints_are_rejected() {
        let data = clip_data(10.0, 24.0, vec![channel("hip"), channel("hip")]);
        let joints = table(&data);
        assert!(matches!(
            AnimationClip::new(data, joints, skeleton(), &AnimationConfig::default()),
            Err(AnimationError::DuplicateJoint(name)) if name == "hip"
        ));

        let joints = table(&clip_data(10.0, 24.0, vec![]));
        let data = clip_data(10.0, 24.0, vec![channel("elbow")]);
        assert!(matches!(
            AnimationClip::new(data, joints, skeleton(), &AnimationConfig::default()),
            Err(AnimationError::MissingJointEntry(name)) if name == "elbow"
        ));
    }

    #[test]
    fn malformed_keyframes_fail_at_construction() {
        let mut bad = channel("hip");
        bad.track.rotations.clear();
        let data = clip_data(10.0, 24.0, vec![bad]);
        let joints = table(&data);
        assert!(matches!(
            AnimationClip::new(data, joints, skeleton(), &AnimationConfig::default()),
            Err(AnimationError::EmptyChannel { .. })
        ));
    }
}
