use std::collections::HashMap;

use gltf::animation::{util::ReadOutputs, Interpolation};
use glam::{Quat, Vec3};

use crate::animation::{ChannelData, ClipData, Keyframe, KeyframeTrack};

use super::skeletons::node_name;

/// glTF keyframe times are in seconds, so one tick is one second.
pub const GLTF_TICKS_PER_SECOND: f32 = 1.0;

#[derive(Default)]
struct TargetChannels {
    translation: Option<Vec<Keyframe<Vec3>>>,
    rotation: Option<Vec<Keyframe<Quat>>>,
    scale: Option<Vec<Keyframe<Vec3>>>,
}

fn keyframes<T: Copy>(times: &[f32], values: Vec<T>, interpolation: Interpolation) -> Vec<Keyframe<T>> {
    let values = match interpolation {
        // (in-tangent, value, out-tangent) triplets
        Interpolation::CubicSpline => values.chunks(3).filter_map(|c| c.get(1).copied()).collect(),
        Interpolation::Linear | Interpolation::Step => values,
    };
    times.iter().zip(values).map(|(time, value)| Keyframe::new(*time, value)).collect()
}

/// Groups the animation's channels by target node. Channels a target doesn't animate get a
/// single keyframe holding the node's rest value.
pub fn read_clip(animation: &gltf::Animation, buffers: &[gltf::buffer::Data]) -> ClipData {
    let name = animation
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("animation_{}", animation.index()));
    let mut targets: Vec<(gltf::Node, TargetChannels)> = vec![];
    let mut target_idx = HashMap::<usize, usize>::new();
    let mut duration = 0f32;

    for (channel_idx, channel) in animation.channels().enumerate() {
        let node = channel.target().node();
        let interpolation = channel.sampler().interpolation();
        if matches!(interpolation, Interpolation::Step) {
            log::warn!("clip '{}': step interpolation on '{}' is sampled linearly", name, node_name(&node));
        }
        let reader = channel.reader(|buffer| Some(buffers[buffer.index()].0.as_slice()));
        let Some(inputs) = reader.read_inputs() else {
            log::warn!("clip '{}': channel {} has no keyframe times, skipping", name, channel_idx);
            continue;
        };
        let times: Vec<f32> = inputs.collect();
        if let Some(last) = times.last() {
            duration = duration.max(*last);
        }

        let idx = *target_idx.entry(node.index()).or_insert_with(|| {
            targets.push((node.clone(), TargetChannels::default()));
            targets.len() - 1
        });
        let entry = &mut targets[idx].1;
        match reader.read_outputs() {
            Some(ReadOutputs::Translations(values)) => {
                entry.translation = Some(keyframes(&times, values.map(Vec3::from).collect(), interpolation));
            }
            Some(ReadOutputs::Rotations(values)) => {
                entry.rotation = Some(keyframes(&times, values.into_f32().map(Quat::from_array).collect(), interpolation));
            }
            Some(ReadOutputs::Scales(values)) => {
                entry.scale = Some(keyframes(&times, values.map(Vec3::from).collect(), interpolation));
            }
            Some(ReadOutputs::MorphTargetWeights(_)) | None => {}
        }
    }

    let channels = targets
        .into_iter()
        .filter(|(_, c)| c.translation.is_some() || c.rotation.is_some() || c.scale.is_some())
        .map(|(node, c)| {
            let (translation, rotation, scale) = node.transform().decomposed();
            ChannelData {
                joint: node_name(&node),
                track: KeyframeTrack::new(
                    c.translation.unwrap_or_else(|| vec![Keyframe::new(0.0, Vec3::from(translation))]),
                    c.rotation.unwrap_or_else(|| vec![Keyframe::new(0.0, Quat::from_array(rotation))]),
                    c.scale.unwrap_or_else(|| vec![Keyframe::new(0.0, Vec3::from(scale))]),
                ),
            }
        })
        .collect();

    ClipData { name, duration, ticks_per_second: GLTF_TICKS_PER_SECOND, channels }
}
