//! glTF model loading: node tree, skin joints and animation clips.

use std::{path::Path, sync::Arc};

use gltf::Document;

use crate::{
    animation::ClipData, config::AnimationConfig, error::Result, model::AnimatedModel, skeleton::SkeletonBuilder,
};

pub mod animations;
pub mod skeletons;

pub struct ImportedModel {
    pub model: AnimatedModel,
    /// clips that failed validation and were left out
    pub skipped_clips: Vec<String>,
}

/// A loaded glTF document together with its buffers.
pub struct GltfSource {
    pub document: Document,
    pub buffers: Vec<gltf::buffer::Data>,
}

impl GltfSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let (document, buffers, _images) = gltf::import(path)?;
        Ok(Self { document, buffers })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let (document, buffers, _images) = gltf::import_slice(bytes)?;
        Ok(Self { document, buffers })
    }
}

pub fn import_model(path: impl AsRef<Path>, config: AnimationConfig) -> Result<ImportedModel> {
    let source = GltfSource::open(path)?;
    from_document(&source.document, &source.buffers, config)
}

pub fn import_slice(bytes: &[u8], config: AnimationConfig) -> Result<ImportedModel> {
    let source = GltfSource::from_slice(bytes)?;
    from_document(&source.document, &source.buffers, config)
}

/// Loads a model and adds the clips of every file in `animation_paths` after its own.
/// Channels are matched to the model's nodes by name.
pub fn import_model_with_animations<P: AsRef<Path>>(
    path: impl AsRef<Path>,
    animation_paths: &[P],
    config: AnimationConfig,
) -> Result<ImportedModel> {
    let model = GltfSource::open(path)?;
    let animations = animation_paths
        .iter()
        .map(|path| GltfSource::open(path))
        .collect::<Result<Vec<_>>>()?;
    assemble(&model, &animations, config)
}

pub fn from_document(
    document: &Document,
    buffers: &[gltf::buffer::Data],
    config: AnimationConfig,
) -> Result<ImportedModel> {
    let clips = read_clips(document, buffers);
    build_model(document, buffers, clips, config)
}

/// `model` provides the skeleton, skins and its own clips; each of `animations` only
/// contributes clips.
pub fn assemble(model: &GltfSource, animations: &[GltfSource], config: AnimationConfig) -> Result<ImportedModel> {
    let mut clips = read_clips(&model.document, &model.buffers);
    for source in animations {
        clips.extend(read_clips(&source.document, &source.buffers));
    }
    build_model(&model.document, &model.buffers, clips, config)
}

fn read_clips(document: &Document, buffers: &[gltf::buffer::Data]) -> Vec<ClipData> {
    document
        .animations()
        .map(|animation| animations::read_clip(&animation, buffers))
        .collect()
}

/// Every clip is registered before the joint table is built, so joints that only
/// some clip animates still get a slot. A clip that then fails validation is logged and
/// skipped; the model simply has one clip fewer, and with none it stays in its static pose.
fn build_model(
    document: &Document,
    buffers: &[gltf::buffer::Data],
    clips: Vec<ClipData>,
    config: AnimationConfig,
) -> Result<ImportedModel> {
    let skeleton = Arc::new(skeletons::read_hierarchy(document)?);

    let mut builder = SkeletonBuilder::new();
    skeletons::register_skins(document, buffers, &mut builder);
    for clip in &clips {
        builder.register_clip(clip);
    }
    let joints = builder.finish();

    let mut model = AnimatedModel::new(skeleton, joints, config);
    let mut skipped_clips = vec![];
    for clip in clips {
        let name = clip.name.clone();
        if let Err(e) = model.add_clip(clip) {
            log::warn!("clip '{}' failed to load: {}", name, e);
            skipped_clips.push(name);
        }
    }
    log::info!(
        "imported model: {} nodes, {} joints, {} clips ({} skipped)",
        model.skeleton().len(),
        model.joint_table().len(),
        model.clips().len(),
        skipped_clips.len()
    );

    Ok(ImportedModel { model, skipped_clips })
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::*;

    // Armature -> hip (skinned, offset up by one) -> tail (animation only, slides +x by 2 over 1s).
    // A second clip has a single keyframe at t=0 and therefore no duration.
    const WAG_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [
            { "name": "Armature", "children": [1] },
            { "name": "hip", "translation": [0.0, 1.0, 0.0], "children": [2] },
            { "name": "tail", "translation": [0.0, 0.0, -1.0] }
        ],
        "skins": [ { "joints": [1], "inverseBindMatrices": 2 } ],
        "animations": [
            {
                "name": "wag",
                "channels": [ { "sampler": 0, "target": { "node": 2, "path": "translation" } } ],
                "samplers": [ { "input": 0, "output": 1, "interpolation": "LINEAR" } ]
            },
            {
                "name": "frozen",
                "channels": [ { "sampler": 0, "target": { "node": 1, "path": "translation" } } ],
                "samplers": [ { "input": 3, "output": 4, "interpolation": "LINEAR" } ]
            }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 2, "type": "SCALAR", "min": [0.0], "max": [1.0] },
            { "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" },
            { "bufferView": 2, "componentType": 5126, "count": 1, "type": "MAT4" },
            { "bufferView": 0, "componentType": 5126, "count": 1, "type": "SCALAR", "min": [0.0], "max": [0.0] },
            { "bufferView": 1, "componentType": 5126, "count": 1, "type": "VEC3" }
        ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 8, "byteLength": 24 },
            { "buffer": 0, "byteOffset": 32, "byteLength": 64 }
        ],
        "buffers": [ {
            "byteLength": 96,
            "uri": "data:application/octet-stream;base64,AAAAAAAAgD8AAAAAAAAAAAAAAAAAAABAAAAAAAAAAAAAAIA/AAAAAAAAAAAAAAAAAAAAAAAAgD8AAAAAAAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAACAvwAAAAAAAIA/"
        } ]
    }"#;

    #[test]
    fn imports_skeleton_joints_and_clips() {
        let imported = import_slice(WAG_GLTF.as_bytes(), AnimationConfig::default()).unwrap();
        let model = &imported.model;
        assert_eq!(model.skeleton().len(), 3);

        let joints = model.joint_table();
        assert_eq!(joints.len(), 2);
        let hip = joints.get("hip").unwrap();
        assert_eq!(hip.index, 0);
        assert!(hip.inverse_bind.abs_diff_eq(Mat4::from_translation(Vec3::NEG_Y), 1e-6));
        let tail = joints.get("tail").unwrap();
        assert_eq!(tail.index, 1);
        assert_eq!(tail.inverse_bind, Mat4::IDENTITY);

        assert_eq!(model.clips().len(), 1);
        assert_eq!(imported.skipped_clips, ["frozen"]);
        let wag = &model.clips()[0];
        assert_eq!(wag.name(), "wag");
        assert_eq!(wag.duration(), 1.0);
        assert_eq!(wag.ticks_per_second(), 1.0);
        let track = wag.find_joint("tail").unwrap().track();
        assert_eq!(track.positions.len(), 2);
        assert_eq!(track.rotations.len(), 1);
        assert_eq!(track.scales[0].value, Vec3::ONE);
    }

    #[test]
    fn imported_clip_plays() {
        let mut model = import_slice(WAG_GLTF.as_bytes(), AnimationConfig::default()).unwrap().model;
        model.play(0).unwrap();
        assert!(model.update(0.5));
        let matrices = model.take_upload().unwrap();
        assert_eq!(matrices.len(), 2);
        // hip: T(0,1,0) * inverse bind T(0,-1,0)
        assert!(matrices[0].abs_diff_eq(Mat4::IDENTITY, 1e-6));
        // tail: T(0,1,0) * T(1,0,0), identity inverse bind
        assert!(matrices[1].abs_diff_eq(Mat4::from_translation(Vec3::new(1.0, 1.0, 0.0)), 1e-6));
    }

    // Same node tree as WAG_GLTF, skinned at "hip" only and without any clips.
    const RIG_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [
            { "name": "Armature", "children": [1] },
            { "name": "hip", "translation": [0.0, 1.0, 0.0], "children": [2] },
            { "name": "tail", "translation": [0.0, 0.0, -1.0] }
        ],
        "skins": [ { "joints": [1] } ]
    }"#;

    #[test]
    fn clips_from_separate_files_extend_the_joint_table() {
        let rig = GltfSource::from_slice(RIG_GLTF.as_bytes()).unwrap();
        let wag = GltfSource::from_slice(WAG_GLTF.as_bytes()).unwrap();
        let imported = assemble(&rig, &[wag], AnimationConfig::default()).unwrap();
        let mut model = imported.model;

        let joints = model.joint_table();
        assert_eq!(joints.len(), 2);
        assert_eq!(joints.get("hip").unwrap().index, 0);
        assert_eq!(joints.get("tail").unwrap().index, 1);
        assert_eq!(model.find_clip("wag"), Some(0));
        assert_eq!(imported.skipped_clips, ["frozen"]);

        model.play(0).unwrap();
        assert!(model.update(0.5));
        let matrices = model.take_upload().unwrap();
        // rig has no inverse bind matrices
        assert!(matrices[0].abs_diff_eq(Mat4::from_translation(Vec3::Y), 1e-6));
        assert!(matrices[1].abs_diff_eq(Mat4::from_translation(Vec3::new(1.0, 1.0, 0.0)), 1e-6));
    }

    #[test]
    fn document_without_scenes_is_rejected() {
        let json = r#"{ "asset": { "version": "2.0" } }"#;
        assert!(matches!(
            import_slice(json.as_bytes(), AnimationConfig::default()),
            Err(crate::error::AnimationError::EmptyHierarchy)
        ));
    }
}
