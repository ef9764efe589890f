use gltf::{Document, Node};
use glam::Mat4;

use crate::{
    error::Result,
    skeleton::{NodeData, SkeletonBuilder, SkeletonHierarchy},
};

/// Unnamed nodes are named after their glTF index so they can still be matched.
pub fn node_name(node: &Node) -> String {
    node.name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node_{}", node.index()))
}

fn node_data(node: &Node) -> NodeData {
    NodeData::new(node_name(node), Mat4::from_cols_array_2d(&node.transform().matrix()))
        .with_children(node.children().map(|child| node_data(&child)).collect())
}

/// Node tree of the default scene, or of the first scene if none is marked default.
pub fn read_hierarchy(document: &Document) -> Result<SkeletonHierarchy> {
    let roots: Vec<NodeData> = match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => scene.nodes().map(|node| node_data(&node)).collect(),
        None => vec![],
    };
    SkeletonHierarchy::from_roots(roots)
}

/// Registers every skin joint in skin order. Missing inverse bind matrices mean identity.
pub fn register_skins(document: &Document, buffers: &[gltf::buffer::Data], builder: &mut SkeletonBuilder) {
    for skin in document.skins() {
        let reader = skin.reader(|buffer| Some(buffers[buffer.index()].0.as_slice()));
        let inverse_binds: Vec<Mat4> = reader
            .read_inverse_bind_matrices()
            .map(|matrices| matrices.map(|m| Mat4::from_cols_array_2d(&m)).collect())
            .unwrap_or_default();
        if inverse_binds.is_empty() {
            log::debug!("skin {} has no inverse bind matrices, using identity", skin.index());
        }
        for (i, joint) in skin.joints().enumerate() {
            let inverse_bind = inverse_binds.get(i).copied().unwrap_or(Mat4::IDENTITY);
            builder.register_skin_joint(node_name(&joint), inverse_bind);
        }
    }
}
