pub mod bones;

pub use bones::{pack_bone_matrices, BoneMatrix, BonesBinding};
