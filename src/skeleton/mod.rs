pub mod builder;
pub mod hierarchy;
pub mod joint_table;

pub use builder::SkeletonBuilder;
pub use hierarchy::{NodeData, SkeletonHierarchy, SkeletonNode};
pub use joint_table::{JointInfo, JointTable};
