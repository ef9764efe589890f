use skeletal_anim::AnimatedModel;

pub fn print_model(model: &AnimatedModel, skipped: &[String]) {
    println!("nodes:  {}", model.skeleton().len());
    println!("joints: {}", model.joint_table().len());
    for (name, info) in model.joint_table().iter() {
        println!("  [{:>3}] {}", info.index, name);
    }
    for (idx, clip) in model.clips().iter().enumerate() {
        println!(
            "clip {}: '{}' {} ticks @ {} ticks/s, {} animated joints",
            idx,
            clip.name(),
            clip.duration(),
            clip.ticks_per_second(),
            clip.joints().len()
        );
    }
    for name in skipped {
        println!("skipped clip '{}'", name);
    }
}

pub fn print_pose(model: &AnimatedModel) {
    println!("time: {} ticks", model.animator().current_time());
    for (idx, m) in model.joint_matrices().iter().enumerate() {
        let (_, _, translation) = m.to_scale_rotation_translation();
        let name = model.joint_table().name_of(idx as u32).unwrap_or("?");
        println!("  [{:>3}] {:<24} t = {:?}", idx, name, translation);
    }
}
