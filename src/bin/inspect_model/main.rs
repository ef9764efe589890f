use std::env;

use skeletal_anim::{import::import_model_with_animations, AnimationConfig};

mod report;

const FRAME_DT: f32 = 1.0 / 60.0;

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err("usage: inspect_model <model.gltf|glb> [clip index] [frames] [config.json] [animation files...]".into());
    }
    let clip_idx: usize = args.get(2).map(|s| s.parse()).transpose()?.unwrap_or(0);
    let frames: u32 = args.get(3).map(|s| s.parse()).transpose()?.unwrap_or(120);
    let config = match args.get(4) {
        Some(path) => AnimationConfig::load(path)?,
        None => AnimationConfig::default(),
    };

    let animation_paths = args.get(5..).unwrap_or_default();
    let imported = import_model_with_animations(&args[1], animation_paths, config)?;
    let mut model = imported.model;
    report::print_model(&model, &imported.skipped_clips);

    if model.clips().is_empty() {
        println!("no playable clips, model stays in its static pose");
        return Ok(());
    }
    model.play(clip_idx)?;

    let mut uploads = 0u32;
    for _ in 0..frames {
        model.update(FRAME_DT);
        if model.take_upload().is_some() {
            uploads += 1;
        }
    }
    println!("{} frames simulated, {} uploads", frames, uploads);
    report::print_pose(&model);
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
