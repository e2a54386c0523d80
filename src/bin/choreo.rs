use std::path::PathBuf;

use anyhow::{Context, bail};
use choreo::{
    BlenderProcess, ChoreoSettings, ClipStore, ProcessSettings, RenderCollaborator,
    SceneInterpreter, write_manifest,
};

const USAGE: &str = "usage: choreo <scene-file> <manifest-out> [video-out]";

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (scene_file, manifest_out, video_out) = match args.as_slice() {
        [scene, manifest] => (PathBuf::from(scene), PathBuf::from(manifest), None),
        [scene, manifest, video] => (
            PathBuf::from(scene),
            PathBuf::from(manifest),
            Some(PathBuf::from(video)),
        ),
        _ => bail!(USAGE),
    };

    let settings = ChoreoSettings::default();
    let mut interpreter = SceneInterpreter::new(ClipStore::new(settings.clone()), settings);
    let document = interpreter
        .interpret_file(&scene_file)
        .with_context(|| format!("Failed to interpret {}", scene_file.display()))?;

    write_manifest(&document, &manifest_out)?;

    if let Some(video_out) = video_out {
        let blender = BlenderProcess::new(ProcessSettings::from_env());
        blender
            .render(&manifest_out, &video_out)
            .with_context(|| format!("Failed to render {}", video_out.display()))?;
        println!("Rendered {}", video_out.display());
    }

    Ok(())
}
