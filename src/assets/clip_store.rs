use std::path::Path;

use glam::Vec3;

use crate::animation::channel::{Axis, Channel, CurveKey};
use crate::animation::clip::AnimationClip;
use crate::assets::loaders::GltfImporter;
use crate::errors::{ChoreoError, Result};
use crate::scene::{NodeHandle, SceneGraph};
use crate::settings::ChoreoSettings;

/// Anything that can turn a clip file into an [`AnimationClip`].
pub trait ClipSource {
    fn load_clip(&mut self, path: &Path) -> Result<AnimationClip>;
}

/// Loads clip files into a scene graph and extracts their animation.
///
/// Every imported file stays in [`ClipStore::graph`]; its action keyframes
/// are cleared once extracted so the imported rig stays at rest.
#[derive(Debug, Clone)]
pub struct ClipStore {
    settings: ChoreoSettings,
    graph: SceneGraph,
}

impl ClipStore {
    #[must_use]
    pub fn new(settings: ChoreoSettings) -> Self {
        Self::with_graph(SceneGraph::new(), settings)
    }

    #[must_use]
    pub fn with_graph(graph: SceneGraph, settings: ChoreoSettings) -> Self {
        Self { settings, graph }
    }

    #[must_use]
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    #[must_use]
    pub fn settings(&self) -> &ChoreoSettings {
        &self.settings
    }

    /// Imports `path` and extracts the clip it contains.
    pub fn load_clip(&mut self, path: &Path) -> Result<AnimationClip> {
        log::debug!("Loading clip {}", path.display());
        let root = GltfImporter::import(path, &mut self.graph, &self.settings)?;
        extract_clip(&mut self.graph, root, path, &self.settings)
    }
}

impl ClipSource for ClipStore {
    fn load_clip(&mut self, path: &Path) -> Result<AnimationClip> {
        ClipStore::load_clip(self, path)
    }
}

/// Extracts the clip below `root` from an already populated graph.
///
/// Finds the first armature depth-first, copies its action into a
/// frame-relative clip, derives the per-cycle offset from the hip bone and
/// clears the action's keyframes.
pub fn extract_clip(
    graph: &mut SceneGraph,
    root: NodeHandle,
    source: &Path,
    settings: &ChoreoSettings,
) -> Result<AnimationClip> {
    let structure_error = |reason: &str| ChoreoError::ClipStructureError {
        path: source.to_path_buf(),
        reason: reason.to_string(),
    };

    let armature_handle = graph
        .find_in_subtree(root, |n| n.armature().is_some())
        .ok_or_else(|| structure_error("no armature found"))?;
    let armature = graph
        .armature(armature_handle)
        .ok_or_else(|| structure_error("no armature found"))?;
    let action = armature
        .action
        .as_ref()
        .filter(|a| a.has_keyframes())
        .ok_or_else(|| structure_error("armature has no keyframes"))?;

    let pattern = settings.hip_bone_pattern.to_lowercase();
    let hip = armature
        .bones
        .iter()
        .filter_map(|&b| graph.get_node(b))
        .map(|n| n.name.as_str())
        .find(|name| name.to_lowercase().contains(&pattern))
        .ok_or_else(|| ChoreoError::NoHipBoneError {
            path: source.to_path_buf(),
        })?
        .to_string();

    let mut start = Vec3::ZERO;
    let mut end = Vec3::ZERO;
    for axis in Axis::ALL {
        let key = CurveKey::new(hip.as_str(), Channel::Location(axis));
        let Some(curve) = action.curve(&key) else {
            continue;
        };
        let first = curve.keyframes.iter().min_by_key(|k| k.frame);
        let last = curve.keyframes.iter().max_by_key(|k| k.frame);
        if let (Some(first), Some(last)) = (first, last) {
            start[axis.index()] = first.value;
            end[axis.index()] = last.value;
        }
    }

    let world = graph.world_matrix(armature_handle);
    let cycle_offset = -(world.transform_point3(end) - world.transform_point3(start));

    let name = source
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
    let curves = action
        .curves
        .iter()
        .map(|c| (c.key.clone(), c.keyframes.clone()));
    let clip = AnimationClip::from_absolute_curves(name, source, curves, cycle_offset)
        .ok_or_else(|| structure_error("keyframes span more frames than fit the timeline"))?;

    if let Some(action) = graph
        .armature_mut(armature_handle)
        .and_then(|a| a.action.as_mut())
    {
        action.clear_keyframes();
    }

    log::debug!(
        "Clip {}: hip '{hip}', frames {}..{}, cycle offset {}",
        source.display(),
        clip.first_frame(),
        clip.first_frame() + clip.length(),
        clip.cycle_offset()
    );
    Ok(clip)
}
