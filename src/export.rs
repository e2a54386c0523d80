//! Render manifest.
//!
//! The JSON handed to the rendering collaborator: global setup, the frame
//! range, and every character's finalized keyframe schedules.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::character::CharacterModel;
use crate::animation::schedule::{Keyframe, KeyframeSchedule};
use crate::errors::{ChoreoError, Result};
use crate::script::document::SceneDocument;
use crate::settings::RenderEngine;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderManifest {
    pub frame_start: i32,
    pub frame_end: i32,
    pub background_image: Option<PathBuf>,
    pub ground_image: Option<PathBuf>,
    pub use_water: bool,
    pub render_engine: RenderEngine,
    pub characters: Vec<CharacterManifest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterManifest {
    pub name: String,
    pub scale: f32,
    pub visibility: Vec<Keyframe<bool>>,
    pub positions: Vec<Keyframe<[f32; 3]>>,
    /// XYZ Euler, radians.
    pub rotations: Vec<Keyframe<[f32; 3]>>,
    pub activations: Vec<ActivationManifest>,
    pub clips: Vec<ClipManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationManifest {
    pub clip: String,
    pub frame: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipManifest {
    pub name: String,
    pub source: PathBuf,
    pub length: i32,
    pub visibility: Vec<Keyframe<bool>>,
    pub curves: Vec<CurveManifest>,
}

/// One baked bone curve, addressed the way the host names properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveManifest {
    pub bone: String,
    pub data_path: String,
    pub index: usize,
    pub keys: Vec<Keyframe<f32>>,
}

impl RenderManifest {
    #[must_use]
    pub fn from_document(document: &SceneDocument) -> Self {
        let setup = &document.setup;
        Self {
            frame_start: 0,
            frame_end: document.animation_length(),
            background_image: setup.background_image.clone(),
            ground_image: setup.ground_image.clone(),
            use_water: setup.use_water,
            render_engine: setup.render_engine,
            characters: document
                .characters()
                .iter()
                .map(CharacterManifest::from_character)
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl CharacterManifest {
    fn from_character(character: &CharacterModel) -> Self {
        let clips = character
            .clips()
            .iter()
            .map(|(name, clip)| {
                let track = character.clip_track(name);
                ClipManifest {
                    name: name.clone(),
                    source: clip.source().to_path_buf(),
                    length: clip.length(),
                    visibility: track
                        .map(|t| t.visibility().keys().to_vec())
                        .unwrap_or_default(),
                    curves: track
                        .map(|t| {
                            t.curves()
                                .iter()
                                .map(|(key, schedule)| CurveManifest {
                                    bone: key.bone.clone(),
                                    data_path: key.channel.data_path().to_string(),
                                    index: key.channel.array_index(),
                                    keys: schedule.keys().to_vec(),
                                })
                                .collect()
                        })
                        .unwrap_or_default(),
                }
            })
            .collect();

        Self {
            name: character.name().to_string(),
            scale: character.scale(),
            visibility: character.visibility().keys().to_vec(),
            positions: vec3_keys(character.positions()),
            rotations: vec3_keys(character.rotations()),
            activations: character
                .activations()
                .iter()
                .map(|a| ActivationManifest {
                    clip: a.clip.clone(),
                    frame: a.frame,
                })
                .collect(),
            clips,
        }
    }
}

fn vec3_keys(schedule: &KeyframeSchedule<Vec3>) -> Vec<Keyframe<[f32; 3]>> {
    schedule
        .keys()
        .iter()
        .map(|k| Keyframe::new(k.frame, k.value.to_array()))
        .collect()
}

/// Writes the manifest for `document` to `path` as pretty JSON.
pub fn write_manifest(document: &SceneDocument, path: &Path) -> Result<RenderManifest> {
    let manifest = RenderManifest::from_document(document);
    let json = manifest.to_json()?;
    fs::write(path, json).map_err(|e| ChoreoError::io(path, e))?;
    log::info!(
        "Wrote render manifest {} (frames {}..{})",
        path.display(),
        manifest.frame_start,
        manifest.frame_end
    );
    Ok(manifest)
}
