use std::path::PathBuf;

use rustc_hash::FxHashMap;

use crate::animation::character::CharacterModel;
use crate::settings::RenderEngine;

/// Global settings from the setup section of a scene file.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSetup {
    pub background_image: Option<PathBuf>,
    pub ground_image: Option<PathBuf>,
    pub use_water: bool,
    pub render_engine: RenderEngine,
    pub character_scale: f32,
    /// `ANIM_LENGTH`; the final length never drops below it.
    pub declared_length: i32,
}

impl Default for SceneSetup {
    fn default() -> Self {
        Self {
            background_image: None,
            ground_image: None,
            use_water: false,
            render_engine: RenderEngine::default(),
            character_scale: 1.0,
            declared_length: 0,
        }
    }
}

/// A fully interpreted scene, ready for the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneDocument {
    pub setup: SceneSetup,
    characters: Vec<CharacterModel>,
    index: FxHashMap<String, usize>,
    max_frame: i32,
}

impl SceneDocument {
    #[must_use]
    pub fn new(setup: SceneSetup) -> Self {
        Self {
            setup,
            ..Self::default()
        }
    }

    /// Adds a character, replacing one with the same name in place.
    pub fn insert_character(&mut self, character: CharacterModel) -> &mut CharacterModel {
        let slot = match self.index.get(character.name()) {
            Some(&i) => {
                self.characters[i] = character;
                i
            }
            None => {
                let i = self.characters.len();
                self.index.insert(character.name().to_string(), i);
                self.characters.push(character);
                i
            }
        };
        &mut self.characters[slot]
    }

    #[must_use]
    pub fn character(&self, name: &str) -> Option<&CharacterModel> {
        self.index.get(name).map(|&i| &self.characters[i])
    }

    pub fn character_mut(&mut self, name: &str) -> Option<&mut CharacterModel> {
        self.index.get(name).map(|&i| &mut self.characters[i])
    }

    /// Characters in declaration order.
    #[must_use]
    pub fn characters(&self) -> &[CharacterModel] {
        &self.characters
    }

    /// Records that the timeline reaches `frame`.
    pub fn touch_frame(&mut self, frame: i32) {
        self.max_frame = self.max_frame.max(frame);
    }

    /// Last frame touched by any timeline command.
    #[must_use]
    pub fn max_frame(&self) -> i32 {
        self.max_frame
    }

    /// Total scene length in frames.
    #[must_use]
    pub fn animation_length(&self) -> i32 {
        self.setup.declared_length.max(self.max_frame)
    }
}
