use std::fs;
use std::path::Path;

use crate::animation::character::CharacterModel;
use crate::assets::ClipSource;
use crate::errors::{ChoreoError, Result};
use crate::script::command::{
    CastCommand, Located, SceneScript, SetupCommand, TimelineAction, TimelineCommand,
};
use crate::script::document::{SceneDocument, SceneSetup};
use crate::script::parser::parse_script;
use crate::settings::{ChoreoSettings, RenderEngine};

/// Replays a parsed scene script into a [`SceneDocument`].
///
/// Clips are loaded one at a time, in script order, through the
/// [`ClipSource`]. The first error aborts the run.
pub struct SceneInterpreter<S> {
    source: S,
    settings: ChoreoSettings,
}

impl<S: ClipSource> SceneInterpreter<S> {
    pub fn new(source: S, settings: ChoreoSettings) -> Self {
        Self { source, settings }
    }

    #[must_use]
    pub fn settings(&self) -> &ChoreoSettings {
        &self.settings
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Reads, parses and interprets the scene file at `path`.
    pub fn interpret_file(&mut self, path: &Path) -> Result<SceneDocument> {
        let text = fs::read_to_string(path).map_err(|e| ChoreoError::io(path, e))?;
        self.interpret_str(&text)
    }

    pub fn interpret_str(&mut self, text: &str) -> Result<SceneDocument> {
        let script = parse_script(text)?;
        self.interpret(&script)
    }

    pub fn interpret(&mut self, script: &SceneScript) -> Result<SceneDocument> {
        log::info!("Setting up scene");
        let setup = self.apply_setup(&script.setup);
        let mut document = SceneDocument::new(setup);

        log::info!("Loading characters");
        self.apply_cast(&script.cast, &mut document)?;

        log::info!("Loading animations");
        for command in &script.timeline {
            Self::apply_timeline(command, &mut document)?;
        }

        log::info!(
            "Scene ready: {} characters, {} frames",
            document.characters().len(),
            document.animation_length()
        );
        Ok(document)
    }

    fn apply_setup(&self, commands: &[Located<SetupCommand>]) -> SceneSetup {
        let mut setup = SceneSetup::default();
        for Located { command, .. } in commands {
            match command {
                SetupCommand::BackgroundImage(path) => {
                    setup.background_image = Some(self.settings.resolve(path));
                }
                SetupCommand::GroundImage(path) => {
                    setup.ground_image = Some(self.settings.resolve(path));
                }
                SetupCommand::UseWater(flag) => setup.use_water = *flag,
                SetupCommand::UseCycles(flag) => {
                    setup.render_engine = RenderEngine::from_use_cycles(*flag);
                }
                SetupCommand::CharacterScale(scale) => setup.character_scale = *scale,
                SetupCommand::AnimLength(length) => setup.declared_length = *length,
            }
        }
        setup
    }

    fn apply_cast(
        &mut self,
        commands: &[Located<CastCommand>],
        document: &mut SceneDocument,
    ) -> Result<()> {
        let mut current: Option<String> = None;
        for Located { line, command } in commands {
            match command {
                CastCommand::Character { name } => {
                    log::debug!("Character '{name}'");
                    let scale = document.setup.character_scale;
                    document.insert_character(CharacterModel::new(name.clone(), scale));
                    current = Some(name.clone());
                }
                CastCommand::Anim { clip, path } => {
                    let character = current
                        .as_deref()
                        .and_then(|name| document.character_mut(name))
                        .ok_or(ChoreoError::AnimBeforeCharacterError { line: *line })?;
                    let resolved = self.settings.resolve(path);
                    let loaded = self.source.load_clip(&resolved)?;
                    character.add_clip(clip.clone(), loaded);
                }
            }
        }
        Ok(())
    }

    fn apply_timeline(
        located: &Located<TimelineCommand>,
        document: &mut SceneDocument,
    ) -> Result<()> {
        let TimelineCommand { character, action } = &located.command;
        let model = document
            .character_mut(character)
            .ok_or_else(|| ChoreoError::UnknownCharacterError {
                line: located.line,
                name: character.clone(),
            })?;

        let frame = match action {
            TimelineAction::Visible { visible, frame } => {
                model.set_visible(*visible, *frame);
                *frame
            }
            TimelineAction::Position { position, frame } => {
                model.set_position(*position, *frame);
                *frame
            }
            TimelineAction::Rotation { degrees, frame } => {
                model.set_rotation(*degrees, *frame);
                *frame
            }
            TimelineAction::Animation { clip, frame } => {
                model.set_active_clip(clip, *frame)?;
                *frame
            }
            TimelineAction::LoopAnim {
                clip,
                start_frame,
                end_frame,
            } => {
                model.loop_clip(clip, *start_frame, *end_frame)?;
                *end_frame
            }
            TimelineAction::Path {
                clip,
                start,
                end,
                start_frame,
            } => model.walk_path(clip, *start, *end, *start_frame)?,
        };

        document.touch_frame(frame);
        Ok(())
    }
}
