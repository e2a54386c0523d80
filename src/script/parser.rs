//! Scene file parser.
//!
//! Splits a scene file into setup, cast and timeline commands. Blank lines
//! are skipped; fields are whitespace separated and keywords case-sensitive.
//! Extra trailing fields on a line are ignored.

use std::path::PathBuf;
use std::str::FromStr;

use glam::Vec3;
use rustc_hash::FxHashSet;

use crate::errors::{ChoreoError, Result};
use crate::script::command::{
    CastCommand, Located, SceneScript, SetupCommand, TimelineAction, TimelineCommand,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Setup,
    Cast,
    Timeline,
}

/// Parses a whole scene file.
pub fn parse_script(source: &str) -> Result<SceneScript> {
    let mut script = SceneScript::default();
    let mut section = Section::Setup;
    let mut declared: FxHashSet<String> = FxHashSet::default();

    for (idx, raw) in source.lines().enumerate() {
        let mut args = Args::new(idx + 1, raw);
        let Some(keyword) = args.peek() else {
            continue;
        };

        if section == Section::Setup && (keyword == "CHARACTER" || keyword == "anim") {
            section = Section::Cast;
        }

        match section {
            Section::Setup => {
                let command = parse_setup(&mut args)?;
                script.setup.push(Located::new(args.line, command));
            }
            Section::Cast => {
                if keyword == "ANIMATION" {
                    section = Section::Timeline;
                    continue;
                }
                let command = parse_cast(&mut args, !declared.is_empty())?;
                if let CastCommand::Character { name } = &command {
                    declared.insert(name.clone());
                }
                script.cast.push(Located::new(args.line, command));
            }
            Section::Timeline => {
                let command = parse_timeline(&mut args, &declared)?;
                script.timeline.push(Located::new(args.line, command));
            }
        }
    }

    log::debug!(
        "Parsed scene script: {} setup, {} cast, {} timeline commands",
        script.setup.len(),
        script.cast.len(),
        script.timeline.len()
    );
    Ok(script)
}

fn parse_setup(args: &mut Args) -> Result<SetupCommand> {
    let keyword = args.next_str("setup key")?;
    Ok(match keyword {
        "BACKGROUND_IMAGE" => SetupCommand::BackgroundImage(args.next_path("image path")?),
        "GROUND_IMAGE" => SetupCommand::GroundImage(args.next_path("image path")?),
        "USE_WATER" => SetupCommand::UseWater(args.next_bool("water flag")?),
        "USE_CYCLES" => SetupCommand::UseCycles(args.next_bool("cycles flag")?),
        "CHARACTER_SCALE" => SetupCommand::CharacterScale(args.next_number("character scale")?),
        "ANIM_LENGTH" => SetupCommand::AnimLength(args.next_number("animation length")?),
        _ => {
            return Err(ChoreoError::UnknownSetupCommandError {
                line: args.line,
                text: args.text(),
            });
        }
    })
}

fn parse_cast(args: &mut Args, has_character: bool) -> Result<CastCommand> {
    let keyword = args.next_str("command")?;
    Ok(match keyword {
        "CHARACTER" => CastCommand::Character {
            name: args.next_str("character name")?.to_string(),
        },
        "anim" => {
            if !has_character {
                return Err(ChoreoError::AnimBeforeCharacterError { line: args.line });
            }
            CastCommand::Anim {
                clip: args.next_str("clip name")?.to_string(),
                path: args.next_path("clip file")?,
            }
        }
        _ => {
            return Err(ChoreoError::UnknownCharacterCommandError {
                line: args.line,
                text: args.text(),
            });
        }
    })
}

fn parse_timeline(args: &mut Args, declared: &FxHashSet<String>) -> Result<TimelineCommand> {
    let character = args.next_str("character name")?;
    if !declared.contains(character) {
        return Err(ChoreoError::UnknownCharacterError {
            line: args.line,
            name: character.to_string(),
        });
    }

    let unknown = |args: &Args| ChoreoError::UnknownAnimationCommandError {
        line: args.line,
        text: args.text(),
    };
    let Some(command) = args.peek() else {
        return Err(unknown(args));
    };
    args.pos += 1;

    let action = match command {
        "visible" => TimelineAction::Visible {
            visible: args.next_bool("visibility")?,
            frame: args.next_number("frame")?,
        },
        "position" => TimelineAction::Position {
            position: args.next_vec3("position")?,
            frame: args.next_number("frame")?,
        },
        "rotation" => TimelineAction::Rotation {
            degrees: args.next_vec3("rotation")?,
            frame: args.next_number("frame")?,
        },
        "animation" => TimelineAction::Animation {
            clip: args.next_str("clip name")?.to_string(),
            frame: args.next_number("frame")?,
        },
        "loop_anim" => TimelineAction::LoopAnim {
            clip: args.next_str("clip name")?.to_string(),
            start_frame: args.next_number("start frame")?,
            end_frame: args.next_number("end frame")?,
        },
        "path" => TimelineAction::Path {
            clip: args.next_str("clip name")?.to_string(),
            start: args.next_vec3("start position")?,
            end: args.next_vec3("end position")?,
            start_frame: args.next_number("start frame")?,
        },
        _ => return Err(unknown(args)),
    };

    Ok(TimelineCommand {
        character: character.to_string(),
        action,
    })
}

/// Cursor over the whitespace-separated fields of one line.
struct Args<'a> {
    line: usize,
    raw: &'a str,
    parts: Vec<&'a str>,
    pos: usize,
}

impl<'a> Args<'a> {
    fn new(line: usize, raw: &'a str) -> Self {
        Self {
            line,
            raw,
            parts: raw.split_whitespace().collect(),
            pos: 0,
        }
    }

    fn text(&self) -> String {
        self.raw.trim().to_string()
    }

    fn peek(&self) -> Option<&'a str> {
        self.parts.get(self.pos).copied()
    }

    fn next_str(&mut self, what: &str) -> Result<&'a str> {
        let part = self.peek().ok_or_else(|| ChoreoError::InvalidArgument {
            line: self.line,
            message: format!("missing {what} in '{}'", self.raw.trim()),
        })?;
        self.pos += 1;
        Ok(part)
    }

    fn next_path(&mut self, what: &str) -> Result<PathBuf> {
        self.next_str(what).map(PathBuf::from)
    }

    fn next_bool(&mut self, what: &str) -> Result<bool> {
        match self.next_str(what)? {
            "True" => Ok(true),
            "False" => Ok(false),
            other => Err(ChoreoError::InvalidArgument {
                line: self.line,
                message: format!("{what} must be True or False, got '{other}'"),
            }),
        }
    }

    fn next_number<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let part = self.next_str(what)?;
        part.parse().map_err(|_| ChoreoError::InvalidArgument {
            line: self.line,
            message: format!("invalid {what} '{part}'"),
        })
    }

    fn next_vec3(&mut self, what: &str) -> Result<Vec3> {
        Ok(Vec3::new(
            self.next_number(what)?,
            self.next_number(what)?,
            self.next_number(what)?,
        ))
    }
}
