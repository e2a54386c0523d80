//! External collaborators.
//!
//! Rendering and rigging run in a separate host process. Calls block until
//! the process exits; there is no timeout. A non-zero exit status is only
//! logged, the call fails when the expected output file is missing.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::errors::{ChoreoError, Result};

/// Turns a render manifest into a video file.
pub trait RenderCollaborator {
    fn render(&self, manifest: &Path, output: &Path) -> Result<()>;
}

/// Binds a static mesh to a skeletal clip, producing a clip file the clip
/// store can load.
pub trait RiggingCollaborator {
    fn rig(&self, mesh: &Path, clip: &Path, output: &Path, target_height: f32) -> Result<()>;
}

/// Where the host executable and its scripts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSettings {
    pub executable: PathBuf,
    pub render_script: PathBuf,
    pub rig_script: PathBuf,
}

impl Default for ProcessSettings {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("blender"),
            render_script: PathBuf::from("rendering/master_renderer.py"),
            rig_script: PathBuf::from("rigging/blender_rigger.py"),
        }
    }
}

impl ProcessSettings {
    /// Defaults overridden by `CHOREO_BLENDER`, `CHOREO_RENDER_SCRIPT` and
    /// `CHOREO_RIG_SCRIPT` when set.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key).map(PathBuf::from))
    }

    /// Like [`Self::from_env`] with a custom variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<PathBuf>) -> Self {
        let defaults = Self::default();
        Self {
            executable: lookup("CHOREO_BLENDER").unwrap_or(defaults.executable),
            render_script: lookup("CHOREO_RENDER_SCRIPT").unwrap_or(defaults.render_script),
            rig_script: lookup("CHOREO_RIG_SCRIPT").unwrap_or(defaults.rig_script),
        }
    }
}

/// Runs the host application in background mode:
/// `<executable> -b --python <script> -- <args...>`.
#[derive(Debug, Clone, Default)]
pub struct BlenderProcess {
    settings: ProcessSettings,
}

impl BlenderProcess {
    #[must_use]
    pub fn new(settings: ProcessSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &ProcessSettings {
        &self.settings
    }

    /// The full command line for running `script` with `args`.
    #[must_use]
    pub fn command(&self, script: &Path, args: &[String]) -> Command {
        let mut command = Command::new(&self.settings.executable);
        command.arg("-b").arg("--python").arg(script).arg("--").args(args);
        command
    }

    fn run(&self, tool: &str, script: &Path, args: &[String], output: &Path) -> Result<()> {
        log::info!("Running {tool}: {} {}", script.display(), args.join(" "));
        let status = self
            .command(script, args)
            .status()
            .map_err(|e| ChoreoError::io(&self.settings.executable, e))?;

        if !status.success() {
            log::warn!("{tool} exited with status {:?}", status.code());
        }
        if !output.exists() {
            return Err(ChoreoError::MissingOutput {
                tool: tool.to_string(),
                path: output.to_path_buf(),
            });
        }
        Ok(())
    }
}

impl RenderCollaborator for BlenderProcess {
    fn render(&self, manifest: &Path, output: &Path) -> Result<()> {
        let args = [path_arg(manifest), path_arg(output)];
        self.run("render", &self.settings.render_script, &args, output)
    }
}

impl RiggingCollaborator for BlenderProcess {
    fn rig(&self, mesh: &Path, clip: &Path, output: &Path, target_height: f32) -> Result<()> {
        let args = [
            path_arg(mesh),
            path_arg(clip),
            path_arg(output),
            target_height.to_string(),
        ];
        self.run("rig", &self.settings.rig_script, &args, output)
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
