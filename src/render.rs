//! Invocation of the external chart renderer and image viewer.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::MonitorError;

/// Default chart renderer program.
pub const DEFAULT_RENDERER: &str = "gnuplot";
/// Default image viewer program.
pub const DEFAULT_VIEWER: &str = "eog";

/// Redraws the charts and shows them.
pub trait RenderTrigger {
    /// Redraws both images, blocking until done.
    fn render(&mut self) -> Result<(), MonitorError>;

    /// Starts a viewer for each image without waiting for it.
    fn show(&mut self, images: &[PathBuf]) -> Result<(), MonitorError>;
}

/// Runs `<renderer> <script>` and `<viewer> <image>` as child processes.
#[derive(Debug, Clone)]
pub struct GnuplotRenderer {
    renderer: String,
    viewer: String,
    script: PathBuf,
}

impl GnuplotRenderer {
    pub fn new(renderer: impl Into<String>, viewer: impl Into<String>, script: &Path) -> Self {
        Self {
            renderer: renderer.into(),
            viewer: viewer.into(),
            script: script.to_path_buf(),
        }
    }
}

fn command_line(program: &str, arg: &Path) -> String {
    format!("{} {}", program, arg.display())
}

impl RenderTrigger for GnuplotRenderer {
    fn render(&mut self) -> Result<(), MonitorError> {
        let command = command_line(&self.renderer, &self.script);
        let status = Command::new(&self.renderer)
            .arg(&self.script)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| MonitorError::ExternalToolFailure {
                command: command.clone(),
                status: e.to_string(),
            })?;

        if !status.success() {
            return Err(MonitorError::ExternalToolFailure {
                command,
                status: status.to_string(),
            });
        }

        debug!("Rendered charts with {}", command);
        Ok(())
    }

    fn show(&mut self, images: &[PathBuf]) -> Result<(), MonitorError> {
        for image in images {
            let command = command_line(&self.viewer, image);
            let child = Command::new(&self.viewer)
                .arg(image)
                .stdin(Stdio::null())
                .spawn()
                .map_err(|e| MonitorError::ExternalToolFailure {
                    command: command.clone(),
                    status: e.to_string(),
                })?;
            // never awaited; the viewer lives until the user closes it
            info!("Started viewer: {} (pid {})", command, child.id());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_success() {
        let mut renderer = GnuplotRenderer::new("true", "true", Path::new("/tmp/unused.script"));
        assert!(renderer.render().is_ok());
    }

    #[test]
    fn test_render_non_zero_exit_is_fatal() {
        let mut renderer = GnuplotRenderer::new("false", "true", Path::new("/tmp/x.script"));
        match renderer.render() {
            Err(MonitorError::ExternalToolFailure { command, .. }) => {
                assert_eq!(command, "false /tmp/x.script")
            }
            other => panic!("expected ExternalToolFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_render_missing_program() {
        let mut renderer = GnuplotRenderer::new(
            "procmon-no-such-renderer",
            "true",
            Path::new("/tmp/x.script"),
        );
        assert!(matches!(
            renderer.render(),
            Err(MonitorError::ExternalToolFailure { .. })
        ));
    }

    #[test]
    fn test_show_missing_viewer() {
        let mut renderer =
            GnuplotRenderer::new("true", "procmon-no-such-viewer", Path::new("/tmp/x.script"));
        let images = [PathBuf::from("/tmp/a.png")];
        assert!(matches!(
            renderer.show(&images),
            Err(MonitorError::ExternalToolFailure { .. })
        ));
    }

    #[test]
    fn test_show_spawns_without_waiting() {
        let mut renderer = GnuplotRenderer::new("true", "true", Path::new("/tmp/x.script"));
        let images = [PathBuf::from("/tmp/a.png"), PathBuf::from("/tmp/b.png")];
        assert!(renderer.show(&images).is_ok());
    }
}
