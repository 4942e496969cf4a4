//! Generation of the gnuplot script that draws both charts.
//!
//! The script is written once at startup and re-run by the renderer after
//! every sampling cycle. It reads the history file by column position:
//! 1 = virtual MB, 2 = resident MB, 3 = CPU %.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::MonitorError;
use crate::paths::OutputPaths;

/// Output image size in pixels (width, height).
pub const IMAGE_SIZE: (u32, u32) = (2556, 600);

/// Quotes a path for use inside a gnuplot double-quoted string.
fn quote(path: &Path) -> String {
    let raw = path.to_string_lossy();
    format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Renders the script text for the given files and x-axis width.
pub fn render_script(paths: &OutputPaths, x_points: usize) -> String {
    let log = quote(&paths.log());
    let mem_png = quote(&paths.mem_png());
    let cpu_png = quote(&paths.cpu_png());
    let (width, height) = IMAGE_SIZE;

    format!(
        r#"set term png small size {width},{height} background rgb 'gray10'
set output {mem_png}

set border lc 'gray90'
set tics tc rgb 'gray90'
set key tc rgb 'gray90'

set ylabel "MB" tc rgb 'gray90'
set y2label "MB" tc rgb 'gray90'

set ytics nomirror
set y2tics nomirror in

set xrange [0:{x_points}]
set yrange [*:*]
set y2range [*:*]

plot {log} using 1 with lines axes x1y1 title "Virtual", \
     {log} using 2 with lines axes x1y1 title "Resident"

set output {cpu_png}

set ylabel "% CPU" tc rgb 'gray90'
set y2label "% CPU" tc rgb 'gray90'

set ytics nomirror

set xrange [0:{x_points}]
set yrange [0:*]

plot {log} using 3 with lines axes x1y1 title "% CPU"
"#
    )
}

/// Writes the chart script to `paths.script()`.
pub fn write_script(paths: &OutputPaths, x_points: usize) -> Result<(), MonitorError> {
    let script_path = paths.script();
    fs::write(&script_path, render_script(paths, x_points))
        .map_err(|e| MonitorError::io("Failed to write chart script", &script_path, e))?;
    debug!("Chart script written to {}", script_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::HISTORY_CAPACITY;
    use tempfile::tempdir;

    #[test]
    fn test_script_references_all_files() {
        let paths = OutputPaths::new(Path::new("/tmp"), "42");
        let script = render_script(&paths, HISTORY_CAPACITY);

        assert!(script.contains("set output \"/tmp/procmon-42-mem.png\""));
        assert!(script.contains("set output \"/tmp/procmon-42-cpu.png\""));
        assert_eq!(script.matches("\"/tmp/procmon-42-.log\"").count(), 3);
    }

    #[test]
    fn test_both_charts_declare_xrange() {
        let paths = OutputPaths::new(Path::new("/tmp"), "42");
        let script = render_script(&paths, HISTORY_CAPACITY);

        assert_eq!(script.matches("set xrange [0:1200]").count(), 2);
        assert!(script.contains("set yrange [0:*]"));
    }

    #[test]
    fn test_columns_map_to_metrics() {
        let paths = OutputPaths::new(Path::new("/tmp"), "42");
        let script = render_script(&paths, 10);

        assert!(script.contains("using 1 with lines axes x1y1 title \"Virtual\""));
        assert!(script.contains("using 2 with lines axes x1y1 title \"Resident\""));
        assert!(script.contains("using 3 with lines axes x1y1 title \"% CPU\""));
        assert!(script.starts_with("set term png small size 2556,600"));
    }

    #[test]
    fn test_relative_output_dir_yields_absolute_script_paths() {
        let paths = OutputPaths::new(Path::new("."), "42");
        let script = render_script(&paths, HISTORY_CAPACITY);

        // quoted strings alternate with script text when split on '"'
        let quoted: Vec<&str> = script
            .split('"')
            .skip(1)
            .step_by(2)
            .filter(|s| s.contains("procmon-42-"))
            .collect();
        assert_eq!(quoted.len(), 5);
        for path in quoted {
            assert!(Path::new(path).is_absolute(), "relative path in script: {}", path);
        }
    }

    #[test]
    fn test_quote_escapes_double_quotes() {
        assert_eq!(quote(Path::new("/tmp/a\"b")), "\"/tmp/a\\\"b\"");
    }

    #[test]
    fn test_write_script_creates_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let paths = OutputPaths::new(dir.path(), "9");

        write_script(&paths, HISTORY_CAPACITY).expect("write script");

        let written = std::fs::read_to_string(paths.script()).unwrap();
        assert_eq!(written, render_script(&paths, HISTORY_CAPACITY));
    }
}
