//! # Build Invoker and Side-Effect Commands
//!
//! This module owns every subprocess the application runs:
//!
//! - [`run_build`] invokes the external compiler for one variant and maps its
//!   exit status into a [`BuildResult`]. This is the single long-running
//!   operation in the system; callers dispatch it off the UI loop.
//! - [`copy_path_to_clipboard`] writes the artifact path to the system
//!   clipboard through the platform clipboard command.
//! - [`open_artifact`] hands the artifact to the OS default handler and never
//!   looks back.
//!
//! Build failures are recoverable and carried in the result log; side-effect
//! failures are silently degraded and never surface in the UI.

use crate::config::Config;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Marker embedded in the log of every successful build. The completed view
/// keys on this marker to choose between the success and failure panels.
pub const SUCCESS_MARKER: &str = "✅";

/// Marker embedded in the log of every failed build.
pub const FAILURE_MARKER: &str = "❌";

/// Outcome of one compiler invocation. Produced once per build and consumed
/// exactly once by the state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildResult {
    pub log: String,
    pub succeeded: bool,
    /// Set if and only if the build succeeded.
    pub artifact_path: Option<PathBuf>,
}

/// Uppercase the first character of a variant name, leaving the rest as-is.
/// Used to derive the PDF filename: `modern` -> `Modern.pdf`.
pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// Source path for a variant: `<variants_dir>/<name>.<ext>`.
pub fn input_path(config: &Config, variant: &str) -> PathBuf {
    config
        .variants_dir
        .join(format!("{}.{}", variant, config.extension))
}

/// Artifact path for a variant: `<output_dir>/<CapitalizedName>.pdf`.
pub fn output_path(config: &Config, variant: &str) -> PathBuf {
    config
        .output_dir
        .join(format!("{}.pdf", capitalize_first(variant)))
}

/// Check whether the configured compiler can be resolved on the search path.
pub fn is_compiler_available(compiler: &str) -> bool {
    Command::new(compiler)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

/// Compile one variant, blocking until the compiler exits.
///
/// Invokes `<compiler> compile <input> <output> --root ..` and captures its
/// output. A non-zero exit or a launch failure yields a failed result whose
/// log starts with the failure marker followed by whatever the compiler
/// printed. No retries, no timeout.
pub fn run_build(config: &Config, variant: &str) -> BuildResult {
    let input = input_path(config, variant);
    let output = output_path(config, variant);

    let captured = Command::new(&config.compiler)
        .arg("compile")
        .arg(&input)
        .arg(&output)
        .arg("--root")
        .arg("..")
        .output();

    match captured {
        Ok(out) if out.status.success() => BuildResult {
            log: format!("{} Build successful", SUCCESS_MARKER),
            succeeded: true,
            artifact_path: Some(output),
        },
        Ok(out) => {
            let mut log = format!("{} Build failed: {}", FAILURE_MARKER, out.status);
            let combined = combine_output(&out.stdout, &out.stderr);
            if !combined.is_empty() {
                log.push('\n');
                log.push_str(&combined);
            }
            BuildResult {
                log,
                succeeded: false,
                artifact_path: None,
            }
        }
        Err(err) => BuildResult {
            log: format!("{} Build failed: {}", FAILURE_MARKER, err),
            succeeded: false,
            artifact_path: None,
        },
    }
}

/// Merge captured stdout and stderr into one diagnostic block, stdout first.
fn combine_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).trim_end().to_string();
    let err_text = String::from_utf8_lossy(stderr);
    let err_text = err_text.trim_end();
    if !err_text.is_empty() {
        if !combined.is_empty() {
            combined.push('\n');
        }
        combined.push_str(err_text);
    }
    combined
}

/// Resolve a path to its absolute form, falling back to the path as given
/// when resolution fails.
pub fn resolve_artifact_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Copy the absolute form of `path` to the system clipboard.
///
/// Callers treat a failure as a silent degradation; nothing is surfaced to
/// the user either way.
pub fn copy_path_to_clipboard(path: &Path) -> Result<()> {
    let text = resolve_artifact_path(path).display().to_string();
    write_clipboard(&text)
}

#[cfg(target_os = "macos")]
fn write_clipboard(text: &str) -> Result<()> {
    let mut pbcopy = Command::new("pbcopy");
    pipe_to_command(&mut pbcopy, text)
}

#[cfg(target_os = "linux")]
fn write_clipboard(text: &str) -> Result<()> {
    // Try xclip first, then xsel
    let mut xclip = Command::new("xclip");
    xclip.args(["-selection", "clipboard"]);
    if pipe_to_command(&mut xclip, text).is_ok() {
        return Ok(());
    }

    let mut xsel = Command::new("xsel");
    xsel.args(["--clipboard", "--input"]);
    pipe_to_command(&mut xsel, text)
}

#[cfg(target_os = "windows")]
fn write_clipboard(text: &str) -> Result<()> {
    let mut clip = Command::new("clip");
    pipe_to_command(&mut clip, text)
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
fn write_clipboard(_text: &str) -> Result<()> {
    anyhow::bail!("Clipboard is not supported on this platform")
}

/// Spawn a command with a piped stdin, write `text` to it, and wait.
#[cfg(any(target_os = "macos", target_os = "linux", target_os = "windows"))]
fn pipe_to_command(cmd: &mut Command, text: &str) -> Result<()> {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("Failed to spawn clipboard command")?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .context("Failed to write to clipboard command")?;
    }

    let status = child
        .wait()
        .context("Failed to wait for clipboard command")?;

    if status.success() {
        Ok(())
    } else {
        anyhow::bail!("Clipboard command exited with status {}", status)
    }
}

/// Open the artifact with the OS default handler.
///
/// The child is detached and its outcome never observed. Unsupported
/// platforms are a no-op.
pub fn open_artifact(path: &Path) {
    #[cfg(target_os = "macos")]
    {
        let _ = Command::new("open")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
    }

    #[cfg(target_os = "linux")]
    {
        let _ = Command::new("xdg-open")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
    }

    #[cfg(target_os = "windows")]
    {
        let _ = Command::new("rundll32")
            .arg("url.dll,FileProtocolHandler")
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        let _ = path;
    }
}
