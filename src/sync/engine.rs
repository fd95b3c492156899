use crate::error::{MigkitError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default schema-engine executable.
pub const DEFAULT_ENGINE: &str = "sqlvc";

/// Runner for schema-engine commands.
///
/// Every invocation is synchronous and fully consumed before the next
/// step; stdout and stderr are captured together so a failing command's
/// output can be surfaced verbatim.
pub struct Engine {
    program: String,
    model_dir: PathBuf,
}

impl Engine {
    pub fn new(program: impl Into<String>, model_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            model_dir: model_dir.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    MigkitError::EngineNotFound(self.program.clone())
                } else {
                    MigkitError::Io(e)
                }
            })?;

        let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !captured.is_empty() && !captured.ends_with('\n') {
                captured.push('\n');
            }
            captured.push_str(&stderr);
        }

        if output.status.success() {
            Ok(captured)
        } else {
            Err(MigkitError::EngineFailed {
                command: format!("{} {}", self.program, args.join(" ")),
                code: output.status.code().unwrap_or(-1),
                output: captured,
            })
        }
    }

    /// Tabular comparison of the schema model against the database.
    pub fn diff(&self) -> Result<String> {
        self.run(&["diff", "--model", &self.model_dir.to_string_lossy()])
    }

    /// Textual diff of the given changes.
    pub fn diff_text(&self, change_ids: &str) -> Result<String> {
        self.run(&[
            "diffText",
            "--model",
            &self.model_dir.to_string_lossy(),
            "--changes",
            change_ids,
        ])
    }

    /// Apply the given changes to the schema-model folder. Dependencies
    /// are always excluded so unrelated objects never ride along.
    pub fn apply_model(&self, change_ids: &str) -> Result<String> {
        self.run(&[
            "model",
            "--model",
            &self.model_dir.to_string_lossy(),
            "--changes",
            change_ids,
            "--exclude-dependencies",
        ])
    }

    /// Generate a versioned migration script for the given changes into
    /// `out_dir`.
    pub fn generate(&self, change_ids: &str, out_dir: &Path, description: &str) -> Result<String> {
        self.run(&[
            "generate",
            "--model",
            &self.model_dir.to_string_lossy(),
            "--changes",
            change_ids,
            "--exclude-dependencies",
            "--out",
            &out_dir.to_string_lossy(),
            "--description",
            description,
        ])
    }
}
