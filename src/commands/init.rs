//! Init command implementation.
//!
//! Scaffolds a harness project: the positive and negative fixture
//! directories, the build directory, and a default `ulpt.toml`.

use std::path::{Path, PathBuf};

use crate::commands::common::error_messages;
use crate::commands::traits::{Command, CommandDescription};
use crate::config::{Config, CONFIG_FILE_NAME};
use crate::error::{Result, UlptError};

/// Arguments for the init command.
#[derive(Debug, Clone, Default)]
pub struct InitArgs {
    /// Enable verbose output.
    pub verbose: bool,
    /// Force initialization even if the directory is not empty.
    pub force: bool,
    /// Directory to initialize; defaults to the current directory.
    pub path: Option<PathBuf>,
}

/// Init command handler.
pub struct InitCommand {
    args: InitArgs,
}

impl InitCommand {
    /// Create a new InitCommand.
    pub fn new(args: InitArgs) -> Self {
        Self { args }
    }

    /// Execute the command.
    pub fn run(&self) -> Result<()> {
        let target_path = self.target_path();

        self.validate_directory(&target_path)?;
        self.create_project_structure(&target_path)?;
        self.create_config_file(&target_path)?;

        if self.args.verbose {
            eprintln!(
                "✅ Harness project initialized at {}",
                target_path.display()
            );
        }

        Ok(())
    }

    /// The target directory for initialization.
    fn target_path(&self) -> PathBuf {
        match &self.args.path {
            Some(path) => path.clone(),
            None => PathBuf::from("."),
        }
    }

    /// Validate that the target directory is suitable for initialization.
    fn validate_directory(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            if self.args.verbose {
                eprintln!("ℹ️ Creating directory: {}", path.display());
            }
            std::fs::create_dir_all(path)?;
            return Ok(());
        }

        if !path.is_dir() {
            return Err(UlptError::Validation(format!(
                "{} {}",
                error_messages::TARGET_NOT_DIR,
                path.display()
            )));
        }

        if !Self::directory_is_empty(path)? && !self.args.force {
            return Err(UlptError::Validation(format!(
                "{} {}",
                error_messages::DIR_NOT_EMPTY,
                path.display()
            )));
        }

        Ok(())
    }

    /// Check if a directory is empty.
    fn directory_is_empty(path: &Path) -> Result<bool> {
        Ok(std::fs::read_dir(path)?.next().is_none())
    }

    /// Create the fixture and build directories from the default layout.
    fn create_project_structure(&self, target: &Path) -> Result<()> {
        let config = Config::default();
        let dirs = [
            target.join(&config.suites.pos_dir),
            target.join(&config.suites.neg_dir),
            target.join(&config.build_dir),
        ];

        for dir in &dirs {
            std::fs::create_dir_all(dir)?;
            if self.args.verbose {
                eprintln!("✅ Created directory: {}", dir.display());
            }
        }

        Ok(())
    }

    /// Write the default configuration file into the target directory.
    fn create_config_file(&self, target: &Path) -> Result<()> {
        let config_path = target.join(CONFIG_FILE_NAME);
        Config::default().save_to_path(&config_path)?;

        if self.args.verbose {
            eprintln!("✅ Created file: {}", config_path.display());
        }

        Ok(())
    }
}

impl Command for InitCommand {
    type Args = InitArgs;
    type Output = ();

    fn new(args: Self::Args) -> Self {
        Self { args }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "init"
    }
}

impl CommandDescription for InitCommand {
    fn description() -> &'static str {
        "Initialize a new harness project"
    }

    fn help() -> &'static str {
        "Creates the fixture directories, the build directory, and a \
         default ulpt.toml in the target directory."
    }
}

/// Run the init command.
pub fn run_init(args: InitArgs) -> Result<()> {
    let command = InitCommand::new(args);
    command.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_scaffolds_layout() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("project");

        let args = InitArgs {
            path: Some(target.clone()),
            ..InitArgs::default()
        };
        run_init(args).unwrap();

        assert!(target.join("test/cases/pos").is_dir());
        assert!(target.join("test/cases/neg").is_dir());
        assert!(target.join("build").is_dir());
        assert!(target.join(CONFIG_FILE_NAME).is_file());

        let config = Config::load_from_path(&target.join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_rejects_nonempty_without_force() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("existing.txt"), "content").unwrap();

        let args = InitArgs {
            path: Some(dir.path().to_path_buf()),
            ..InitArgs::default()
        };
        let result = run_init(args);

        assert!(matches!(result, Err(UlptError::Validation(_))));
    }

    #[test]
    fn test_init_force_overrides_nonempty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("existing.txt"), "content").unwrap();

        let args = InitArgs {
            path: Some(dir.path().to_path_buf()),
            force: true,
            ..InitArgs::default()
        };
        run_init(args).unwrap();

        assert!(dir.path().join("existing.txt").exists());
        assert!(dir.path().join(CONFIG_FILE_NAME).is_file());
    }

    #[test]
    fn test_init_rejects_file_target() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("not_a_dir");
        std::fs::write(&file, "").unwrap();

        let args = InitArgs {
            path: Some(file),
            ..InitArgs::default()
        };
        assert!(run_init(args).is_err());
    }

    #[test]
    fn test_init_command_name() {
        assert_eq!(<InitCommand as Command>::name(), "init");
    }
}
