//! One-shot project setup for a selected studio version
//!
//! Rewires a project so the chosen studio can open it: the shared
//! `Logical/Libraries` working copy is replaced by the version's libraries,
//! and the active package descriptor and project file are swapped for the
//! version's copies. Steps run in order and the first failure aborts.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Child, Command};
use std::sync::Arc;

use anyhow::Context;

use crate::error::{ProjectError, Result};
use crate::session_log::SessionLog;
use crate::studio::{AutomationStudio, ProjectPaths};
use crate::sync::FileOperationExecutor;

/// Steps of [`ProjectSetup::run`], in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    /// Check that `Logical/` and `Physical/` exist
    Validate,
    /// Empty the working copy
    ClearLibraries,
    /// Copy the version's libraries into the working copy
    CopyLibraries,
    /// Activate the version's package descriptor
    UpdatePhysicalPkg,
    /// Activate the version's project file
    UpdateProjectFile,
}

impl SetupStep {
    /// Every step in execution order
    pub const ALL: [Self; 5] = [
        Self::Validate,
        Self::ClearLibraries,
        Self::CopyLibraries,
        Self::UpdatePhysicalPkg,
        Self::UpdateProjectFile,
    ];

    /// Progress message
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Validate => "Validating project structure",
            Self::ClearLibraries => "Clearing Libraries directory",
            Self::CopyLibraries => "Copying version libraries",
            Self::UpdatePhysicalPkg => "Updating Physical.pkg",
            Self::UpdateProjectFile => "Updating project file",
        }
    }
}

/// Project setup sequence
pub struct ProjectSetup {
    log: Arc<dyn SessionLog>,
}

impl ProjectSetup {
    /// Create a setup sequence reporting to `log`
    #[must_use]
    pub fn new(log: Arc<dyn SessionLog>) -> Self {
        Self { log }
    }

    /// Run every step for `studio`, calling `progress` before each one
    ///
    /// # Errors
    ///
    /// Returns the first step's failure; later steps do not run.
    pub fn run(
        &self,
        root: &Path,
        studio: &AutomationStudio,
        mut progress: impl FnMut(SetupStep),
    ) -> Result<()> {
        let paths = ProjectPaths::from_root(root);
        tracing::info!(root = %root.display(), studio = %studio.version, "Starting project setup");
        self.log.studio_selected(studio);

        for step in SetupStep::ALL {
            progress(step);
            let outcome = match step {
                SetupStep::Validate => Self::validate_structure(&paths),
                SetupStep::ClearLibraries => self.clear_libraries(&paths),
                SetupStep::CopyLibraries => self.copy_libraries(&paths, studio),
                SetupStep::UpdatePhysicalPkg => self.update_physical_pkg(&paths, studio),
                SetupStep::UpdateProjectFile => self.update_project_file(&paths, studio),
            };

            if let Err(e) = outcome {
                let message = format!("{e:#}");
                tracing::error!(step = step.label(), "Project setup failed: {message}");
                self.log.error("Project setup failed", Some(&message));
                return Err(e.context(format!("Project setup failed at: {}", step.label())));
            }
        }

        self.log.project_operation("Project setup completed successfully", None);
        tracing::info!(studio = %studio.version, "Project setup completed");
        Ok(())
    }

    /// Check that the project layout is present
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::MissingDirectory`] for the first missing directory.
    pub fn validate_structure(paths: &ProjectPaths) -> Result<()> {
        if !paths.logical.is_dir() {
            return Err(ProjectError::MissingDirectory {
                kind: "Logical",
                path: paths.logical.clone(),
            }
            .into());
        }
        if !paths.physical.is_dir() {
            return Err(ProjectError::MissingDirectory {
                kind: "Physical",
                path: paths.physical.clone(),
            }
            .into());
        }

        tracing::debug!(root = %paths.root.display(), "Project structure validated");
        Ok(())
    }

    /// Remove everything inside the working copy, creating it if missing
    ///
    /// # Errors
    ///
    /// Returns an error if an entry cannot be removed.
    pub fn clear_libraries(&self, paths: &ProjectPaths) -> Result<()> {
        let libraries = &paths.libraries;

        if !libraries.exists() {
            fs::create_dir_all(libraries).map_err(|e| {
                ProjectError::io(format!("Failed to create {}", libraries.display()), e)
            })?;
            return Ok(());
        }

        let entries = fs::read_dir(libraries)
            .map_err(|e| ProjectError::io(format!("Failed to read {}", libraries.display()), e))?;

        for entry in entries {
            let entry = entry
                .map_err(|e| ProjectError::io(format!("Failed to read {}", libraries.display()), e))?;
            let path = entry.path();
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());

            let removed = if is_dir {
                fs::remove_dir_all(&path)
            } else {
                fs::remove_file(&path)
            };
            removed.map_err(|e| ProjectError::io(format!("Failed to delete {}", path.display()), e))?;

            self.log.file_operation(
                if is_dir { "Directory deleted" } else { "File deleted" },
                &path,
                None,
            );
        }

        self.log.project_operation("Libraries directory cleared", None);
        Ok(())
    }

    /// Copy `Libraries_<suffix>` into the working copy, keeping mtimes
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::MissingSource`] if the version has no libraries,
    /// or the copy failure.
    pub fn copy_libraries(&self, paths: &ProjectPaths, studio: &AutomationStudio) -> Result<()> {
        let source = paths.libraries_source(&studio.libraries_suffix);
        if !source.is_dir() {
            return Err(ProjectError::MissingSource(source).into());
        }

        let copied = FileOperationExecutor::copy_directory(&source, &paths.libraries)
            .with_context(|| {
                format!(
                    "Failed to copy libraries from {} to {}",
                    source.display(),
                    paths.libraries.display()
                )
            })?;

        self.log.file_operation("Directory copied", &source, Some(&paths.libraries));
        self.log.project_operation(
            &format!("Libraries copied for {}", studio.display_name()),
            Some(&format!("{copied} files")),
        );
        Ok(())
    }

    /// Replace `Physical/Physical.pkg` with the version's descriptor
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::MissingSource`] or the copy failure.
    pub fn update_physical_pkg(&self, paths: &ProjectPaths, studio: &AutomationStudio) -> Result<()> {
        self.replace_file(
            &paths.physical_pkg_for(&studio.physical_pkg_suffix),
            &paths.physical_pkg(),
        )?;
        self.log.project_operation(
            &format!("Physical.pkg updated for {}", studio.display_name()),
            None,
        );
        Ok(())
    }

    /// Replace `OCB.apj` with the version's project file
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::MissingSource`] or the copy failure.
    pub fn update_project_file(&self, paths: &ProjectPaths, studio: &AutomationStudio) -> Result<()> {
        self.replace_file(
            &paths.project_file_for(&studio.project_file_suffix),
            &paths.project_file(),
        )?;
        self.log.project_operation(
            &format!("Project file updated for {}", studio.display_name()),
            None,
        );
        Ok(())
    }

    fn replace_file(&self, source: &Path, target: &Path) -> Result<()> {
        if !source.is_file() {
            return Err(ProjectError::MissingSource(source.to_path_buf()).into());
        }

        if target.exists() {
            fs::remove_file(target)
                .map_err(|e| ProjectError::io(format!("Failed to delete {}", target.display()), e))?;
            self.log.file_operation("File deleted", target, None);
        }

        FileOperationExecutor::copy_file(source, target)?;
        self.log.file_operation("File copied", source, Some(target));
        Ok(())
    }

    /// Open the project's active file with `studio`
    ///
    /// # Errors
    ///
    /// Returns an error if the executable or project file is missing, or the
    /// process cannot be spawned.
    pub fn launch(&self, root: &Path, studio: &AutomationStudio) -> Result<Child> {
        let project_file: PathBuf = ProjectPaths::from_root(root).project_file();
        if !project_file.is_file() {
            return Err(ProjectError::MissingSource(project_file).into());
        }
        if !studio.executable.is_file() {
            return Err(ProjectError::MissingExecutable(studio.executable.clone()).into());
        }

        let child = Command::new(&studio.executable)
            .arg(&project_file)
            .spawn()
            .with_context(|| format!("Failed to start {}", studio.executable.display()))?;

        tracing::info!(pid = child.id(), studio = %studio.version, "Launched Automation Studio");
        self.log.project_operation(
            &format!("Project opened with {}", studio.display_name()),
            Some(&format!("File: {}", project_file.display())),
        );
        Ok(child)
    }
}
