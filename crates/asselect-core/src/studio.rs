//! Studio registry and project path conventions
//!
//! A project keeps one library directory per studio version next to the
//! shared working copy the studio actually opens:
//!
//! ```text
//! <root>/
//!   OCB.apj                 active project file
//!   OCB_as<suffix>.apj      per-version project files
//!   Logical/
//!     Libraries/            working copy, opened by the running studio
//!     Libraries_<suffix>/   source of truth per version
//!   Physical/
//!     Physical.pkg          active package descriptor
//!     Physical_<suffix>.pkg per-version package descriptors
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported Automation Studio versions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudioVersion {
    /// Automation Studio 4.5
    #[serde(rename = "4.5")]
    As45,
    /// Automation Studio 6
    #[serde(rename = "6")]
    As6,
}

impl StudioVersion {
    /// Version string as shown to users and stored in config
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::As45 => "4.5",
            Self::As6 => "6",
        }
    }
}

impl fmt::Display for StudioVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudioVersion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "4.5" | "45" => Ok(Self::As45),
            "6" => Ok(Self::As6),
            other => anyhow::bail!("Unknown Automation Studio version: {other} (expected 4.5 or 6)"),
        }
    }
}

/// One installed Automation Studio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomationStudio {
    /// Short name, e.g. "AS 6"
    pub name: String,
    /// Version
    pub version: StudioVersion,
    /// Executable to launch and to watch for
    pub executable: PathBuf,
    /// Suffix of the version's `Libraries_<suffix>` directory
    pub libraries_suffix: String,
    /// Suffix of the version's `Physical_<suffix>.pkg` file
    pub physical_pkg_suffix: String,
    /// Suffix of the version's `OCB_as<suffix>.apj` file
    pub project_file_suffix: String,
}

impl AutomationStudio {
    /// Automation Studio 4.5 preset
    #[must_use]
    pub fn as45(executable: PathBuf) -> Self {
        Self::preset("AS 4.5", StudioVersion::As45, executable, "45")
    }

    /// Automation Studio 6 preset
    #[must_use]
    pub fn as6(executable: PathBuf) -> Self {
        Self::preset("AS 6", StudioVersion::As6, executable, "6")
    }

    /// Preset for a version
    #[must_use]
    pub fn for_version(version: StudioVersion, executable: PathBuf) -> Self {
        match version {
            StudioVersion::As45 => Self::as45(executable),
            StudioVersion::As6 => Self::as6(executable),
        }
    }

    fn preset(name: &str, version: StudioVersion, executable: PathBuf, suffix: &str) -> Self {
        Self {
            name: name.to_string(),
            version,
            executable,
            libraries_suffix: suffix.to_string(),
            physical_pkg_suffix: suffix.to_string(),
            project_file_suffix: suffix.to_string(),
        }
    }

    /// Name for UI output
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("Automation Studio {}", self.version)
    }
}

/// Well-known locations inside a project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    /// Project root
    pub root: PathBuf,
    /// `<root>/Logical`
    pub logical: PathBuf,
    /// `<root>/Physical`
    pub physical: PathBuf,
    /// `<root>/Logical/Libraries`, the shared working copy
    pub libraries: PathBuf,
}

impl ProjectPaths {
    /// Active project file name
    pub const PROJECT_FILE: &'static str = "OCB.apj";
    /// Active package descriptor name
    pub const PHYSICAL_PKG: &'static str = "Physical.pkg";

    /// Derive all paths from a project root
    #[must_use]
    pub fn from_root(root: &Path) -> Self {
        let logical = root.join("Logical");
        Self {
            root: root.to_path_buf(),
            libraries: logical.join("Libraries"),
            logical,
            physical: root.join("Physical"),
        }
    }

    /// Version-specific source-of-truth library directory
    #[must_use]
    pub fn libraries_source(&self, suffix: &str) -> PathBuf {
        self.logical.join(format!("Libraries_{suffix}"))
    }

    /// Active package descriptor
    #[must_use]
    pub fn physical_pkg(&self) -> PathBuf {
        self.physical.join(Self::PHYSICAL_PKG)
    }

    /// Version-specific package descriptor
    #[must_use]
    pub fn physical_pkg_for(&self, suffix: &str) -> PathBuf {
        self.physical.join(format!("Physical_{suffix}.pkg"))
    }

    /// Active project file
    #[must_use]
    pub fn project_file(&self) -> PathBuf {
        self.root.join(Self::PROJECT_FILE)
    }

    /// Version-specific project file
    #[must_use]
    pub fn project_file_for(&self, suffix: &str) -> PathBuf {
        self.root.join(format!("OCB_as{suffix}.apj"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse_and_display() {
        assert_eq!("4.5".parse::<StudioVersion>().unwrap(), StudioVersion::As45);
        assert_eq!("6".parse::<StudioVersion>().unwrap(), StudioVersion::As6);
        assert!("7".parse::<StudioVersion>().is_err());
        assert_eq!(StudioVersion::As45.to_string(), "4.5");
    }

    #[test]
    fn test_presets() {
        let studio = AutomationStudio::as45(PathBuf::from("/opt/as45/pg.exe"));

        assert_eq!(studio.libraries_suffix, "45");
        assert_eq!(studio.display_name(), "Automation Studio 4.5");
        assert_eq!(
            AutomationStudio::for_version(StudioVersion::As6, PathBuf::from("x")).name,
            "AS 6"
        );
    }

    #[test]
    fn test_project_paths() {
        let paths = ProjectPaths::from_root(Path::new("/proj"));

        assert_eq!(paths.libraries, PathBuf::from("/proj/Logical/Libraries"));
        assert_eq!(
            paths.libraries_source("6"),
            PathBuf::from("/proj/Logical/Libraries_6")
        );
        assert_eq!(
            paths.physical_pkg_for("45"),
            PathBuf::from("/proj/Physical/Physical_45.pkg")
        );
        assert_eq!(paths.project_file_for("6"), PathBuf::from("/proj/OCB_as6.apj"));
        assert_eq!(paths.project_file(), PathBuf::from("/proj/OCB.apj"));
    }
}
