//! INI configuration file.

use std::path::{Path, PathBuf};

use ini::Ini;

use super::ConfigError;
use crate::classifier::{ClassifierPolicy, DEFAULT_SCOPE};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "depstructure.ini";

/// Default skeleton directory.
pub const DEFAULT_SKELETON_DIR: &str = "src/main/etc";

/// Path of the default configuration file.
pub fn config_file_path() -> PathBuf {
    PathBuf::from(".").join(CONFIG_FILE_NAME)
}

/// `[generate]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSection {
    /// Produce a descriptor; when false only the analysis runs.
    pub enabled: bool,
    /// The artifact is itself embedded as a sub-deployment elsewhere.
    pub sub_deployment: bool,
    /// Log wrong-scope, wrong-type and excluded dependencies.
    pub print_artifact_warnings: bool,
    pub verbose: bool,
}

impl Default for GenerateSection {
    fn default() -> Self {
        Self {
            enabled: true,
            sub_deployment: false,
            print_artifact_warnings: false,
            verbose: false,
        }
    }
}

/// `[dictionary]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionarySection {
    /// Extra dictionary files, loaded in order after the built-in layer.
    pub files: Vec<PathBuf>,
}

/// `[filter]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSection {
    pub allowed_scopes: Vec<String>,
    pub allowed_types: Vec<String>,
    pub excluded_artifacts: Vec<String>,
}

impl Default for FilterSection {
    fn default() -> Self {
        Self {
            allowed_scopes: vec![DEFAULT_SCOPE.to_string()],
            allowed_types: Vec::new(),
            excluded_artifacts: Vec::new(),
        }
    }
}

/// `[skeleton]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkeletonSection {
    pub dir: PathBuf,
}

impl Default for SkeletonSection {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_SKELETON_DIR),
        }
    }
}

/// `[output]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSection {
    /// Packaging of the artifact (`jar`, `war`, `ear`, ...).
    pub packaging: String,
    pub build_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Name of the exploded archive directory under `build_dir`.
    pub final_name: String,
    /// Explicit destination, overriding the packaging-based placement.
    pub destination_dir: Option<PathBuf>,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            packaging: "jar".to_string(),
            build_dir: PathBuf::from("target"),
            output_dir: PathBuf::from("target/classes"),
            final_name: String::new(),
            destination_dir: None,
        }
    }
}

/// `[input]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputSection {
    /// Dependency list file (`group:name:type:version:scope[:path]` lines).
    pub dependencies: Option<PathBuf>,
}

/// `[sub_deployments]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubDeploymentsSection {
    /// Declared sub-deployments as `group:name`.
    pub artifacts: Vec<String>,
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub generate: GenerateSection,
    pub dictionary: DictionarySection,
    pub filter: FilterSection,
    pub skeleton: SkeletonSection,
    pub output: OutputSection,
    pub input: InputSection,
    pub sub_deployments: SubDeploymentsSection,
}

impl ConfigFile {
    /// Load the default configuration file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load a configuration file. Missing keys keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Load a configuration file, or defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load_from(path) {
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// Parse configuration text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(content).map_err(|e| ConfigError::Parse {
            path: PathBuf::from("<string>"),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in super::ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|section| section.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Save to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        self.to_ini()
            .write_to_file(path)
            .map_err(|e| ConfigError::Write {
                path: path.to_path_buf(),
                source: e,
            })
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in super::ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section())).set(key.key_name(), value);
            }
        }
        ini
    }

    /// Classifier policy from the `[filter]` section.
    pub fn policy(&self) -> ClassifierPolicy {
        ClassifierPolicy::default()
            .with_scopes(self.filter.allowed_scopes.iter())
            .with_types(self.filter.allowed_types.iter())
            .with_exclusions(self.filter.excluded_artifacts.iter())
    }
}
