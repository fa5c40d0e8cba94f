//! Addressable configuration keys.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::{parse_list, ConfigError, ConfigFile};

/// Every configuration key, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    GenerateEnabled,
    GenerateSubDeployment,
    GeneratePrintArtifactWarnings,
    GenerateVerbose,
    DictionaryFiles,
    FilterAllowedScopes,
    FilterAllowedTypes,
    FilterExcludedArtifacts,
    SkeletonDir,
    OutputPackaging,
    OutputBuildDir,
    OutputOutputDir,
    OutputFinalName,
    OutputDestinationDir,
    InputDependencies,
    SubDeploymentsArtifacts,
}

const ALL_KEYS: [ConfigKey; 16] = [
    ConfigKey::GenerateEnabled,
    ConfigKey::GenerateSubDeployment,
    ConfigKey::GeneratePrintArtifactWarnings,
    ConfigKey::GenerateVerbose,
    ConfigKey::DictionaryFiles,
    ConfigKey::FilterAllowedScopes,
    ConfigKey::FilterAllowedTypes,
    ConfigKey::FilterExcludedArtifacts,
    ConfigKey::SkeletonDir,
    ConfigKey::OutputPackaging,
    ConfigKey::OutputBuildDir,
    ConfigKey::OutputOutputDir,
    ConfigKey::OutputFinalName,
    ConfigKey::OutputDestinationDir,
    ConfigKey::InputDependencies,
    ConfigKey::SubDeploymentsArtifacts,
];

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    /// INI section the key lives in.
    pub fn section(&self) -> &'static str {
        match self {
            Self::GenerateEnabled
            | Self::GenerateSubDeployment
            | Self::GeneratePrintArtifactWarnings
            | Self::GenerateVerbose => "generate",
            Self::DictionaryFiles => "dictionary",
            Self::FilterAllowedScopes
            | Self::FilterAllowedTypes
            | Self::FilterExcludedArtifacts => {
                "filter"
            }
            Self::SkeletonDir => "skeleton",
            Self::OutputPackaging
            | Self::OutputBuildDir
            | Self::OutputOutputDir
            | Self::OutputFinalName
            | Self::OutputDestinationDir => "output",
            Self::InputDependencies => "input",
            Self::SubDeploymentsArtifacts => "sub_deployments",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            Self::GenerateEnabled => "enabled",
            Self::GenerateSubDeployment => "sub_deployment",
            Self::GeneratePrintArtifactWarnings => "print_artifact_warnings",
            Self::GenerateVerbose => "verbose",
            Self::DictionaryFiles => "files",
            Self::FilterAllowedScopes => "allowed_scopes",
            Self::FilterAllowedTypes => "allowed_types",
            Self::FilterExcludedArtifacts => "excluded_artifacts",
            Self::SkeletonDir => "dir",
            Self::OutputPackaging => "packaging",
            Self::OutputBuildDir => "build_dir",
            Self::OutputOutputDir => "output_dir",
            Self::OutputFinalName => "final_name",
            Self::OutputDestinationDir => "destination_dir",
            Self::InputDependencies => "dependencies",
            Self::SubDeploymentsArtifacts => "artifacts",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as written in the file; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        let path = |p: &PathBuf| p.display().to_string();
        let opt_path = |p: &Option<PathBuf>| p.as_ref().map(path).unwrap_or_default();

        match self {
            Self::GenerateEnabled => config.generate.enabled.to_string(),
            Self::GenerateSubDeployment => config.generate.sub_deployment.to_string(),
            Self::GeneratePrintArtifactWarnings => {
                config.generate.print_artifact_warnings.to_string()
            }
            Self::GenerateVerbose => config.generate.verbose.to_string(),
            Self::DictionaryFiles => config
                .dictionary
                .files
                .iter()
                .map(path)
                .collect::<Vec<_>>()
                .join(", "),
            Self::FilterAllowedScopes => config.filter.allowed_scopes.join(", "),
            Self::FilterAllowedTypes => config.filter.allowed_types.join(", "),
            Self::FilterExcludedArtifacts => config.filter.excluded_artifacts.join(", "),
            Self::SkeletonDir => path(&config.skeleton.dir),
            Self::OutputPackaging => config.output.packaging.clone(),
            Self::OutputBuildDir => path(&config.output.build_dir),
            Self::OutputOutputDir => path(&config.output.output_dir),
            Self::OutputFinalName => config.output.final_name.clone(),
            Self::OutputDestinationDir => opt_path(&config.output.destination_dir),
            Self::InputDependencies => opt_path(&config.input.dependencies),
            Self::SubDeploymentsArtifacts => config.sub_deployments.artifacts.join(", "),
        }
    }

    /// Set a value from its textual form.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let opt_path = || (!value.is_empty()).then(|| PathBuf::from(value));

        match self {
            Self::GenerateEnabled => config.generate.enabled = self.parse_bool(value)?,
            Self::GenerateSubDeployment => config.generate.sub_deployment = self.parse_bool(value)?,
            Self::GeneratePrintArtifactWarnings => {
                config.generate.print_artifact_warnings = self.parse_bool(value)?
            }
            Self::GenerateVerbose => config.generate.verbose = self.parse_bool(value)?,
            Self::DictionaryFiles => {
                config.dictionary.files = parse_list(value).into_iter().map(PathBuf::from).collect()
            }
            Self::FilterAllowedScopes => {
                let scopes = parse_list(value);
                if scopes.is_empty() {
                    return Err(self.invalid(value, "at least one scope is required"));
                }
                config.filter.allowed_scopes = scopes;
            }
            Self::FilterAllowedTypes => config.filter.allowed_types = parse_list(value),
            Self::FilterExcludedArtifacts => config.filter.excluded_artifacts = parse_list(value),
            Self::SkeletonDir => config.skeleton.dir = PathBuf::from(value),
            Self::OutputPackaging => config.output.packaging = value.to_string(),
            Self::OutputBuildDir => config.output.build_dir = PathBuf::from(value),
            Self::OutputOutputDir => config.output.output_dir = PathBuf::from(value),
            Self::OutputFinalName => config.output.final_name = value.to_string(),
            Self::OutputDestinationDir => config.output.destination_dir = opt_path(),
            Self::InputDependencies => config.input.dependencies = opt_path(),
            Self::SubDeploymentsArtifacts => config.sub_deployments.artifacts = parse_list(value),
        }
        Ok(())
    }

    fn parse_bool(&self, value: &str) -> Result<bool, ConfigError> {
        match value.to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(self.invalid(value, "expected true or false")),
        }
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for key in ConfigKey::all() {
            let parsed: ConfigKey = key.name().parse().unwrap();
            assert_eq!(parsed, *key);
        }
    }

    #[test]
    fn test_unknown_key() {
        assert!(matches!(
            "generate.nope".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_get_set() {
        let mut config = ConfigFile::default();
        ConfigKey::FilterAllowedTypes
            .set(&mut config, "jar, war")
            .unwrap();
        assert_eq!(ConfigKey::FilterAllowedTypes.get(&config), "jar, war");

        ConfigKey::OutputDestinationDir.set(&mut config, "out/META-INF").unwrap();
        assert_eq!(config.output.destination_dir, Some(PathBuf::from("out/META-INF")));
        ConfigKey::OutputDestinationDir.set(&mut config, "").unwrap();
        assert!(config.output.destination_dir.is_none());
        assert_eq!(ConfigKey::OutputDestinationDir.get(&config), "");
    }

    #[test]
    fn test_bool_values() {
        let mut config = ConfigFile::default();
        ConfigKey::GenerateEnabled.set(&mut config, "no").unwrap();
        assert!(!config.generate.enabled);
        ConfigKey::GenerateEnabled.set(&mut config, "TRUE").unwrap();
        assert!(config.generate.enabled);
        assert!(ConfigKey::GenerateEnabled.set(&mut config, "sometimes").is_err());
    }

    #[test]
    fn test_empty_scopes_rejected() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::FilterAllowedScopes.set(&mut config, " , ").is_err());
        assert_eq!(config.filter.allowed_scopes, vec!["provided"]);
    }

    #[test]
    fn test_sections_are_grouped() {
        let sections: Vec<&str> = ConfigKey::all().iter().map(|k| k.section()).collect();
        let mut seen = Vec::new();
        for section in sections {
            if seen.last() != Some(&section) {
                assert!(!seen.contains(&section), "{} split across the list", section);
                seen.push(section);
            }
        }
    }
}
