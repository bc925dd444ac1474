//! Artifact directory loader

use crate::artifacts::{ModelArtifact, PreprocessorArtifact};
use crate::error::ArtifactError;
use crate::types::Metadata;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// File name of the metadata document inside the artifact directory.
pub const METADATA_FILE: &str = "metadata.json";

/// File name of the serialized preprocessor inside the artifact directory.
pub const PREPROCESSOR_FILE: &str = "preprocessor.json";

/// On-disk file name for a model identifier.
pub fn model_file_name(name: &str) -> String {
    format!("model_{name}.json")
}

/// Everything loaded from the artifact directory, held read-only for the
/// life of the process and shared across all interaction cycles.
#[derive(Debug)]
pub struct ArtifactStore {
    metadata: Metadata,
    preprocessor: PreprocessorArtifact,
    models: BTreeMap<String, ModelArtifact>,
    dir: PathBuf,
}

impl ArtifactStore {
    /// Load metadata, the preprocessor and every resolvable model from `dir`.
    ///
    /// Models listed in metadata whose artifact file is absent or unreadable
    /// are skipped with a warning; loading fails only when the metadata or
    /// preprocessor is missing, an artifact is malformed, or no model at all
    /// could be loaded.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();

        let metadata_path = dir.join(METADATA_FILE);
        let metadata: Metadata = load_json(&metadata_path)?;
        if metadata.feature_names_in.is_empty() {
            return Err(ArtifactError::Malformed {
                path: metadata_path,
                reason: "feature_names_in is empty; no input form can be built".to_string(),
            });
        }

        let preprocessor_path = dir.join(PREPROCESSOR_FILE);
        let preprocessor: PreprocessorArtifact = load_json(&preprocessor_path)?;
        if let Err(reason) = preprocessor.validate() {
            return Err(ArtifactError::Malformed {
                path: preprocessor_path,
                reason,
            });
        }
        if let Some(expected) = preprocessor.n_features_in() {
            if expected != metadata.feature_names_in.len() {
                return Err(ArtifactError::Malformed {
                    path: preprocessor_path,
                    reason: format!(
                        "preprocessor was fitted on {expected} features but metadata declares {}",
                        metadata.feature_names_in.len()
                    ),
                });
            }
        }

        let mut models = BTreeMap::new();
        for name in &metadata.models {
            let path = dir.join(model_file_name(name));
            if !path.exists() {
                warn!(model = %name, path = %path.display(), "model artifact not found, skipping");
                continue;
            }
            match load_json::<ModelArtifact>(&path) {
                Ok(model) => {
                    info!(model = %name, path = %path.display(), "model loaded");
                    models.insert(name.clone(), model);
                }
                Err(e) => {
                    warn!(model = %name, error = %e, "failed to load model, skipping");
                }
            }
        }

        if models.is_empty() {
            return Err(ArtifactError::NoModelsAvailable);
        }

        info!(
            count = models.len(),
            predicts = %metadata.target,
            dir = %dir.display(),
            "artifact store opened"
        );

        Ok(Self {
            metadata,
            preprocessor,
            models,
            dir: dir.to_path_buf(),
        })
    }

    /// Assemble a store from already-loaded parts.
    pub fn from_parts(
        metadata: Metadata,
        preprocessor: PreprocessorArtifact,
        models: BTreeMap<String, ModelArtifact>,
    ) -> Self {
        Self {
            metadata,
            preprocessor,
            models,
            dir: PathBuf::new(),
        }
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn preprocessor(&self) -> &PreprocessorArtifact {
        &self.preprocessor
    }

    /// Look up a loaded model by name.
    pub fn model(&self, name: &str) -> Option<&ModelArtifact> {
        self.models.get(name)
    }

    /// Loaded model names in sorted order.
    pub fn model_names(&self) -> Vec<String> {
        self.models.keys().cloned().collect()
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ArtifactError::MissingArtifact {
                path: path.to_path_buf(),
            }
        } else {
            ArtifactError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_slice(&bytes).map_err(|e| ArtifactError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_metadata(dir: &Path, models: &[&str]) {
        let models = models
            .iter()
            .map(|m| format!("\"{m}\""))
            .collect::<Vec<_>>()
            .join(",");
        let json = format!(
            r#"{{
                "target": "revenue",
                "feature_names_in": ["budget"],
                "feature_summary": {{"budget": {{"min": 1000.0, "max": 1000.0, "mean": 1000.0}}}},
                "models": [{models}]
            }}"#
        );
        fs::write(dir.join(METADATA_FILE), json).unwrap();
    }

    fn write_identity_preprocessor(dir: &Path) {
        fs::write(dir.join(PREPROCESSOR_FILE), r#"{"kind": "identity"}"#).unwrap();
    }

    fn write_linear_model(dir: &Path, name: &str, coefficient: f64) {
        let json = format!(r#"{{"kind": "linear", "coefficients": [{coefficient}], "intercept": 0.0}}"#);
        fs::write(dir.join(model_file_name(name)), json).unwrap();
    }

    #[test]
    fn test_open_loads_listed_models() {
        let dir = tempfile::tempdir().unwrap();
        write_metadata(dir.path(), &["linear"]);
        write_identity_preprocessor(dir.path());
        write_linear_model(dir.path(), "linear", 2.0);

        let store = ArtifactStore::open(dir.path()).unwrap();
        assert_eq!(store.model_count(), 1);
        assert_eq!(store.metadata().target, "revenue");
        assert!(store.model("linear").is_some());
    }

    #[test]
    fn test_missing_model_file_is_skipped() {
        // Metadata declares two models but only one artifact exists on disk.
        let dir = tempfile::tempdir().unwrap();
        write_metadata(dir.path(), &["linear", "rf"]);
        write_identity_preprocessor(dir.path());
        write_linear_model(dir.path(), "linear", 2.0);

        let store = ArtifactStore::open(dir.path()).unwrap();
        assert_eq!(store.model_names(), vec!["linear".to_string()]);
    }

    #[test]
    fn test_missing_metadata_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        write_identity_preprocessor(dir.path());

        let err = ArtifactStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::MissingArtifact { .. }));
    }

    #[test]
    fn test_missing_preprocessor_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        write_metadata(dir.path(), &["linear"]);
        write_linear_model(dir.path(), "linear", 2.0);

        let err = ArtifactStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::MissingArtifact { .. }));
    }

    #[test]
    fn test_no_loadable_models_is_terminal() {
        let dir = tempfile::tempdir().unwrap();
        write_metadata(dir.path(), &["linear"]);
        write_identity_preprocessor(dir.path());

        let err = ArtifactStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::NoModelsAvailable));
    }

    #[test]
    fn test_empty_feature_list_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(METADATA_FILE),
            r#"{"target": "revenue", "feature_names_in": [], "models": ["linear"]}"#,
        )
        .unwrap();
        write_identity_preprocessor(dir.path());
        write_linear_model(dir.path(), "linear", 2.0);

        let err = ArtifactStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed { .. }));
    }

    #[test]
    fn test_preprocessor_width_checked_against_metadata() {
        let dir = tempfile::tempdir().unwrap();
        write_metadata(dir.path(), &["linear"]);
        fs::write(
            dir.path().join(PREPROCESSOR_FILE),
            r#"{"kind": "standard", "mean": [0.0, 0.0], "scale": [1.0, 1.0]}"#,
        )
        .unwrap();
        write_linear_model(dir.path(), "linear", 2.0);

        let err = ArtifactStore::open(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::Malformed { .. }));
    }

    #[test]
    fn test_unparseable_model_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_metadata(dir.path(), &["linear", "rf"]);
        write_identity_preprocessor(dir.path());
        write_linear_model(dir.path(), "linear", 2.0);
        fs::write(dir.path().join(model_file_name("rf")), "not json").unwrap();

        let store = ArtifactStore::open(dir.path()).unwrap();
        assert_eq!(store.model_names(), vec!["linear".to_string()]);
    }
}
