// Reference data store
//
// Static symptom ontology, disorder glossaries, coping skills and the
// hotline/warmline directory. Loaded once at start-up and shared read-only.

mod hotline;

pub use hotline::{load_resources, Resource};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::errors::DataError;

pub const SYMPTOM_ONTOLOGY_FILE: &str = "symptom_ontology.json";
pub const COPING_SKILLS_FILE: &str = "coping_skills.json";
pub const HOTLINE_FILE: &str = "Hotline_Warmline_Data.csv";
pub const SCHIZOPHRENIA_FILE: &str = "schizophrenia spectrum and other psychotic disorders.json";
pub const DEPRESSIVE_FILE: &str = "depressive disorders.json";
pub const BIPOLAR_FILE: &str = "bipolar and related disorders.json";
pub const GLOSSARY_FILE: &str = "glossary of technical terms.json";

/// A coping skill record from `coping_skills.json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CopingSkill {
    pub skill: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Symptom name → descriptive tags
pub type Ontology = BTreeMap<String, Vec<String>>;

/// Term → definition
pub type Glossary = BTreeMap<String, String>;

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub ontology: Ontology,
    pub coping_skills: Vec<CopingSkill>,
    pub schizophrenia: Glossary,
    pub depressive: Glossary,
    pub bipolar: Glossary,
    pub glossary: Glossary,
    pub resources: Vec<Resource>,
}

impl ReferenceData {
    /// Load every reference file from `dir`
    ///
    /// The ontology, coping skills and hotline directory are required. The
    /// disorder glossaries and the technical glossary fall back to empty.
    pub fn load(dir: &Path) -> Result<Self, DataError> {
        let data = Self {
            ontology: read_json(&dir.join(SYMPTOM_ONTOLOGY_FILE))?,
            coping_skills: read_json(&dir.join(COPING_SKILLS_FILE))?,
            schizophrenia: read_optional_json(&dir.join(SCHIZOPHRENIA_FILE))?,
            depressive: read_optional_json(&dir.join(DEPRESSIVE_FILE))?,
            bipolar: read_optional_json(&dir.join(BIPOLAR_FILE))?,
            glossary: read_optional_json(&dir.join(GLOSSARY_FILE))?,
            resources: load_resources(&dir.join(HOTLINE_FILE))?,
        };

        tracing::info!(
            dir = %dir.display(),
            symptoms = data.symptom_list().len(),
            skills = data.coping_skills.len(),
            glossary_terms = data.glossary.len(),
            resources = data.resources.len(),
            "Loaded reference data"
        );

        Ok(data)
    }

    /// Every known symptom or disorder term, deduplicated and sorted
    ///
    /// Blank keys are left out; they would match every message.
    pub fn symptom_list(&self) -> Vec<String> {
        let keys: BTreeSet<&String> = self
            .ontology
            .keys()
            .chain(self.schizophrenia.keys())
            .chain(self.depressive.keys())
            .chain(self.bipolar.keys())
            .filter(|key| !key.trim().is_empty())
            .collect();
        keys.into_iter().cloned().collect()
    }

    /// First non-empty definition, checking schizophrenia, depressive, then bipolar
    pub fn definition(&self, term: &str) -> Option<&str> {
        [&self.schizophrenia, &self.depressive, &self.bipolar]
            .into_iter()
            .filter_map(|glossary| glossary.get(term))
            .map(String::as_str)
            .find(|def| !def.trim().is_empty())
    }

    /// Technical glossary rendered as `- term: definition` lines
    pub fn glossary_text(&self) -> String {
        self.glossary
            .iter()
            .map(|(term, def)| format!("- {}: {}", term, def))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    if !path.exists() {
        return Err(DataError::Missing {
            path: path.to_path_buf(),
        });
    }

    let contents = fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| DataError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T, DataError> {
    match read_json(path) {
        Err(DataError::Missing { path }) => {
            tracing::warn!("{} not found, falling back to defaults", path.display());
            Ok(T::default())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_required(dir: &Path) {
        fs::write(
            dir.join(SYMPTOM_ONTOLOGY_FILE),
            r#"{"insomnia": ["sleep", "stress"], "anxiety": ["stress"]}"#,
        )
        .unwrap();
        fs::write(
            dir.join(COPING_SKILLS_FILE),
            r#"[{"skill": "Box breathing", "description": "Breathe in fours", "tags": ["stress"]}]"#,
        )
        .unwrap();
        fs::write(
            dir.join(HOTLINE_FILE),
            "type,name,phone number\nhotline,988 Lifeline,988\n",
        )
        .unwrap();
    }

    #[test]
    fn test_load_with_optional_files_missing() {
        let dir = tempfile::tempdir().unwrap();
        write_required(dir.path());

        let data = ReferenceData::load(dir.path()).unwrap();
        assert_eq!(data.ontology.len(), 2);
        assert_eq!(data.coping_skills.len(), 1);
        assert!(data.glossary.is_empty());
        assert_eq!(data.glossary_text(), "");
        assert_eq!(data.resources.len(), 1);
    }

    #[test]
    fn test_missing_required_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_required(dir.path());
        fs::remove_file(dir.path().join(COPING_SKILLS_FILE)).unwrap();

        let err = ReferenceData::load(dir.path()).unwrap_err();
        assert!(matches!(err, DataError::Missing { .. }));
        assert!(err.path().ends_with(COPING_SKILLS_FILE));
    }

    #[test]
    fn test_malformed_optional_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_required(dir.path());
        fs::write(dir.path().join(GLOSSARY_FILE), "not json").unwrap();

        let err = ReferenceData::load(dir.path()).unwrap_err();
        assert!(matches!(err, DataError::Json { .. }));
    }

    #[test]
    fn test_symptom_list_is_union_of_keys() {
        let mut data = ReferenceData::default();
        data.ontology.insert("insomnia".into(), vec![]);
        data.depressive.insert("insomnia".into(), "Trouble sleeping".into());
        data.bipolar.insert("mania".into(), "Elevated mood".into());

        assert_eq!(data.symptom_list(), vec!["insomnia", "mania"]);
    }

    #[test]
    fn test_symptom_list_skips_blank_keys() {
        let mut data = ReferenceData::default();
        data.ontology.insert("".into(), vec!["noise".into()]);
        data.schizophrenia.insert("  ".into(), "Blank".into());
        data.ontology.insert("panic".into(), vec![]);

        assert_eq!(data.symptom_list(), vec!["panic"]);
    }

    #[test]
    fn test_definition_lookup_order() {
        let mut data = ReferenceData::default();
        data.schizophrenia.insert("catatonia".into(), "".into());
        data.depressive.insert("catatonia".into(), "Motor immobility".into());
        data.bipolar.insert("catatonia".into(), "Ignored".into());

        assert_eq!(data.definition("catatonia"), Some("Motor immobility"));
        assert_eq!(data.definition("unknown"), None);
    }
}
