// Local symptom and coping-skill matching

mod skills;
mod symptoms;

pub use skills::{match_skills, skills_text, NO_SKILLS_MATCHED};
pub use symptoms::{extract_symptoms, get_symptom_tags};

use serde::Serialize;

use crate::data::{CopingSkill, ReferenceData};

/// Result of matching one message against the reference data
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchReport {
    pub symptoms: Vec<String>,
    pub tags: Vec<String>,
    #[serde(skip)]
    pub skills: Vec<CopingSkill>,
}

impl MatchReport {
    pub fn has_symptoms(&self) -> bool {
        !self.symptoms.is_empty()
    }

    /// Rendered coping skills, at most `limit`
    pub fn skills_text(&self, limit: usize) -> String {
        let refs: Vec<&CopingSkill> = self.skills.iter().collect();
        skills_text(&refs, limit)
    }
}

/// Extract symptoms, their tags and the matching coping skills
pub fn analyze(message: &str, data: &ReferenceData) -> MatchReport {
    let symptoms = extract_symptoms(message, &data.symptom_list());
    let tags = get_symptom_tags(&symptoms, &data.ontology);
    let skills = match_skills(&tags, &data.coping_skills)
        .into_iter()
        .cloned()
        .collect();

    tracing::debug!(?symptoms, ?tags, "Matched message against reference data");

    MatchReport {
        symptoms,
        tags,
        skills,
    }
}
