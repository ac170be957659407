// Symptom extraction and ontology tag lookup

use std::collections::HashSet;

use crate::data::Ontology;

/// Symptoms whose lowercase form occurs in the lowercase message
///
/// Input order is preserved and duplicates in `symptoms` are kept as-is.
pub fn extract_symptoms(message: &str, symptoms: &[String]) -> Vec<String> {
    let message_lower = message.to_lowercase();

    symptoms
        .iter()
        .filter(|symptom| message_lower.contains(&symptom.to_lowercase()))
        .cloned()
        .collect()
}

/// Union of the ontology tags of `symptoms`, first-seen order, no duplicates
///
/// Symptoms absent from the ontology contribute nothing.
pub fn get_symptom_tags(symptoms: &[String], ontology: &Ontology) -> Vec<String> {
    let mut seen = HashSet::new();

    symptoms
        .iter()
        .filter_map(|symptom| ontology.get(symptom))
        .flatten()
        .filter(|tag| seen.insert(tag.as_str()))
        .cloned()
        .collect()
}
