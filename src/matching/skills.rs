// Coping skill matching

use std::collections::HashSet;

use crate::data::CopingSkill;

/// Rendered when no skill matched the message
pub const NO_SKILLS_MATCHED: &str = "No specific coping skills matched.";

/// Skills sharing at least one tag with `tags`, in skill order
pub fn match_skills<'a>(tags: &[String], skills: &'a [CopingSkill]) -> Vec<&'a CopingSkill> {
    let wanted: HashSet<&str> = tags.iter().map(String::as_str).collect();

    skills
        .iter()
        .filter(|skill| skill.tags.iter().any(|tag| wanted.contains(tag.as_str())))
        .collect()
}

/// `- skill: description` lines for the first `limit` skills
pub fn skills_text(skills: &[&CopingSkill], limit: usize) -> String {
    let lines: Vec<String> = skills
        .iter()
        .take(limit)
        .map(|s| format!("- {}: {}", s.skill, s.description))
        .collect();

    if lines.is_empty() {
        NO_SKILLS_MATCHED.to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(name: &str, tags: &[&str]) -> CopingSkill {
        CopingSkill {
            skill: name.to_string(),
            description: format!("{} description", name),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_match_requires_non_empty_intersection() {
        let skills = vec![
            skill("Breathing", &["stress", "panic"]),
            skill("Journaling", &["mood"]),
            skill("Untagged", &[]),
            skill("Sleep hygiene", &["sleep"]),
        ];
        let tags = vec!["sleep".to_string(), "panic".to_string()];

        let matched: Vec<&str> = match_skills(&tags, &skills)
            .iter()
            .map(|s| s.skill.as_str())
            .collect();
        assert_eq!(matched, vec!["Breathing", "Sleep hygiene"]);
    }

    #[test]
    fn test_match_with_no_tags() {
        let skills = vec![skill("Breathing", &["stress"])];
        assert!(match_skills(&[], &skills).is_empty());
    }

    #[test]
    fn test_skills_text_respects_limit() {
        let skills = vec![
            skill("A", &["x"]),
            skill("B", &["x"]),
            skill("C", &["x"]),
            skill("D", &["x"]),
        ];
        let refs: Vec<&CopingSkill> = skills.iter().collect();

        let text = skills_text(&refs, 3);
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("- A: A description"));
        assert!(!text.contains("- D"));
    }

    #[test]
    fn test_skills_text_fallback() {
        assert_eq!(skills_text(&[], 3), NO_SKILLS_MATCHED);
    }
}
