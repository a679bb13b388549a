use crate::config::LabelPolicy;
use crate::error::Result;
use crate::taxonomy::{
    Taxonomy, MAJOR_DEPENDENCY_UPGRADE, MAJOR_IMAGE_UPGRADE, MINOR_DEPENDENCY_UPGRADE,
    MINOR_IMAGE_UPGRADE,
};
use crate::types::AssignedLabels;
use regex::Regex;

/// Repeated occurrences of this phrase escalate a dependency upgrade
const RECOMMENDED_VERSION_PHRASE: &str = "the recommended version";

/// Deterministic keyword classifier over a fixed label taxonomy.
///
/// Supports two policies: independent whole-phrase matching that can assign
/// several labels, and a first-match walk that always assigns exactly one.
#[derive(Debug)]
pub struct LabelClassifier {
    taxonomy: Taxonomy,
    policy: LabelPolicy,
    /// Word-boundary matchers per rule, parallel to `taxonomy.rules`
    phrase_matchers: Vec<Vec<Regex>>,
    /// Lowercased phrases per rule for plain substring containment
    substring_phrases: Vec<Vec<String>>,
    critical_re: Regex,
}

impl LabelClassifier {
    pub fn new(taxonomy: Taxonomy, policy: LabelPolicy) -> Result<Self> {
        let mut phrase_matchers = Vec::with_capacity(taxonomy.rules.len());
        let mut substring_phrases = Vec::with_capacity(taxonomy.rules.len());

        for rule in &taxonomy.rules {
            let mut matchers = Vec::with_capacity(rule.keywords.len());
            let mut phrases = Vec::with_capacity(rule.keywords.len());
            for keyword in &rule.keywords {
                let phrase = normalize_for_match(keyword);
                matchers.push(Regex::new(&format!(r"\b{}\b", regex::escape(&phrase)))?);
                phrases.push(phrase);
            }
            phrase_matchers.push(matchers);
            substring_phrases.push(phrases);
        }

        Ok(Self {
            taxonomy,
            policy,
            phrase_matchers,
            substring_phrases,
            critical_re: Regex::new(r"\bcritical\b")?,
        })
    }

    pub fn policy(&self) -> LabelPolicy {
        self.policy
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Classify a text blob according to the configured policy
    pub fn classify(&self, text: &str) -> AssignedLabels {
        let normalized = normalize_for_match(text);
        match self.policy {
            LabelPolicy::MultiLabel => AssignedLabels::Multi(self.classify_multi(&normalized)),
            LabelPolicy::SingleLabel => AssignedLabels::Single(self.classify_single(&normalized)),
        }
    }

    /// Independent whole-phrase test per label, then the escalation overrides
    fn classify_multi(&self, text: &str) -> Vec<String> {
        let mut labels: Vec<String> = Vec::new();

        for (rule, matchers) in self.taxonomy.rules.iter().zip(&self.phrase_matchers) {
            if matchers.iter().any(|m| m.is_match(text)) && !labels.contains(&rule.label) {
                labels.push(rule.label.clone());
            }
        }

        if self.taxonomy.contains(MAJOR_IMAGE_UPGRADE) && self.critical_re.is_match(text) {
            escalate(&mut labels, MAJOR_IMAGE_UPGRADE, MINOR_IMAGE_UPGRADE);
        }

        if self.taxonomy.contains(MAJOR_DEPENDENCY_UPGRADE)
            && text.matches(RECOMMENDED_VERSION_PHRASE).count() > 1
        {
            escalate(&mut labels, MAJOR_DEPENDENCY_UPGRADE, MINOR_DEPENDENCY_UPGRADE);
        }

        labels
    }

    /// Walk the table in declared order; first containment hit wins
    fn classify_single(&self, text: &str) -> String {
        for (rule, phrases) in self.taxonomy.rules.iter().zip(&self.substring_phrases) {
            if phrases.iter().any(|phrase| text.contains(phrase.as_str())) {
                return rule.label.clone();
            }
        }
        self.taxonomy.fallback.clone()
    }
}

/// Replace the lesser label with its escalated counterpart
fn escalate(labels: &mut Vec<String>, major: &str, minor: &str) {
    labels.retain(|label| label != minor);
    if !labels.iter().any(|label| label == major) {
        labels.push(major.to_string());
    }
}

/// Lowercase and collapse whitespace so table formatting differences never
/// cause false negatives. Applied identically to text and keyword phrases.
fn normalize_for_match(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
