/// Escalated Docker image label added when "critical" appears in the text
pub const MAJOR_IMAGE_UPGRADE: &str = "Major Docker Image Upgrade";
/// Lesser counterpart removed by the "critical" escalation
pub const MINOR_IMAGE_UPGRADE: &str = "Minor Docker Image Upgrade";
/// Escalated dependency label added on repeated "the recommended version"
pub const MAJOR_DEPENDENCY_UPGRADE: &str = "Major Dependency Upgrade";
/// Lesser counterpart removed by the dependency escalation
pub const MINOR_DEPENDENCY_UPGRADE: &str = "Minor Dependency Upgrade";
/// Catch-all label produced by the single-label policy when nothing matches
pub const FALLBACK_LABEL: &str = "Uncategorized";

/// Priority tier of a label within its upgrade family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityTier {
    Major,
    Minor,
    Patch,
    Standard,
}

/// One taxonomy entry: a label name and the keyword phrases that select it
#[derive(Debug, Clone)]
pub struct LabelRule {
    pub label: String,
    pub tier: PriorityTier,
    pub keywords: Vec<String>,
}

impl LabelRule {
    pub fn new(label: &str, tier: PriorityTier, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            tier,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// The fixed, ordered table of recognized labels. Order matters for the
/// single-label first-match policy; tests may substitute a smaller table.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    pub rules: Vec<LabelRule>,
    pub fallback: String,
}

impl Taxonomy {
    pub fn new(rules: Vec<LabelRule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// Whether the table declares the given label
    pub fn contains(&self, label: &str) -> bool {
        self.rules.iter().any(|rule| rule.label == label)
    }

    /// Label names in declared order, fallback last
    pub fn label_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.iter().map(|rule| rule.label.as_str()).collect();
        names.push(self.fallback.as_str());
        names
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::new(
            vec![
                LabelRule::new(
                    MAJOR_IMAGE_UPGRADE,
                    PriorityTier::Major,
                    &[
                        "Docker base image uptodate",
                        "upgrade to alpinelatest",
                        "latest version of your chosen image",
                        "Docker image upgrade",
                        "image security",
                        "critical",
                    ],
                ),
                LabelRule::new(
                    MINOR_IMAGE_UPGRADE,
                    PriorityTier::Minor,
                    &[
                        "Docker base image uptodate",
                        "upgrade to alpinelatest",
                        "latest version of your chosen image",
                        "Docker image upgrade",
                        "image security",
                    ],
                ),
                LabelRule::new(
                    MAJOR_DEPENDENCY_UPGRADE,
                    PriorityTier::Major,
                    &[
                        "breaking change",
                        "major version",
                        "upgrade to version 3.0.0",
                        "major upgrade",
                        "version 3.x",
                        "Keep your dependencies uptodate",
                        "The recommended version",
                        "dependencies",
                    ],
                ),
                LabelRule::new(
                    MINOR_DEPENDENCY_UPGRADE,
                    PriorityTier::Minor,
                    &[
                        "new features",
                        "minor version",
                        "upgrade to version 2.x.x",
                        "minor upgrade",
                        "minor release",
                        "new functionality",
                        "The recommended version",
                    ],
                ),
                LabelRule::new(
                    "Patch Dependency Upgrade",
                    PriorityTier::Patch,
                    &[
                        "bug fixes",
                        "patch version",
                        "upgrade to version 2.11.x",
                        "patch upgrade",
                        "bugfix release",
                    ],
                ),
                LabelRule::new(
                    "Configuration Change",
                    PriorityTier::Standard,
                    &[
                        "quality assurance",
                        "integration testing",
                        "test coverage",
                        "automated testing",
                        "test results",
                        "CI test",
                        "configuration change",
                        "Docker config change",
                        "modify configuration",
                        "change Docker settings",
                        "configuration update",
                        "settings change",
                        "vulnerable packages",
                        "packages",
                    ],
                ),
                LabelRule::new(
                    "Storage Issue Fix",
                    PriorityTier::Standard,
                    &[
                        "fixing the storage problem",
                        "addressing storage concerns",
                        "resolving storage issues",
                        "correcting data storage",
                        "enhancing storage security",
                        "mitigating storage challenges",
                        "upgrading data storage",
                        "protecting sensitive data",
                        "storage",
                        "storage issues",
                        "storage issue",
                    ],
                ),
                LabelRule::new(
                    "Permission Change",
                    PriorityTier::Standard,
                    &[
                        "Incorrect Permission Assignment",
                        "update of permission settings",
                        "change in user access rights",
                        "modification of authorization parameters",
                        "user permission update",
                        "revision of access control",
                        "Permission",
                    ],
                ),
            ],
            FALLBACK_LABEL,
        )
    }
}
