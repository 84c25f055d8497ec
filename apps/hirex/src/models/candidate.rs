use serde::{Deserialize, Serialize};

/// Per-job score and optional model reasoning attached to a ranked candidate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingContext {
    pub match_score: f64, // 0 – 100
    pub reasoning: Option<String>,
}

/// Validated, default-filled candidate produced by the ingestion adapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedCandidate {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub title: String,
    pub company: String,
    pub location: String,
    /// Decoded technical skills, before the merge.
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    /// Technical then soft skills; never empty.
    pub skills: Vec<String>,
    pub experience_summary: Option<String>,
    pub certifications: Option<String>,
    pub projects: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeVariant {
    Default,
    Secondary,
    Outline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityIcon {
    CheckCircle,
    Clock,
    Calendar,
    Briefcase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AvailabilityBadge {
    pub label: &'static str,
    pub variant: BadgeVariant,
    pub icon: AvailabilityIcon,
}

/// Closed set of availability classes. The backend does not report availability
/// yet, so every candidate currently gets the default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Availability {
    #[default]
    #[serde(rename = "immediate")]
    Immediate,
    #[serde(rename = "2-weeks")]
    TwoWeeks,
    #[serde(rename = "1-month")]
    OneMonth,
    #[serde(rename = "passive")]
    Passive,
}

impl Availability {
    pub fn badge(self) -> AvailabilityBadge {
        match self {
            Availability::Immediate => AvailabilityBadge {
                label: "Available Now",
                variant: BadgeVariant::Default,
                icon: AvailabilityIcon::CheckCircle,
            },
            Availability::TwoWeeks => AvailabilityBadge {
                label: "2 Weeks Notice",
                variant: BadgeVariant::Secondary,
                icon: AvailabilityIcon::Clock,
            },
            Availability::OneMonth => AvailabilityBadge {
                label: "1 Month Notice",
                variant: BadgeVariant::Outline,
                icon: AvailabilityIcon::Calendar,
            },
            Availability::Passive => AvailabilityBadge {
                label: "Open to Offers",
                variant: BadgeVariant::Outline,
                icon: AvailabilityIcon::Briefcase,
            },
        }
    }
}

/// Presentation-ready candidate. Built once per fetch and never mutated; any
/// change to the underlying data means building a new one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateViewModel {
    pub id: i64,
    pub name: String,
    pub avatar: String,
    pub email: String,
    pub phone: String,
    pub title: String,
    pub company: String,
    pub location: String,
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub skills: Vec<String>,
    pub experience_summary: Option<String>,
    pub certifications: Option<String>,
    pub projects: Option<String>,
    pub analysis: String,
    pub availability: Availability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Availability; 4] = [
        Availability::Immediate,
        Availability::TwoWeeks,
        Availability::OneMonth,
        Availability::Passive,
    ];

    #[test]
    fn test_every_availability_has_a_distinct_label() {
        let mut labels: Vec<&str> = ALL.iter().map(|a| a.badge().label).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), ALL.len());
    }

    #[test]
    fn test_default_availability_is_immediate() {
        assert_eq!(Availability::default(), Availability::Immediate);
        assert_eq!(Availability::default().badge().label, "Available Now");
    }

    #[test]
    fn test_availability_wire_names() {
        assert_eq!(
            serde_json::to_string(&Availability::TwoWeeks).unwrap(),
            "\"2-weeks\""
        );
        assert_eq!(
            serde_json::from_str::<Availability>("\"passive\"").unwrap(),
            Availability::Passive
        );
    }
}
