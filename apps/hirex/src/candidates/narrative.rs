//! Narrative synthesis: a deterministic analysis paragraph for candidates that
//! arrive without usable upstream reasoning.
//!
//! Sentence order is fixed:
//! 1. upstream reasoning longer than 20 characters is returned verbatim
//! 2. technical skills (first three, plus a remainder count)
//! 3. soft skills (first two), or else the start of the experience summary
//! 4. highlights: projects and/or certifications
//! 5. match-score tier
//!
//! When steps 2–5 all come up empty the fixed fallback is returned.

use crate::models::candidate::{NormalizedCandidate, RankingContext};

pub const FALLBACK_ANALYSIS: &str =
    "Profile analysis pending. Upload additional details for comprehensive evaluation.";

const MIN_REASONING_CHARS: usize = 20;
const NAMED_SKILLS: usize = 3;
const NAMED_SOFT_SKILLS: usize = 2;
const EXPERIENCE_QUOTE_CHARS: usize = 100;

/// Qualitative band for a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    HighlyRecommended, // ≥ 70
    PotentialFit,      // 40 – 69.9
    NeedsTraining,     // < 40
}

impl MatchTier {
    /// `None` when there is no score to talk about (0, negative or NaN).
    pub fn from_score(score: f64) -> Option<Self> {
        if score.is_nan() || score <= 0.0 {
            return None;
        }
        Some(if score >= 70.0 {
            MatchTier::HighlyRecommended
        } else if score >= 40.0 {
            MatchTier::PotentialFit
        } else {
            MatchTier::NeedsTraining
        })
    }

    fn sentence(self, score: f64) -> String {
        match self {
            MatchTier::HighlyRecommended => {
                format!("Match score of {score:.1}% makes this candidate highly recommended.")
            }
            MatchTier::PotentialFit => format!(
                "Match score of {score:.1}% indicates a good potential fit with gaps to explore."
            ),
            MatchTier::NeedsTraining => format!(
                "Match score of {score:.1}% suggests the candidate may require additional training."
            ),
        }
    }
}

pub fn synthesize(candidate: &NormalizedCandidate, ranking: Option<&RankingContext>) -> String {
    if let Some(reasoning) = ranking.and_then(|r| r.reasoning.as_deref()) {
        if reasoning.chars().count() > MIN_REASONING_CHARS {
            return reasoning.to_string();
        }
    }

    let sentences: Vec<String> = [
        skills_sentence(&candidate.technical_skills),
        soft_skills_or_experience_sentence(
            &candidate.soft_skills,
            candidate.experience_summary.as_deref(),
        ),
        highlights_sentence(
            candidate.projects.as_deref(),
            candidate.certifications.as_deref(),
        ),
        ranking.and_then(|r| score_sentence(r.match_score)),
    ]
    .into_iter()
    .flatten()
    .collect();

    if sentences.is_empty() {
        return FALLBACK_ANALYSIS.to_string();
    }
    sentences.join(" ")
}

fn skills_sentence(skills: &[String]) -> Option<String> {
    if skills.is_empty() {
        return None;
    }
    let named = skills
        .iter()
        .take(NAMED_SKILLS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let remaining = skills.len().saturating_sub(NAMED_SKILLS);
    Some(match remaining {
        0 => format!("Demonstrates proficiency in {named}."),
        1 => format!("Demonstrates proficiency in {named}, plus 1 more technical skill."),
        n => format!("Demonstrates proficiency in {named}, plus {n} more technical skills."),
    })
}

fn soft_skills_or_experience_sentence(
    soft_skills: &[String],
    experience_summary: Option<&str>,
) -> Option<String> {
    if !soft_skills.is_empty() {
        let named = soft_skills
            .iter()
            .take(NAMED_SOFT_SKILLS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" and ");
        return Some(format!(
            "Soft skills such as {named} indicate strong collaboration ability."
        ));
    }
    let summary = experience_summary.filter(|s| !s.is_empty())?;
    let quote: String = summary.chars().take(EXPERIENCE_QUOTE_CHARS).collect();
    Some(format!("Experience: {quote}..."))
}

fn highlights_sentence(projects: Option<&str>, certifications: Option<&str>) -> Option<String> {
    let mut highlights = Vec::new();
    if projects.is_some_and(|p| !p.is_empty()) {
        highlights.push("hands-on project experience");
    }
    if certifications.is_some_and(|c| !c.is_empty()) {
        highlights.push("relevant certifications");
    }
    if highlights.is_empty() {
        return None;
    }
    Some(format!("Profile highlights {}.", highlights.join(" and ")))
}

fn score_sentence(score: f64) -> Option<String> {
    MatchTier::from_score(score).map(|tier| tier.sentence(score))
}
