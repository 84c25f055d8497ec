use crate::candidates::ingest::normalize;
use crate::candidates::narrative::synthesize;
use crate::models::candidate::{
    Availability, CandidateViewModel, NormalizedCandidate, RankingContext,
};
use crate::models::raw::{RankedRecord, RawCandidateRecord};

/// Composes a normalized candidate and its synthesized analysis into the final view model.
pub fn build(normalized: NormalizedCandidate, ranking: Option<&RankingContext>) -> CandidateViewModel {
    let analysis = synthesize(&normalized, ranking);
    let avatar = avatar_initials(&normalized.name);

    CandidateViewModel {
        id: normalized.id,
        name: normalized.name,
        avatar,
        email: normalized.email,
        phone: normalized.phone,
        title: normalized.title,
        company: normalized.company,
        location: normalized.location,
        technical_skills: normalized.technical_skills,
        soft_skills: normalized.soft_skills,
        skills: normalized.skills,
        experience_summary: normalized.experience_summary,
        certifications: normalized.certifications,
        projects: normalized.projects,
        analysis,
        // no availability signal from the backend yet
        availability: Availability::default(),
        match_score: ranking.map(|r| r.match_score),
    }
}

/// First two characters of the display name, upper-cased. Characters whose
/// upper case expands (`ß` -> `SS`) still yield at most two letters.
pub fn avatar_initials(name: &str) -> String {
    name.chars().flat_map(char::to_uppercase).take(2).collect()
}

/// Maps an unranked `GET /candidates` payload.
pub fn build_collection(records: Vec<RawCandidateRecord>) -> Vec<CandidateViewModel> {
    records
        .into_iter()
        .map(|raw| build(normalize(raw), None))
        .collect()
}

/// Maps a ranked `GET /jobs/{id}/candidates` payload, keeping backend order.
pub fn build_ranked(records: Vec<RankedRecord>) -> Vec<CandidateViewModel> {
    records
        .into_iter()
        .map(|record| {
            let (raw, ranking) = record.into_parts();
            build(normalize(raw), Some(&ranking))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::ingest::{NO_SKILLS, UNKNOWN_NAME};
    use crate::candidates::narrative::FALLBACK_ANALYSIS;
    use serde_json::json;

    #[test]
    fn test_end_to_end_ranked_candidate() {
        let raw = RawCandidateRecord::from_value(json!({
            "id": 7,
            "name": "ana lee",
            "skills": "[\"Go\",\"SQL\"]",
            "soft_skills": "[]",
            "experience_summary": null,
        }));
        let ranking = RankingContext {
            match_score: 82.3,
            reasoning: None,
        };
        let vm = build(normalize(raw), Some(&ranking));

        assert_eq!(vm.id, 7);
        assert_eq!(vm.avatar, "AN");
        assert_eq!(vm.skills, vec!["Go", "SQL"]);
        assert!(vm.analysis.contains("Go, SQL"));
        let last_sentence = vm.analysis.rsplit(". ").next().unwrap();
        assert!(last_sentence.contains("82.3%"));
        assert!(last_sentence.contains("highly recommended"));
        assert_eq!(vm.match_score, Some(82.3));
    }

    #[test]
    fn test_unranked_candidate_has_no_match_score() {
        let vm = build(normalize(RawCandidateRecord::default()), None);
        assert_eq!(vm.match_score, None);
        assert_eq!(vm.name, UNKNOWN_NAME);
        assert_eq!(vm.avatar, "UN");
        assert_eq!(vm.skills, vec![NO_SKILLS]);
        assert_eq!(vm.analysis, FALLBACK_ANALYSIS);
        assert_eq!(vm.availability, Availability::Immediate);
    }

    #[test]
    fn test_zero_score_is_kept_not_omitted() {
        let ranking = RankingContext::default();
        let vm = build(normalize(RawCandidateRecord::default()), Some(&ranking));
        assert_eq!(vm.match_score, Some(0.0));
    }

    #[test]
    fn test_avatar_initials() {
        assert_eq!(avatar_initials("ana lee"), "AN");
        assert_eq!(avatar_initials("Dr. Carol Williams"), "DR");
        assert_eq!(avatar_initials("é"), "É");
        assert_eq!(avatar_initials("Unknown Candidate"), "UN");
    }

    #[test]
    fn test_avatar_initials_never_exceed_two_letters() {
        assert_eq!(avatar_initials("ßa"), "SS");
        assert_eq!(avatar_initials("aß"), "AS");
    }

    #[test]
    fn test_analysis_is_never_empty() {
        let records = vec![
            RawCandidateRecord::from_value(json!({})),
            RawCandidateRecord::from_value(json!({ "skills": "[\"Go\"]" })),
            RawCandidateRecord::from_value(json!({ "projects": "" })),
        ];
        for vm in build_collection(records) {
            assert!(!vm.analysis.is_empty());
        }
    }

    #[test]
    fn test_build_ranked_preserves_order_and_reasoning() {
        let records = vec![
            RankedRecord::from_value(json!({
                "candidate": { "id": 2, "name": "Bob Smith" },
                "match_score": 91.0,
                "reasoning": "Deep SQL and reporting background fits the analyst role.",
            })),
            RankedRecord::from_value(json!({
                "candidate": { "id": 1, "name": "Alice Johnson" },
                "match_score": 35.5,
                "reasoning": "",
            })),
        ];
        let vms = build_ranked(records);
        assert_eq!(vms.iter().map(|v| v.id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(
            vms[0].analysis,
            "Deep SQL and reporting background fits the analyst role."
        );
        assert!(vms[1].analysis.contains("35.5%"));
        assert!(vms[1].analysis.contains("may require additional training"));
    }
}
