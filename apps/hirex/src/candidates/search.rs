use crate::models::candidate::CandidateViewModel;

/// Case-insensitive substring match against name, title, company, location and
/// every skill. An empty query matches everything. The input collection is never
/// modified.
pub fn filter<'a>(candidates: &'a [CandidateViewModel], query: &str) -> Vec<&'a CandidateViewModel> {
    let query = query.to_lowercase();
    candidates
        .iter()
        .filter(|c| matches_lowered(c, &query))
        .collect()
}

fn matches_lowered(candidate: &CandidateViewModel, query: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(query);

    contains(&candidate.name)
        || contains(&candidate.title)
        || contains(&candidate.company)
        || contains(&candidate.location)
        || candidate.skills.iter().any(|s| contains(s))
}
