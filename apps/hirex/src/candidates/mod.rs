// Candidate pipeline: raw backend record -> normalized candidate -> view model.
// Everything here is synchronous and pure; network I/O lives in `backend`.

pub mod ingest;
pub mod narrative;
pub mod search;
pub mod view_model;
