// Brand guideline documents: storage, AI summarisation and listing.
// Summaries feed the brand context of every later generation call.

pub mod handlers;
pub mod ingest;
pub mod prompts;
pub mod repository;
