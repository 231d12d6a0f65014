//! Invitable profile search.

pub mod service;

pub use service::CandidateSearchService;
