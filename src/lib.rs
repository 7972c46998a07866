pub mod cli;
pub mod comment;
pub mod error;
pub mod exclude;
pub mod gate;
pub mod github;
pub mod ingest;
pub mod model;
pub mod parsers;
