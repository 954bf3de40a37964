mod github;

pub use github::{GitHubProvider, PageLimits, RunFilter, StepSelector};
