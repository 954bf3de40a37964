mod aggregator;
mod classifier;
mod client;
mod duration;
mod provider;
mod types;


pub use aggregator::PageLimits;
pub use classifier::StepSelector;
pub use client::RunFilter;
pub use provider::GitHubProvider;
