//! GitHub REST API adapter.

pub mod client;

pub use client::GithubClientImpl;
