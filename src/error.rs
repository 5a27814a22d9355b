//! Typed failures surfaced to callers of the lookup and submission paths.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("team number is empty")]
    EmptyTeam,
    /// The store answered, but holds no match or pit records for the team.
    #[error("team {0} not found")]
    TeamNotFound(String),
    /// The store could not be reached or returned a bad response.
    #[error("record store error: {0:#}")]
    Store(#[source] anyhow::Error),
}

impl LookupError {
    /// One-line message shown by the CLI when a lookup fails.
    pub fn user_message(&self) -> String {
        match self {
            LookupError::EmptyTeam => "Enter a team number to look up".to_string(),
            LookupError::TeamNotFound(team) => {
                format!("Team {team} not found: no match or pit records")
            }
            LookupError::Store(e) => format!("Could not reach the record store: {e:#}"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("team number is required")]
    MissingTeamNumber,
    #[error("record store error: {0:#}")]
    Store(#[source] anyhow::Error),
}
