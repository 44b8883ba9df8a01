//! Startup data: the reference catalog and roster, and catalog file loading.

use std::{fs, path::Path};

use thiserror::Error;

use crate::{
    domain::{
        Catalog, CatalogError, ProblemId, ProblemStatement, Roster, RosterError, TeamId,
        TeamName, ValueObjectError,
    },
    infrastructure::dto::websocket::ProblemStatementDto,
};

/// Errors raised while preparing startup data
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read catalog file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Roster(#[from] RosterError),
}

fn problem(
    id: &str,
    title: &str,
    description: &str,
    tasks: [&str; 3],
) -> Result<ProblemStatement, SeedError> {
    Ok(ProblemStatement::new(
        ProblemId::try_from(id)?,
        title.to_string(),
        description.to_string(),
        tasks.iter().map(|t| t.to_string()).collect(),
    ))
}

/// The three built-in problem statements
pub fn reference_catalog() -> Result<Catalog, SeedError> {
    let problems = vec![
        problem(
            "p1",
            "Smart Attendance System",
            "Build an attendance system using face recognition or QR codes.",
            [
                "Design architecture and wireframes",
                "Implement authentication & attendance capture",
                "Demo with sample dataset and edge case handling",
            ],
        )?,
        problem(
            "p2",
            "Budget Buddy",
            "Create a personal budgeting web app with expense categories.",
            [
                "Create UI and data model",
                "Implement add/edit/delete transactions",
                "Add summary graphs and export feature",
            ],
        )?,
        problem(
            "p3",
            "Campus Events Planner",
            "Build a small event planner where students can propose and RSVP to events.",
            [
                "Design event creation flow",
                "Implement RSVP and notifications",
                "Add admin view for approvals and schedule",
            ],
        )?,
    ];
    Ok(Catalog::new(problems)?)
}

/// Roster of `count` teams named `Team 1`..`Team N` with ids `team-1`..`team-N`
pub fn seed_roster(count: usize) -> Result<Roster, SeedError> {
    let mut roster = Roster::new();
    for i in 1..=count {
        roster.add_team(
            TeamId::new(format!("team-{}", i))?,
            TeamName::new(format!("Team {}", i))?,
        )?;
    }
    Ok(roster)
}

/// Parse a catalog from a JSON array of problem statements
pub fn parse_catalog(json: &str, origin: &str) -> Result<Catalog, SeedError> {
    let dtos: Vec<ProblemStatementDto> =
        serde_json::from_str(json).map_err(|source| SeedError::Parse {
            path: origin.to_string(),
            source,
        })?;
    let problems = dtos
        .into_iter()
        .map(ProblemStatement::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Catalog::new(problems)?)
}

/// Load a catalog from a JSON file
pub fn load_catalog(path: &Path) -> Result<Catalog, SeedError> {
    let origin = path.display().to_string();
    let json = fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: origin.clone(),
        source,
    })?;
    parse_catalog(&json, &origin)
}
