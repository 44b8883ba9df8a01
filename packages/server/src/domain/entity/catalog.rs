//! Problem statement catalog.
//!
//! Supplied once at startup and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::domain::{error::CatalogError, value_object::ProblemId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemStatement {
    pub id: ProblemId,
    pub title: String,
    pub description: String,
    /// Task descriptions; position `n` is task index `n + 1`
    pub tasks: Vec<String>,
}

impl ProblemStatement {
    pub fn new(id: ProblemId, title: String, description: String, tasks: Vec<String>) -> Self {
        Self {
            id,
            title,
            description,
            tasks,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    problems: Vec<ProblemStatement>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate problem ids
    pub fn new(problems: Vec<ProblemStatement>) -> Result<Self, CatalogError> {
        for (i, problem) in problems.iter().enumerate() {
            if problems[..i].iter().any(|p| p.id == problem.id) {
                return Err(CatalogError::DuplicateProblemId(
                    problem.id.as_str().to_string(),
                ));
            }
        }
        Ok(Self { problems })
    }

    pub fn find(&self, id: &ProblemId) -> Option<&ProblemStatement> {
        self.problems.iter().find(|p| &p.id == id)
    }

    pub fn problems(&self) -> &[ProblemStatement] {
        &self.problems
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}
