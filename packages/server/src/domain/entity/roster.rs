//! Team roster and the per-team task approval workflow.
//!
//! A team gets one task list per problem it has ever selected. Switching
//! problems keeps earlier lists, so going back to a problem restores its
//! progress. Teams are never removed.

use std::collections::BTreeMap;

use crate::domain::{
    entity::catalog::ProblemStatement,
    error::RosterError,
    value_object::{ProblemId, TaskIndex, TeamId, TeamName},
};

/// Visual state of a task; `approved` and `requested` are never both set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    NotStarted,
    Requested,
    Approved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub index: TaskIndex,
    /// Copied from the problem statement when the task list was created
    pub text: String,
    pub requested: bool,
    pub approved: bool,
}

impl Task {
    fn new(index: TaskIndex, text: String) -> Self {
        Self {
            index,
            text,
            requested: false,
            approved: false,
        }
    }

    pub fn status(&self) -> TaskStatus {
        if self.approved {
            TaskStatus::Approved
        } else if self.requested {
            TaskStatus::Requested
        } else {
            TaskStatus::NotStarted
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: TeamId,
    pub name: TeamName,
    pub selected_problem_id: Option<ProblemId>,
    pub tasks: BTreeMap<ProblemId, Vec<Task>>,
}

impl Team {
    pub fn new(id: TeamId, name: TeamName) -> Self {
        Self {
            id,
            name,
            selected_problem_id: None,
            tasks: BTreeMap::new(),
        }
    }

    /// Task list of the currently selected problem
    pub fn current_tasks(&self) -> Option<&[Task]> {
        let problem_id = self.selected_problem_id.as_ref()?;
        self.tasks.get(problem_id).map(Vec::as_slice)
    }

    fn current_task_mut(&mut self, index: TaskIndex) -> Result<&mut Task, RosterError> {
        let Some(problem_id) = self.selected_problem_id.as_ref() else {
            return Err(RosterError::NoProblemSelected(self.id.as_str().to_string()));
        };
        self.tasks
            .get_mut(problem_id)
            .and_then(|tasks| tasks.iter_mut().find(|t| t.index == index))
            .ok_or_else(|| RosterError::TaskNotFound {
                team_id: self.id.as_str().to_string(),
                index: index.value(),
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    teams: Vec<Team>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn find(&self, team_id: &TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| &t.id == team_id)
    }

    fn find_mut(&mut self, team_id: &TeamId) -> Result<&mut Team, RosterError> {
        self.teams
            .iter_mut()
            .find(|t| &t.id == team_id)
            .ok_or_else(|| RosterError::TeamNotFound(team_id.as_str().to_string()))
    }

    /// Append a team with no selection and no task lists
    pub fn add_team(&mut self, id: TeamId, name: TeamName) -> Result<(), RosterError> {
        if self.find(&id).is_some() {
            return Err(RosterError::DuplicateTeamId(id.into_string()));
        }
        self.teams.push(Team::new(id, name));
        Ok(())
    }

    /// Point a team at `problem`, creating its task list on first visit
    ///
    /// Selecting the problem the team is already on changes nothing and is rejected.
    pub fn select_problem(
        &mut self,
        team_id: &TeamId,
        problem: &ProblemStatement,
    ) -> Result<(), RosterError> {
        let team = self.find_mut(team_id)?;
        if team.selected_problem_id.as_ref() == Some(&problem.id) {
            return Err(RosterError::ProblemAlreadySelected {
                team_id: team.id.as_str().to_string(),
                problem_id: problem.id.as_str().to_string(),
            });
        }
        team.selected_problem_id = Some(problem.id.clone());
        team.tasks.entry(problem.id.clone()).or_insert_with(|| {
            problem
                .tasks
                .iter()
                .enumerate()
                .map(|(position, text)| Task::new(TaskIndex::from_position(position), text.clone()))
                .collect()
        });
        Ok(())
    }

    /// Mark a task of the team's current problem as waiting for approval
    pub fn request_task_approval(
        &mut self,
        team_id: &TeamId,
        index: TaskIndex,
    ) -> Result<(), RosterError> {
        let team = self.find_mut(team_id)?;
        let team_id = team.id.as_str().to_string();
        let task = team.current_task_mut(index)?;
        if task.approved {
            return Err(RosterError::TaskAlreadyApproved {
                team_id,
                index: index.value(),
            });
        }
        if task.requested {
            return Err(RosterError::TaskAlreadyRequested {
                team_id,
                index: index.value(),
            });
        }
        task.requested = true;
        Ok(())
    }

    /// Approve a task of the team's current problem, with or without a prior request
    ///
    /// An approved task stays approved; approving it again is rejected as a no-op.
    pub fn approve_task(&mut self, team_id: &TeamId, index: TaskIndex) -> Result<(), RosterError> {
        let team = self.find_mut(team_id)?;
        let team_id = team.id.as_str().to_string();
        let task = team.current_task_mut(index)?;
        if task.approved {
            return Err(RosterError::TaskAlreadyApproved {
                team_id,
                index: index.value(),
            });
        }
        task.approved = true;
        task.requested = false;
        Ok(())
    }
}
