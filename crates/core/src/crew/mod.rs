//! Crews: roles plus ordered tasks, and the engine that runs them.
//!
//! A [`CrewDefinition`] names its roles; [`build_crew`] resolves them against
//! the loaded [`Role`]s, fills in the product query and checks the task graph.
//! The resulting [`Crew`] is handed to [`CrewEngine`].

pub mod builtin;
pub mod engine;
pub mod error;

pub use builtin::{default_roles, merge_roles, price_comparison_definition};
pub use engine::CrewEngine;
pub use error::CrewError;

use ps_protocol::{Crew, CrewDefinition, Role, TaskSpec};
use std::collections::HashSet;

/// Placeholder in task descriptions replaced with the product query.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// Resolve a crew declaration into a runnable crew for `query`.
///
/// # Errors
///
/// - `NoTasks` when the crew declares no tasks
/// - `UnknownAgent` when the crew or a task names a role that is missing
/// - `DuplicateTaskId` when two tasks share an id
/// - `InvalidContext` when a task's context is not an earlier task
pub fn build_crew(
    definition: &CrewDefinition,
    roles: &[Role],
    query: &str,
) -> Result<Crew, CrewError> {
    if definition.tasks.is_empty() {
        return Err(CrewError::NoTasks(definition.name.clone()));
    }

    let members = definition
        .agents
        .iter()
        .map(|name| {
            roles
                .iter()
                .find(|role| &role.name == name)
                .cloned()
                .ok_or_else(|| CrewError::UnknownAgent {
                    agent: name.clone(),
                    referenced_by: format!("crew '{}'", definition.name),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut seen = HashSet::new();
    let mut tasks = Vec::with_capacity(definition.tasks.len());
    for task in &definition.tasks {
        if !definition.agents.contains(&task.agent) {
            return Err(CrewError::UnknownAgent {
                agent: task.agent.clone(),
                referenced_by: format!("task '{}'", task.id),
            });
        }
        if let Some(context) = task.context.iter().find(|id| !seen.contains(id.as_str())) {
            return Err(CrewError::InvalidContext {
                task: task.id.clone(),
                context: context.clone(),
            });
        }
        if !seen.insert(task.id.as_str()) {
            return Err(CrewError::DuplicateTaskId(task.id.clone()));
        }

        tasks.push(TaskSpec {
            description: task.description.replace(QUERY_PLACEHOLDER, query),
            ..task.clone()
        });
    }

    Ok(Crew {
        name: definition.name.clone(),
        roles: members,
        tasks,
    })
}

/// The built-in price comparison crew for `query`, with `roles` overriding
/// the default roles of the same name.
pub fn price_comparison_crew(query: &str, roles: &[Role]) -> Result<Crew, CrewError> {
    let roles = merge_roles(default_roles(), roles);
    build_crew(&price_comparison_definition(), &roles, query)
}
