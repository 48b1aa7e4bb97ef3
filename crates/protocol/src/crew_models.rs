//! Role, task and crew declarations.
//!
//! Roles are loaded from `.price-scout/agents/*.md` (YAML front matter plus a
//! Markdown body holding the backstory) and crews from
//! `.price-scout/crews/*.yaml`. Both are plain immutable records; the crew
//! engine in `ps-core` is what gives them behavior.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::markup_models::MarkupColor;

/// A named role an agent plays in a crew.
///
/// # Example
///
/// ```markdown
/// ---
/// name: Price Analyzer
/// goal: Analyze prices from different sources and provide insights on the best options.
/// color: green
/// allow-delegation: true
/// ---
///
/// Specialist in comparing prices and identifying the best deals.
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct Role {
    /// Role name. Also the text the annotator colors in the agent log.
    pub name: String,

    /// What the role is trying to achieve.
    pub goal: String,

    /// Background given to the model as part of its system prompt.
    ///
    /// For Markdown role files this comes from the file body.
    #[serde(default)]
    pub backstory: String,

    /// Color used when the role name shows up in the agent log.
    #[serde(default)]
    pub color: Option<MarkupColor>,

    /// Whether the role may hand work to other roles.
    #[serde(default)]
    pub allow_delegation: bool,
}

/// One unit of work in a crew, performed by a single role.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct TaskSpec {
    /// Identifier other tasks use to list this task as context.
    pub id: String,

    /// Instruction text. `{query}` is replaced with the product being searched.
    pub description: String,

    /// Description of the answer the role must produce.
    pub expected_output: String,

    /// Name of the role that performs this task.
    pub agent: String,

    /// Ids of earlier tasks whose outputs are passed along as context.
    #[serde(default)]
    pub context: Vec<String>,
}

/// A crew as declared in `.price-scout/crews/*.yaml`.
///
/// Agents are referenced by name and resolved against the loaded roles.
///
/// # Example
///
/// ```yaml
/// name: quick-check
/// agents:
///   - "Search Query Optimizer"
///   - "Price Analyzer"
/// tasks:
///   - id: optimize
///     description: "Optimize the search query: '{query}'."
///     expected-output: "An optimized search query string."
///     agent: "Search Query Optimizer"
///   - id: analyze
///     description: "Estimate a fair price for the optimized query."
///     expected-output: "A short price estimate."
///     agent: "Price Analyzer"
///     context: [optimize]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct CrewDefinition {
    /// Unique crew name, selected through `crew = "..."` in config.toml.
    pub name: String,

    /// Role names taking part in this crew.
    pub agents: Vec<String>,

    /// Tasks in execution order.
    pub tasks: Vec<TaskSpec>,
}

/// A crew with its roles resolved, ready to run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct Crew {
    pub name: String,
    pub roles: Vec<Role>,
    pub tasks: Vec<TaskSpec>,
}

impl Crew {
    /// Look up a role by name.
    pub fn role(&self, name: &str) -> Option<&Role> {
        self.roles.iter().find(|r| r.name == name)
    }
}
