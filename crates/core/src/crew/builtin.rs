//! The built-in price comparison crew.

use ps_protocol::{CrewDefinition, MarkupColor, Role, TaskSpec, DEFAULT_CREW};

pub const SEARCH_QUERY_OPTIMIZER: &str = "Search Query Optimizer";
pub const DATA_RETRIEVAL_SPECIALIST: &str = "Data Retrieval Specialist";
pub const PRICE_ANALYZER: &str = "Price Analyzer";

/// The three roles of the price comparison crew.
pub fn default_roles() -> Vec<Role> {
    vec![
        Role {
            name: SEARCH_QUERY_OPTIMIZER.to_string(),
            goal: "Improve search queries to find exact product matches across different platforms."
                .to_string(),
            backstory: "Expert in optimizing search queries for e-commerce platforms.".to_string(),
            color: Some(MarkupColor::Blue),
            allow_delegation: true,
        },
        Role {
            name: PRICE_ANALYZER.to_string(),
            goal: "Analyze prices from different sources and provide insights on the best options."
                .to_string(),
            backstory: "Specialist in comparing prices and identifying the best deals.".to_string(),
            color: Some(MarkupColor::Green),
            allow_delegation: true,
        },
        Role {
            name: DATA_RETRIEVAL_SPECIALIST.to_string(),
            goal: "Efficiently fetch accurate pricing data from multiple sources.".to_string(),
            backstory:
                "Expert in retrieving real-time data from various e-commerce platforms and local stores."
                    .to_string(),
            color: Some(MarkupColor::Orange),
            allow_delegation: true,
        },
    ]
}

/// Declaration of the default crew: optimize, then retrieve, then analyze.
pub fn price_comparison_definition() -> CrewDefinition {
    CrewDefinition {
        name: DEFAULT_CREW.to_string(),
        agents: vec![
            SEARCH_QUERY_OPTIMIZER.to_string(),
            DATA_RETRIEVAL_SPECIALIST.to_string(),
            PRICE_ANALYZER.to_string(),
        ],
        tasks: vec![
            TaskSpec {
                id: "optimize".to_string(),
                description: "Optimize the search query: '{query}' for best results across different e-commerce platforms."
                    .to_string(),
                expected_output: "An optimized search query string.".to_string(),
                agent: SEARCH_QUERY_OPTIMIZER.to_string(),
                context: Vec::new(),
            },
            TaskSpec {
                id: "retrieve".to_string(),
                description: "Retrieve price data for the optimized query from Amazon, AliExpress, and Kuwaiti stores."
                    .to_string(),
                expected_output: "A list of product prices from different sources.".to_string(),
                agent: DATA_RETRIEVAL_SPECIALIST.to_string(),
                context: vec!["optimize".to_string()],
            },
            TaskSpec {
                id: "analyze".to_string(),
                description: "Analyze the retrieved price data and provide insights on the best options."
                    .to_string(),
                expected_output: "A summary of price comparisons and recommendations.".to_string(),
                agent: PRICE_ANALYZER.to_string(),
                context: vec!["retrieve".to_string()],
            },
        ],
    }
}

/// Overlay `overrides` on `base`: a role with the same name replaces the
/// base one in place, any other role is appended.
pub fn merge_roles(mut base: Vec<Role>, overrides: &[Role]) -> Vec<Role> {
    for role in overrides {
        match base.iter_mut().find(|r| r.name == role.name) {
            Some(existing) => *existing = role.clone(),
            None => base.push(role.clone()),
        }
    }
    base
}
