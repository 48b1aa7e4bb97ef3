//! The aggregated configuration and what it is used for.

use crate::crew::{build_crew, default_roles, price_comparison_definition, CrewError};
use crate::llm::provider::resolve_api_key;
use ps_protocol::{Crew, CrewDefinition, GlobalConfig, ModelSelection, Role};

/// Everything loaded from `.price-scout/`, merged over the built-ins.
///
/// `roles` always contains the three built-in roles (possibly overridden by
/// `agents/*.md`), and `crews` always contains the built-in
/// `price-comparison` crew unless a crew file redefines it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub global: GlobalConfig,
    pub roles: Vec<Role>,
    pub crews: Vec<CrewDefinition>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            global: GlobalConfig::default(),
            roles: default_roles(),
            crews: vec![price_comparison_definition()],
        }
    }
}

impl AppConfig {
    /// The crew selected by `crew = "..."`.
    pub fn crew_definition(&self) -> Result<&CrewDefinition, CrewError> {
        self.crews
            .iter()
            .find(|crew| crew.name == self.global.crew)
            .ok_or_else(|| CrewError::UnknownCrew(self.global.crew.clone()))
    }

    /// The selected crew, resolved for `query`.
    pub fn crew_for(&self, query: &str) -> Result<Crew, CrewError> {
        build_crew(self.crew_definition()?, &self.roles, query)
    }

    /// Model selection from the configured provider, model and temperature.
    ///
    /// The API key is `explicit_key` if given, otherwise looked up in the
    /// environment (see [`resolve_api_key`]).
    pub fn selection(&self, explicit_key: Option<&str>) -> ModelSelection {
        let provider = self.global.provider;
        let mut selection = ModelSelection::new(provider).with_temperature(self.global.temperature);
        if let Some(model) = self.global.model.as_deref().filter(|m| !m.trim().is_empty()) {
            selection = selection.with_model(model);
        }
        match resolve_api_key(provider, explicit_key, self.global.api_key_env.as_deref()) {
            Some(key) => selection.with_api_key(key),
            None => selection,
        }
    }
}
