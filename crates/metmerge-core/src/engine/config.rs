use crate::core::identifiers::namespace::{EntityKind, Namespace};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

fn invalid(parameter: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter,
        reason: reason.to_string(),
    }
}

/// Evidence required before two canonical ids may be merged.
#[derive(Debug, Clone, PartialEq)]
pub struct CorroborationConfig {
    /// Independent properties that must agree.
    pub min_agreeing_properties: usize,
    /// Absolute tolerance under which two masses agree.
    pub mass_tolerance: f64,
}

impl Default for CorroborationConfig {
    fn default() -> Self {
        Self {
            min_agreeing_properties: 2,
            mass_tolerance: 0.5,
        }
    }
}

/// How the identifiers of one entity kind are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct KindPolicy {
    pub require_corroboration: bool,
    /// Namespaces in decreasing priority; used when two canonical ids claim
    /// the same bare code.
    pub namespace_preference: Vec<Namespace>,
}

impl KindPolicy {
    pub fn for_kind(kind: EntityKind) -> Self {
        Self {
            require_corroboration: kind == EntityKind::Metabolite,
            namespace_preference: kind.default_namespace_preference(),
        }
    }

    /// Rank of `namespace` in the preference list; unlisted namespaces rank last.
    pub fn rank(&self, namespace: &Namespace) -> usize {
        self.namespace_preference
            .iter()
            .position(|preferred| preferred == namespace)
            .unwrap_or(usize::MAX)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionConfig {
    pub corroboration: CorroborationConfig,
    pub metabolites: KindPolicy,
    pub reactions: KindPolicy,
    /// Refuse cross references from a namespace that the target canonical id
    /// already holds an identifier of.
    pub skip_same_namespace_links: bool,
}

impl ResolutionConfig {
    pub fn policy(&self, kind: EntityKind) -> &KindPolicy {
        match kind {
            EntityKind::Metabolite => &self.metabolites,
            EntityKind::Reaction => &self.reactions,
        }
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            corroboration: CorroborationConfig::default(),
            metabolites: KindPolicy::for_kind(EntityKind::Metabolite),
            reactions: KindPolicy::for_kind(EntityKind::Reaction),
            skip_same_namespace_links: true,
        }
    }
}

#[derive(Default)]
pub struct ResolutionConfigBuilder {
    min_agreeing_properties: Option<usize>,
    mass_tolerance: Option<f64>,
    metabolite_corroboration: Option<bool>,
    reaction_corroboration: Option<bool>,
    metabolite_preference: Option<Vec<Namespace>>,
    reaction_preference: Option<Vec<Namespace>>,
    skip_same_namespace_links: Option<bool>,
}

impl ResolutionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_agreeing_properties(mut self, count: usize) -> Self {
        self.min_agreeing_properties = Some(count);
        self
    }
    pub fn mass_tolerance(mut self, tolerance: f64) -> Self {
        self.mass_tolerance = Some(tolerance);
        self
    }
    pub fn require_corroboration(mut self, kind: EntityKind, required: bool) -> Self {
        match kind {
            EntityKind::Metabolite => self.metabolite_corroboration = Some(required),
            EntityKind::Reaction => self.reaction_corroboration = Some(required),
        }
        self
    }
    pub fn namespace_preference(mut self, kind: EntityKind, preference: Vec<Namespace>) -> Self {
        match kind {
            EntityKind::Metabolite => self.metabolite_preference = Some(preference),
            EntityKind::Reaction => self.reaction_preference = Some(preference),
        }
        self
    }
    pub fn skip_same_namespace_links(mut self, skip: bool) -> Self {
        self.skip_same_namespace_links = Some(skip);
        self
    }

    pub fn build(self) -> Result<ResolutionConfig, ConfigError> {
        let defaults = ResolutionConfig::default();

        let corroboration = CorroborationConfig {
            min_agreeing_properties: self
                .min_agreeing_properties
                .unwrap_or(defaults.corroboration.min_agreeing_properties),
            mass_tolerance: self
                .mass_tolerance
                .unwrap_or(defaults.corroboration.mass_tolerance),
        };
        if corroboration.min_agreeing_properties == 0 {
            return Err(invalid("min_agreeing_properties", "must be at least 1"));
        }
        if !corroboration.mass_tolerance.is_finite() || corroboration.mass_tolerance < 0.0 {
            return Err(invalid(
                "mass_tolerance",
                "must be a finite, non-negative number",
            ));
        }

        let metabolites = KindPolicy {
            require_corroboration: self
                .metabolite_corroboration
                .unwrap_or(defaults.metabolites.require_corroboration),
            namespace_preference: self
                .metabolite_preference
                .unwrap_or(defaults.metabolites.namespace_preference),
        };
        let reactions = KindPolicy {
            require_corroboration: self
                .reaction_corroboration
                .unwrap_or(defaults.reactions.require_corroboration),
            namespace_preference: self
                .reaction_preference
                .unwrap_or(defaults.reactions.namespace_preference),
        };
        if metabolites.namespace_preference.is_empty() || reactions.namespace_preference.is_empty()
        {
            return Err(invalid("namespace_preference", "must not be empty"));
        }

        Ok(ResolutionConfig {
            corroboration,
            metabolites,
            reactions,
            skip_same_namespace_links: self
                .skip_same_namespace_links
                .unwrap_or(defaults.skip_same_namespace_links),
        })
    }
}

/// Which objective the merged model receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectiveMode {
    /// One synthetic reaction averaging every input objective.
    #[default]
    MergeAll,
    /// The objective reactions of the model at this (zero-based) index.
    SelectOne(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeConfig {
    pub objective: ObjectiveMode,
    pub exact_stoichiometry: bool,
    pub include_protonation: bool,
    pub extend_annotations: bool,
    pub translate_to: Option<Namespace>,
    /// Bare code of the proton species ignored in reaction keys.
    pub proton_identifier: String,
    /// Local-id suffix marking boundary pseudo-metabolites.
    pub boundary_suffix: String,
    /// Display name of the proton-motive-force pseudo-species.
    pub proton_motive_force_name: String,
    /// Character inserted to make colliding display ids unique.
    pub filler: char,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            objective: ObjectiveMode::MergeAll,
            exact_stoichiometry: false,
            include_protonation: false,
            extend_annotations: false,
            translate_to: None,
            proton_identifier: "C00080".to_string(),
            boundary_suffix: "b".to_string(),
            proton_motive_force_name: "PMF".to_string(),
            filler: '~',
        }
    }
}

#[derive(Default)]
pub struct MergeConfigBuilder {
    objective: Option<ObjectiveMode>,
    exact_stoichiometry: Option<bool>,
    include_protonation: Option<bool>,
    extend_annotations: Option<bool>,
    translate_to: Option<Namespace>,
    proton_identifier: Option<String>,
    boundary_suffix: Option<String>,
    proton_motive_force_name: Option<String>,
    filler: Option<char>,
}

impl MergeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objective(mut self, mode: ObjectiveMode) -> Self {
        self.objective = Some(mode);
        self
    }
    pub fn exact_stoichiometry(mut self, enabled: bool) -> Self {
        self.exact_stoichiometry = Some(enabled);
        self
    }
    pub fn include_protonation(mut self, enabled: bool) -> Self {
        self.include_protonation = Some(enabled);
        self
    }
    pub fn extend_annotations(mut self, enabled: bool) -> Self {
        self.extend_annotations = Some(enabled);
        self
    }
    pub fn translate_to(mut self, namespace: Namespace) -> Self {
        self.translate_to = Some(namespace);
        self
    }
    pub fn proton_identifier(mut self, id: &str) -> Self {
        self.proton_identifier = Some(id.to_string());
        self
    }
    pub fn boundary_suffix(mut self, suffix: &str) -> Self {
        self.boundary_suffix = Some(suffix.to_string());
        self
    }
    pub fn proton_motive_force_name(mut self, name: &str) -> Self {
        self.proton_motive_force_name = Some(name.to_string());
        self
    }
    pub fn filler(mut self, filler: char) -> Self {
        self.filler = Some(filler);
        self
    }

    pub fn build(self) -> Result<MergeConfig, ConfigError> {
        let defaults = MergeConfig::default();
        let config = MergeConfig {
            objective: self.objective.unwrap_or(defaults.objective),
            exact_stoichiometry: self
                .exact_stoichiometry
                .unwrap_or(defaults.exact_stoichiometry),
            include_protonation: self
                .include_protonation
                .unwrap_or(defaults.include_protonation),
            extend_annotations: self
                .extend_annotations
                .unwrap_or(defaults.extend_annotations),
            translate_to: self.translate_to,
            proton_identifier: self
                .proton_identifier
                .unwrap_or(defaults.proton_identifier),
            boundary_suffix: self.boundary_suffix.unwrap_or(defaults.boundary_suffix),
            proton_motive_force_name: self
                .proton_motive_force_name
                .unwrap_or(defaults.proton_motive_force_name),
            filler: self.filler.unwrap_or(defaults.filler),
        };

        if config.proton_identifier.trim().is_empty() {
            return Err(invalid("proton_identifier", "must not be empty"));
        }
        if config.boundary_suffix.is_empty() {
            return Err(invalid("boundary_suffix", "must not be empty"));
        }
        // The filler is inserted in front of compartment separators.
        if matches!(config.filler, '_' | '@') || config.filler.is_whitespace() {
            return Err(invalid(
                "filler",
                "must not be a compartment separator or whitespace",
            ));
        }
        Ok(config)
    }
}
