use metmerge::engine::config::{MergeConfig, ObjectiveMode, ResolutionConfig};

pub struct DefaultsConfig {
    pub min_agreeing_properties: usize,
    pub mass_tolerance: f64,
    pub skip_same_namespace_links: bool,
    pub objective: ObjectiveMode,
    pub exact_stoichiometry: bool,
    pub include_protonation: bool,
    pub extend_annotations: bool,
    pub proton_identifier: String,
    pub boundary_suffix: String,
    pub proton_motive_force_name: String,
    pub filler: char,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let resolution = ResolutionConfig::default();
        let merge = MergeConfig::default();
        Self {
            min_agreeing_properties: resolution.corroboration.min_agreeing_properties,
            mass_tolerance: resolution.corroboration.mass_tolerance,
            skip_same_namespace_links: resolution.skip_same_namespace_links,
            objective: merge.objective,
            exact_stoichiometry: merge.exact_stoichiometry,
            include_protonation: merge.include_protonation,
            extend_annotations: merge.extend_annotations,
            proton_identifier: merge.proton_identifier,
            boundary_suffix: merge.boundary_suffix,
            proton_motive_force_name: merge.proton_motive_force_name,
            filler: merge.filler,
        }
    }
}
