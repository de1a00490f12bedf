use crate::core::models::model::MetabolicModel;
use crate::engine::config::MergeConfig;
use std::collections::HashSet;

/// Identifier and name of the merged model, reflecting the active options.
pub(super) fn merged_identity(models: &[MetabolicModel], config: &MergeConfig) -> (String, String) {
    let mut id = String::from("merged");
    for model in models {
        id.push('_');
        id.push_str(model.id());
    }
    let names: Vec<&str> = models.iter().map(MetabolicModel::display_name).collect();
    let mut name = format!("Merge of {}", names.join("; "));

    if config.exact_stoichiometry {
        id.push_str("_exactsto");
        name.push_str(" with exact stoichiometry");
    }
    if config.include_protonation {
        id.push_str("_useprot");
        name.push_str(" with protonation");
    }
    if let Some(namespace) = &config.translate_to {
        id.push_str(&format!("_trans_{}", namespace));
        name.push_str(&format!(" translated to {}", namespace));
    }
    (id, name)
}

/// Inserts `filler` in front of the compartment separator of a metabolite id,
/// or appends it when the id has none.
pub(super) fn insert_filler(id: &str, filler: char) -> String {
    let separator = id
        .rfind('@')
        .filter(|&idx| idx > 0)
        .or_else(|| id.rfind('_').filter(|&idx| idx > 0));
    match separator {
        Some(idx) => format!("{}{}{}", &id[..idx], filler, &id[idx..]),
        None => format!("{}{}", id, filler),
    }
}

/// Makes a metabolite id unique while keeping its compartment suffix last.
pub(super) fn unique_metabolite_id(desired: &str, taken: &HashSet<String>, filler: char) -> String {
    let mut candidate = desired.to_string();
    while taken.contains(&candidate) {
        candidate = insert_filler(&candidate, filler);
    }
    candidate
}

pub(super) fn unique_reaction_id(desired: &str, taken: &HashSet<String>, filler: char) -> String {
    let mut candidate = desired.to_string();
    while taken.contains(&candidate) {
        candidate.push(filler);
    }
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identifiers::namespace::Namespace;

    #[test]
    fn merged_identity_lists_models_and_options() {
        let mut a = MetabolicModel::new("e_coli_core");
        a.set_name(Some("E. coli core".to_string()));
        let b = MetabolicModel::new("iJO1366");
        let config = MergeConfig {
            include_protonation: true,
            translate_to: Some(Namespace::Bigg),
            ..MergeConfig::default()
        };

        let (id, name) = merged_identity(&[a, b], &config);
        assert_eq!(id, "merged_e_coli_core_iJO1366_useprot_trans_bigg");
        assert_eq!(
            name,
            "Merge of E. coli core; iJO1366 with protonation translated to bigg"
        );
    }

    #[test]
    fn insert_filler_prefers_at_separator_then_underscore() {
        assert_eq!(insert_filler("atp@cytosol", '~'), "atp~@cytosol");
        assert_eq!(insert_filler("glc__D_c", '~'), "glc__D~_c");
        assert_eq!(insert_filler("h2o", '~'), "h2o~");
        assert_eq!(insert_filler("_c", '~'), "_c~");
    }

    #[test]
    fn unique_ids_repeat_the_filler_until_free() {
        let taken: HashSet<String> = ["glc__D_c", "glc__D~_c", "PGI", "PGI~"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(unique_metabolite_id("glc__D_c", &taken, '~'), "glc__D~~_c");
        assert_eq!(unique_metabolite_id("atp_c", &taken, '~'), "atp_c");
        assert_eq!(unique_reaction_id("PGI", &taken, '~'), "PGI~~");
    }
}
