use super::traits::ModelFile;
use crate::core::models::annotation::{AnnotationValue, Annotations};
use crate::core::models::gene::Gene;
use crate::core::models::metabolite::Metabolite;
use crate::core::models::model::{MetabolicModel, ModelError};
use crate::core::models::reaction::{DEFAULT_LOWER_BOUND, DEFAULT_UPPER_BOUND, Reaction};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CobraJsonError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Inconsistent model: {0}")]
    Model(#[from] ModelError),
    #[error("Reaction '{reaction}' references undeclared metabolite '{metabolite}'")]
    UndeclaredMetabolite { reaction: String, metabolite: String },
}

#[derive(Serialize, Deserialize)]
struct JsonModel {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    metabolites: Vec<JsonMetabolite>,
    #[serde(default)]
    reactions: Vec<JsonReaction>,
    #[serde(default)]
    genes: Vec<JsonGene>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compartments: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<Value>,
}

#[derive(Serialize, Deserialize)]
struct JsonMetabolite {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    compartment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    charge: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    annotation: Option<IndexMap<String, Value>>,
}

#[derive(Serialize, Deserialize)]
struct JsonReaction {
    id: String,
    #[serde(default)]
    name: Option<String>,
    metabolites: IndexMap<String, f64>,
    #[serde(default = "default_lower_bound")]
    lower_bound: f64,
    #[serde(default = "default_upper_bound")]
    upper_bound: f64,
    #[serde(default)]
    gene_reaction_rule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    objective_coefficient: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subsystem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    annotation: Option<IndexMap<String, Value>>,
}

#[derive(Serialize, Deserialize)]
struct JsonGene {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    annotation: Option<IndexMap<String, Value>>,
}

fn default_lower_bound() -> f64 {
    DEFAULT_LOWER_BOUND
}

fn default_upper_bound() -> f64 {
    DEFAULT_UPPER_BOUND
}

/// Reader and writer for the COBRA JSON model layout.
pub struct CobraJsonFile;

impl ModelFile for CobraJsonFile {
    type Error = CobraJsonError;

    fn read_from(reader: &mut impl BufRead) -> Result<MetabolicModel, Self::Error> {
        let json: JsonModel = serde_json::from_reader(reader)?;

        let mut model = MetabolicModel::new(json.id.as_deref().unwrap_or_default());
        model.set_name(json.name.filter(|n| !n.is_empty()));
        if let Some(compartments) = json.compartments {
            model.compartments_mut().extend(compartments);
        }

        for m in json.metabolites {
            model.add_metabolite(Metabolite {
                id: m.id,
                name: m.name.unwrap_or_default(),
                compartment: m.compartment.filter(|c| !c.is_empty()),
                formula: m.formula.filter(|f| !f.is_empty()),
                charge: m.charge,
                annotations: annotations_from_json(m.annotation),
            })?;
        }

        for g in json.genes {
            model.add_gene(Gene {
                id: g.id,
                name: g.name.unwrap_or_default(),
                annotations: annotations_from_json(g.annotation),
            })?;
        }

        for r in json.reactions {
            let mut stoichiometry = Vec::with_capacity(r.metabolites.len());
            for (metabolite, coefficient) in r.metabolites {
                let id = model.find_metabolite_by_local_id(&metabolite).ok_or_else(|| {
                    CobraJsonError::UndeclaredMetabolite {
                        reaction: r.id.clone(),
                        metabolite: metabolite.clone(),
                    }
                })?;
                stoichiometry.push((id, coefficient));
            }
            model.add_reaction(Reaction {
                id: r.id,
                name: r.name.unwrap_or_default(),
                stoichiometry,
                lower_bound: r.lower_bound,
                upper_bound: r.upper_bound,
                gene_rule: r.gene_reaction_rule,
                subsystem: r.subsystem.filter(|s| !s.is_empty()),
                objective_coefficient: r.objective_coefficient.unwrap_or(0.0),
                annotations: annotations_from_json(r.annotation),
            })?;
        }

        Ok(model)
    }

    fn write_to(model: &MetabolicModel, writer: &mut impl Write) -> Result<(), Self::Error> {
        let metabolites = model
            .metabolites_iter()
            .map(|(_, m)| JsonMetabolite {
                id: m.id.clone(),
                name: Some(m.name.clone()),
                compartment: m.compartment.clone(),
                charge: m.charge,
                formula: m.formula.clone(),
                annotation: annotations_to_json(&m.annotations),
            })
            .collect();

        let reactions = model
            .reactions_iter()
            .map(|(_, r)| JsonReaction {
                id: r.id.clone(),
                name: Some(r.name.clone()),
                metabolites: r
                    .stoichiometry
                    .iter()
                    .filter_map(|(id, coefficient)| {
                        model.metabolite(*id).map(|m| (m.id.clone(), *coefficient))
                    })
                    .collect(),
                lower_bound: r.lower_bound,
                upper_bound: r.upper_bound,
                gene_reaction_rule: r.gene_rule.clone(),
                objective_coefficient: r.is_objective().then_some(r.objective_coefficient),
                subsystem: r.subsystem.clone(),
                annotation: annotations_to_json(&r.annotations),
            })
            .collect();

        let genes = model
            .genes_iter()
            .map(|(_, g)| JsonGene {
                id: g.id.clone(),
                name: Some(g.name.clone()),
                annotation: annotations_to_json(&g.annotations),
            })
            .collect();

        let json = JsonModel {
            id: Some(model.id().to_string()),
            name: model.name().map(str::to_string),
            metabolites,
            reactions,
            genes,
            compartments: (!model.compartments().is_empty()).then(|| model.compartments().clone()),
            version: Some(Value::String("1".to_string())),
        };
        serde_json::to_writer_pretty(&mut *writer, &json)?;
        writeln!(writer)?;
        Ok(())
    }
}

fn annotations_from_json(annotation: Option<IndexMap<String, Value>>) -> Annotations {
    let mut annotations = Annotations::new();
    for (key, value) in annotation.unwrap_or_default() {
        let converted = match value {
            Value::String(s) => Some(AnnotationValue::Scalar(s)),
            Value::Number(n) => Some(AnnotationValue::Scalar(n.to_string())),
            Value::Array(items) => Some(AnnotationValue::List(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect(),
            )),
            _ => None,
        };
        if let Some(converted) = converted {
            annotations.insert(key, converted);
        }
    }
    annotations
}

fn annotations_to_json(annotations: &Annotations) -> Option<IndexMap<String, Value>> {
    if annotations.is_empty() {
        return None;
    }
    Some(
        annotations
            .iter()
            .map(|(key, value)| {
                let json = match value {
                    AnnotationValue::Scalar(s) => Value::String(s.clone()),
                    AnnotationValue::List(items) => {
                        Value::Array(items.iter().cloned().map(Value::String).collect())
                    }
                };
                (key.clone(), json)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SMALL_MODEL: &str = r#"{
        "id": "e_coli_core",
        "name": "Escherichia coli core",
        "compartments": {"c": "cytosol", "e": "extracellular space"},
        "metabolites": [
            {"id": "glc__D_e", "name": "D-Glucose", "compartment": "e", "formula": "C6H12O6",
             "annotation": {"kegg.compound": ["C00031"], "sbo": "SBO:0000247"}},
            {"id": "glc__D_c", "name": "D-Glucose", "compartment": "c"}
        ],
        "reactions": [
            {"id": "GLCt", "name": "Glucose transport", "metabolites": {"glc__D_e": -1.0, "glc__D_c": 1.0},
             "lower_bound": -1000.0, "upper_bound": 1000.0, "gene_reaction_rule": "b1101"},
            {"id": "BIOMASS", "metabolites": {"glc__D_c": -1.0}, "objective_coefficient": 1.0}
        ],
        "genes": [{"id": "b1101", "name": "ptsG"}]
    }"#;

    #[test]
    fn read_from_builds_model_with_annotations_and_objective() {
        let model = CobraJsonFile::read_from(&mut Cursor::new(SMALL_MODEL)).unwrap();

        assert_eq!(model.id(), "e_coli_core");
        assert_eq!(model.metabolite_count(), 2);
        assert_eq!(model.reaction_count(), 2);
        assert_eq!(model.gene_count(), 1);
        assert_eq!(model.compartments().get("e").map(String::as_str), Some("extracellular space"));

        let glc_e = model.find_metabolite_by_local_id("glc__D_e").unwrap();
        let metabolite = model.metabolite(glc_e).unwrap();
        assert_eq!(
            metabolite.annotations["kegg.compound"],
            AnnotationValue::List(vec!["C00031".to_string()])
        );

        let objective: Vec<_> = model.objective_reactions().map(|(_, r)| r.id.as_str()).collect();
        assert_eq!(objective, vec!["BIOMASS"]);
        let biomass = model.find_reaction_by_local_id("BIOMASS").unwrap();
        assert_eq!(model.reaction(biomass).unwrap().lower_bound, DEFAULT_LOWER_BOUND);
    }

    #[test]
    fn read_from_rejects_undeclared_participants() {
        let json = r#"{"id": "m", "metabolites": [],
            "reactions": [{"id": "R", "metabolites": {"ghost": 1.0}}]}"#;
        let result = CobraJsonFile::read_from(&mut Cursor::new(json));
        assert!(matches!(
            result,
            Err(CobraJsonError::UndeclaredMetabolite { .. })
        ));
    }

    #[test]
    fn write_then_read_preserves_model_content() {
        let model = CobraJsonFile::read_from(&mut Cursor::new(SMALL_MODEL)).unwrap();
        let mut buffer = Vec::new();
        CobraJsonFile::write_to(&model, &mut buffer).unwrap();

        let reread = CobraJsonFile::read_from(&mut Cursor::new(buffer)).unwrap();
        assert_eq!(reread.metabolite_count(), model.metabolite_count());
        assert_eq!(reread.reaction_count(), model.reaction_count());
        let transport = reread.find_reaction_by_local_id("GLCt").unwrap();
        let reaction = reread.reaction(transport).unwrap();
        assert_eq!(reaction.gene_rule, "b1101");
        assert_eq!(reaction.stoichiometry.len(), 2);
    }
}
