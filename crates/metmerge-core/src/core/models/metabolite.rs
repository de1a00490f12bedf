use super::annotation::Annotations;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metabolite {
    pub id: String,
    pub name: String,
    pub compartment: Option<String>,
    pub formula: Option<String>,
    pub charge: Option<i32>,
    pub annotations: Annotations,
}

impl Metabolite {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn with_compartment(mut self, compartment: &str) -> Self {
        self.compartment = Some(compartment.to_string());
        self
    }

    pub fn with_formula(mut self, formula: &str) -> Self {
        self.formula = Some(formula.to_string());
        self
    }

    pub fn with_annotations(mut self, annotations: Annotations) -> Self {
        self.annotations = annotations;
        self
    }
}
