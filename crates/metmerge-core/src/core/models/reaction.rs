use super::annotation::Annotations;
use super::ids::MetaboliteId;

pub const DEFAULT_LOWER_BOUND: f64 = 0.0;
pub const DEFAULT_UPPER_BOUND: f64 = 1000.0;

const GENE_RULE_DISJUNCTION: &str = " or ";

/// A biochemical reaction expressed over metabolites of the owning model.
///
/// Negative coefficients mark reactants, positive coefficients mark products.
#[derive(Debug, Clone, PartialEq)]
pub struct Reaction {
    pub id: String,
    pub name: String,
    pub stoichiometry: Vec<(MetaboliteId, f64)>,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub gene_rule: String,
    pub subsystem: Option<String>,
    pub objective_coefficient: f64,
    pub annotations: Annotations,
}

impl Reaction {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            stoichiometry: Vec::new(),
            lower_bound: DEFAULT_LOWER_BOUND,
            upper_bound: DEFAULT_UPPER_BOUND,
            gene_rule: String::new(),
            subsystem: None,
            objective_coefficient: 0.0,
            annotations: Annotations::new(),
        }
    }

    pub fn with_participant(mut self, metabolite: MetaboliteId, coefficient: f64) -> Self {
        self.stoichiometry.push((metabolite, coefficient));
        self
    }

    pub fn with_objective_coefficient(mut self, coefficient: f64) -> Self {
        self.objective_coefficient = coefficient;
        self
    }

    pub fn with_gene_rule(mut self, rule: &str) -> Self {
        self.gene_rule = rule.to_string();
        self
    }

    #[inline]
    pub fn is_objective(&self) -> bool {
        self.objective_coefficient != 0.0
    }

    pub fn coefficient_of(&self, metabolite: MetaboliteId) -> Option<f64> {
        self.stoichiometry
            .iter()
            .find(|(id, _)| *id == metabolite)
            .map(|(_, coefficient)| *coefficient)
    }

    /// Adds `rule` as an alternative to the current gene association unless it
    /// is already contained in it.
    pub fn add_gene_rule(&mut self, rule: &str) {
        let rule = rule.trim();
        if rule.is_empty() {
            return;
        }
        if self.gene_rule.trim().is_empty() {
            self.gene_rule = rule.to_string();
        } else if !self.gene_rule.contains(rule) {
            self.gene_rule = format!("{}{}{}", self.gene_rule, GENE_RULE_DISJUNCTION, rule);
        }
    }

    /// Gene identifiers referenced by the association expression.
    pub fn gene_ids(&self) -> Vec<&str> {
        self.gene_rule
            .split(|c: char| c.is_whitespace() || c == '(' || c == ')')
            .filter(|token| {
                !token.is_empty()
                    && !token.eq_ignore_ascii_case("and")
                    && !token.eq_ignore_ascii_case("or")
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_gene_rule_sets_rule_when_empty() {
        let mut reaction = Reaction::new("PGI", "glucose-6-phosphate isomerase");
        reaction.add_gene_rule("b4025");
        assert_eq!(reaction.gene_rule, "b4025");
    }

    #[test]
    fn add_gene_rule_appends_alternative_once() {
        let mut reaction = Reaction::new("PGI", "").with_gene_rule("b4025");
        reaction.add_gene_rule("G_123");
        reaction.add_gene_rule("G_123");
        reaction.add_gene_rule("b4025");
        assert_eq!(reaction.gene_rule, "b4025 or G_123");
    }

    #[test]
    fn gene_ids_skips_boolean_operators_and_parentheses() {
        let reaction = Reaction::new("R", "").with_gene_rule("(b0001 and b0002) or b0003");
        assert_eq!(reaction.gene_ids(), vec!["b0001", "b0002", "b0003"]);
    }
}
