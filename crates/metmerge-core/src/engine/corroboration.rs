use super::config::CorroborationConfig;
use crate::core::identifiers::properties::PropertyBag;
use std::fmt;

/// An independent property that can support or veto a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Evidence {
    Mass,
    Inchikey,
    Names,
    Formula,
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evidence::Mass => write!(f, "mass"),
            Evidence::Inchikey => write!(f, "inchikey"),
            Evidence::Names => write!(f, "names"),
            Evidence::Formula => write!(f, "formula"),
        }
    }
}

/// Why a corroborated merge did not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclineReason {
    /// A property present on both sides disagrees.
    Contradicted(Evidence),
    /// Too few properties agree.
    InsufficientEvidence { agreeing: usize, required: usize },
}

impl fmt::Display for DeclineReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclineReason::Contradicted(evidence) => write!(f, "{} contradicts", evidence),
            DeclineReason::InsufficientEvidence { agreeing, required } => {
                write!(f, "{} of {} required properties agree", agreeing, required)
            }
        }
    }
}

/// Outcome of comparing two property bags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Corroborated(Vec<Evidence>),
    Declined(DeclineReason),
}

impl Verdict {
    pub fn is_corroborated(&self) -> bool {
        matches!(self, Verdict::Corroborated(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Agree,
    Disagree,
    Inconclusive,
}

fn compare_mass(a: &PropertyBag, b: &PropertyBag, tolerance: f64) -> Comparison {
    let (Some(a), Some(b)) = (a.mass().first(), b.mass().first()) else {
        return Comparison::Inconclusive;
    };
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(a), Ok(b)) if (a - b).abs() < tolerance => Comparison::Agree,
        (Ok(_), Ok(_)) => Comparison::Disagree,
        _ => Comparison::Inconclusive,
    }
}

fn compare_inchikey(a: &PropertyBag, b: &PropertyBag) -> Comparison {
    match (a.inchikey().first(), b.inchikey().first()) {
        (Some(a), Some(b)) if a.eq_ignore_ascii_case(b) => Comparison::Agree,
        (Some(_), Some(_)) => Comparison::Disagree,
        _ => Comparison::Inconclusive,
    }
}

// Synonym lists are open-ended, so a missing overlap never counts against a merge.
fn compare_tokens(a: &[String], b: &[String]) -> Comparison {
    let shared = a
        .iter()
        .any(|x| b.iter().any(|y| x.eq_ignore_ascii_case(y)));
    if shared {
        Comparison::Agree
    } else {
        Comparison::Inconclusive
    }
}

/// Decides whether two property bags describe the same compound.
///
/// Properties are checked in the order mass, inchikey, names, formula, and
/// only properties present in both bags are compared. Every property is
/// compared before the agreements are counted, so a single disagreement
/// vetoes the merge whatever the threshold.
pub fn corroborate(a: &PropertyBag, b: &PropertyBag, config: &CorroborationConfig) -> Verdict {
    let required = config.min_agreeing_properties;
    let mut agreeing = Vec::with_capacity(required);

    for evidence in [
        Evidence::Mass,
        Evidence::Inchikey,
        Evidence::Names,
        Evidence::Formula,
    ] {
        let comparison = match evidence {
            Evidence::Mass => compare_mass(a, b, config.mass_tolerance),
            Evidence::Inchikey => compare_inchikey(a, b),
            Evidence::Names => compare_tokens(a.names(), b.names()),
            Evidence::Formula => compare_tokens(a.formula(), b.formula()),
        };
        match comparison {
            Comparison::Agree => agreeing.push(evidence),
            Comparison::Disagree => {
                return Verdict::Declined(DeclineReason::Contradicted(evidence));
            }
            Comparison::Inconclusive => {}
        }
    }

    if agreeing.len() >= required {
        Verdict::Corroborated(agreeing)
    } else {
        Verdict::Declined(DeclineReason::InsufficientEvidence {
            agreeing: agreeing.len(),
            required,
        })
    }
}
