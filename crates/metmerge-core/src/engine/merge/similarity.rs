use serde::Serialize;
use std::collections::BTreeSet;

/// Pairwise Jaccard distances between the input models of one merge.
///
/// The strict upper triangle (`i < j`) compares metabolite sets and the strict
/// lower triangle (`i > j`) compares reaction sets; the diagonal is zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityMatrix {
    size: usize,
    rows: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    /// Builds the matrix from the source-model sets of every merged metabolite
    /// and reaction.
    pub fn from_sources<'a, M, R>(size: usize, metabolites: M, reactions: R) -> Self
    where
        M: IntoIterator<Item = &'a BTreeSet<usize>>,
        R: IntoIterator<Item = &'a BTreeSet<usize>>,
    {
        let metabolites: Vec<&BTreeSet<usize>> = metabolites.into_iter().collect();
        let reactions: Vec<&BTreeSet<usize>> = reactions.into_iter().collect();

        let rows = (0..size)
            .map(|i| {
                (0..size)
                    .map(|j| match i.cmp(&j) {
                        std::cmp::Ordering::Less => jaccard_distance(&metabolites, i, j),
                        std::cmp::Ordering::Greater => jaccard_distance(&reactions, i, j),
                        std::cmp::Ordering::Equal => 0.0,
                    })
                    .collect()
            })
            .collect();
        Self { size, rows }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.rows.get(i).and_then(|row| row.get(j)).copied()
    }

    pub fn metabolite_distance(&self, i: usize, j: usize) -> Option<f64> {
        self.get(i.min(j), i.max(j))
    }

    pub fn reaction_distance(&self, i: usize, j: usize) -> Option<f64> {
        self.get(i.max(j), i.min(j))
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}

fn jaccard_distance(entities: &[&BTreeSet<usize>], i: usize, j: usize) -> f64 {
    let (mut shared, mut union) = (0usize, 0usize);
    for sources in entities {
        match (sources.contains(&i), sources.contains(&j)) {
            (true, true) => {
                shared += 1;
                union += 1;
            }
            (true, false) | (false, true) => union += 1,
            (false, false) => {}
        }
    }
    if union == 0 {
        0.0
    } else {
        1.0 - shared as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangles_use_metabolites_above_and_reactions_below_the_diagonal() {
        let metabolites = [
            BTreeSet::from([0, 1]),
            BTreeSet::from([0]),
            BTreeSet::from([1]),
            BTreeSet::from([0, 1]),
        ];
        let reactions = [BTreeSet::from([0, 1])];

        let matrix = SimilarityMatrix::from_sources(2, &metabolites, &reactions);

        assert_eq!(matrix.get(0, 0), Some(0.0));
        assert_eq!(matrix.metabolite_distance(1, 0), Some(0.5));
        assert_eq!(matrix.reaction_distance(0, 1), Some(0.0));
        assert_eq!(matrix.get(1, 0), Some(0.0));
        assert_eq!(matrix.get(0, 1), Some(0.5));
    }

    #[test]
    fn empty_union_has_zero_distance() {
        let matrix = SimilarityMatrix::from_sources(
            3,
            &[BTreeSet::from([0])],
            &Vec::<BTreeSet<usize>>::new(),
        );
        assert_eq!(matrix.metabolite_distance(1, 2), Some(0.0));
        assert_eq!(matrix.metabolite_distance(0, 1), Some(1.0));
    }

    #[test]
    fn distances_stay_within_bounds() {
        let metabolites: Vec<BTreeSet<usize>> = (0..8)
            .map(|n| (0..4).filter(|m| (n >> m) & 1 == 1).collect())
            .collect();
        let matrix = SimilarityMatrix::from_sources(4, &metabolites, &metabolites);
        for row in matrix.rows() {
            for &value in row {
                assert!((0.0..=1.0).contains(&value));
            }
        }
        assert!((0..4).all(|i| matrix.get(i, i) == Some(0.0)));
    }
}
