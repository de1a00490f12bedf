use super::config::ResolutionConfig;
use super::corroboration::{DeclineReason, Verdict, corroborate};
use super::error::EngineError;
use crate::core::identifiers::namespace::{EntityKind, RawId};
use crate::core::identifiers::properties::PropertyBag;
use crate::core::identifiers::table::IdentifierTable;
use crate::core::io::feeds::FeedRecord;
use crate::core::models::ids::CanonicalId;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

/// Result of [`ResolutionBuilder::merge_canonicals`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// `absorbed` no longer exists; its identifiers now resolve to `survivor`.
    Merged {
        survivor: CanonicalId,
        absorbed: CanonicalId,
    },
    /// Both sides already were the same canonical id.
    Unchanged(CanonicalId),
    /// Corroboration did not support the merge; nothing changed.
    Declined(DeclineReason),
}

/// Result of [`ResolutionBuilder::ingest_cross_reference`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossReferenceOutcome {
    /// The other identifier was new and now belongs to the source's canonical id.
    Bound(CanonicalId),
    /// Two canonical ids were considered for a merge.
    Merge(MergeOutcome),
    /// The other identifier's canonical id already lists an identifier from the
    /// source's database.
    SameNamespace,
    /// The source identifier has never been seen in a primary record.
    UnknownSource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionStats {
    pub primary_records: usize,
    pub cross_references: usize,
    pub unknown_sources: usize,
    pub merges: usize,
    pub declined_merges: usize,
    pub same_namespace_links: usize,
    pub dropped_claims: usize,
    pub deleted_canonicals: usize,
}

/// Builds the identifier space of one entity kind from feed records.
///
/// Holds the raw-id index and the property store while they are still being
/// written. Every raw identifier resolves to exactly one live canonical id at
/// all times: unions re-point identifiers eagerly instead of leaving forwarding
/// entries behind.
pub struct ResolutionBuilder {
    kind: EntityKind,
    config: ResolutionConfig,
    index: BTreeMap<RawId, CanonicalId>,
    bags: BTreeMap<CanonicalId, PropertyBag>,
    next_id: u64,
    stats: ResolutionStats,
}

impl ResolutionBuilder {
    pub fn new(kind: EntityKind, config: ResolutionConfig) -> Self {
        Self {
            kind,
            config,
            index: BTreeMap::new(),
            bags: BTreeMap::new(),
            next_id: 1,
            stats: ResolutionStats::default(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn stats(&self) -> &ResolutionStats {
        &self.stats
    }

    pub fn canonical_of(&self, id: &RawId) -> Option<CanonicalId> {
        self.index.get(id).copied()
    }

    pub fn properties(&self, id: CanonicalId) -> Option<&PropertyBag> {
        self.bags.get(&id)
    }

    pub fn canonical_count(&self) -> usize {
        self.bags.len()
    }

    fn allocate(&mut self) -> CanonicalId {
        let id = CanonicalId::new(self.next_id);
        self.next_id += 1;
        self.bags.insert(id, PropertyBag::new());
        id
    }

    fn bind(&mut self, raw: RawId, canonical: CanonicalId) {
        if let Some(bag) = self.bags.get_mut(&canonical) {
            bag.insert_id(raw.clone());
        }
        self.index.insert(raw, canonical);
    }

    /// Folds `absorbed` into `survivor` and deletes it.
    fn union(&mut self, survivor: CanonicalId, absorbed: CanonicalId) {
        let Some(loser) = self.bags.remove(&absorbed) else {
            return;
        };
        for raw in loser.ids() {
            self.index.insert(raw.clone(), survivor);
        }
        if let Some(bag) = self.bags.get_mut(&survivor) {
            bag.absorb(&loser);
        }
        self.stats.merges += 1;
        trace!(%survivor, %absorbed, "Unioned canonical ids");
    }

    /// Ingests a database entry: `ids[0]` is the entry's own identifier, the
    /// rest are identifiers the same source lists for it.
    ///
    /// Co-listed identifiers are trusted without corroboration. Returns the
    /// canonical id the record ended up in, or `None` for an empty id list.
    pub fn ingest_primary_record(
        &mut self,
        ids: &[RawId],
        properties: &PropertyBag,
    ) -> Option<CanonicalId> {
        let (primary, co_listed) = ids.split_first()?;
        self.stats.primary_records += 1;

        let mut canonical = match self.canonical_of(primary) {
            Some(existing) => existing,
            None => {
                let id = self.allocate();
                self.bind(primary.clone(), id);
                id
            }
        };

        for raw in co_listed {
            match self.canonical_of(raw) {
                None => self.bind(raw.clone(), canonical),
                Some(other) if other == canonical => {}
                Some(other) => {
                    let (survivor, absorbed) = (canonical.min(other), canonical.max(other));
                    self.union(survivor, absorbed);
                    canonical = survivor;
                }
            }
        }

        if let Some(bag) = self.bags.get_mut(&canonical) {
            bag.absorb_properties(properties);
        }
        Some(canonical)
    }

    /// Ingests the claim that `other` denotes the same entity as `source`.
    pub fn ingest_cross_reference(
        &mut self,
        source: &RawId,
        other: &RawId,
    ) -> Result<CrossReferenceOutcome, EngineError> {
        self.stats.cross_references += 1;

        let Some(canonical) = self.canonical_of(source) else {
            self.stats.unknown_sources += 1;
            return Ok(CrossReferenceOutcome::UnknownSource);
        };

        let Some(other_canonical) = self.canonical_of(other) else {
            self.bind(other.clone(), canonical);
            return Ok(CrossReferenceOutcome::Bound(canonical));
        };

        if other_canonical != canonical && self.config.skip_same_namespace_links {
            let other_bag = self
                .bags
                .get(&other_canonical)
                .ok_or(EngineError::UnknownCanonical(other_canonical))?;
            if other_bag.contains_namespace(source.namespace()) {
                self.stats.same_namespace_links += 1;
                return Ok(CrossReferenceOutcome::SameNamespace);
            }
        }

        let require = self.config.policy(self.kind).require_corroboration;
        self.merge_canonicals(canonical, other_canonical, require)
            .map(CrossReferenceOutcome::Merge)
    }

    /// Applies every claim carried by one feed record.
    pub fn ingest_record(&mut self, record: &FeedRecord) -> Result<(), EngineError> {
        match record {
            FeedRecord::Primary { ids, properties } => {
                self.ingest_primary_record(ids, properties);
            }
            FeedRecord::CrossReference { source, others } => {
                for other in others {
                    self.ingest_cross_reference(source, other)?;
                }
            }
        }
        Ok(())
    }

    /// Merges two canonical ids; the smaller (older) one survives.
    ///
    /// With `require_corroboration` the property bags must agree on enough
    /// independent properties and contradict on none.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownCanonical`] if either id is not live.
    pub fn merge_canonicals(
        &mut self,
        a: CanonicalId,
        b: CanonicalId,
        require_corroboration: bool,
    ) -> Result<MergeOutcome, EngineError> {
        let bag_a = self.bags.get(&a).ok_or(EngineError::UnknownCanonical(a))?;
        let bag_b = self.bags.get(&b).ok_or(EngineError::UnknownCanonical(b))?;
        if a == b {
            return Ok(MergeOutcome::Unchanged(a));
        }

        if require_corroboration {
            let verdict = corroborate(bag_a, bag_b, &self.config.corroboration);
            if let Verdict::Declined(reason) = verdict {
                self.stats.declined_merges += 1;
                debug!(%a, %b, %reason, "Declined canonical merge");
                return Ok(MergeOutcome::Declined(reason));
            }
        }

        let (survivor, absorbed) = (a.min(b), a.max(b));
        self.union(survivor, absorbed);
        Ok(MergeOutcome::Merged { survivor, absorbed })
    }

    /// Resolves bare codes claimed by more than one canonical id and freezes
    /// the result into an [`IdentifierTable`].
    ///
    /// The owner of a bare code is the canonical id holding it under the most
    /// preferred namespace; on equal rank the first claim in sorted raw-id
    /// order keeps it. Losing claims are removed, and canonical ids left
    /// without identifiers are deleted.
    pub fn finalize_namespace(mut self) -> (IdentifierTable, ResolutionStats) {
        let policy = self.config.policy(self.kind).clone();

        let mut owners: HashMap<String, (CanonicalId, usize)> = HashMap::new();
        for (raw, &canonical) in &self.index {
            let rank = policy.rank(raw.namespace());
            owners
                .entry(raw.local().to_string())
                .and_modify(|(owner, owner_rank)| {
                    if *owner == canonical {
                        *owner_rank = (*owner_rank).min(rank);
                    } else if rank < *owner_rank {
                        *owner = canonical;
                        *owner_rank = rank;
                    }
                })
                .or_insert((canonical, rank));
        }

        let losing: Vec<(RawId, CanonicalId)> = self
            .index
            .iter()
            .filter(|(raw, canonical)| {
                owners
                    .get(raw.local())
                    .is_some_and(|(owner, _)| owner != *canonical)
            })
            .map(|(raw, canonical)| (raw.clone(), *canonical))
            .collect();

        for (raw, canonical) in &losing {
            self.index.remove(raw);
            if let Some(bag) = self.bags.get_mut(canonical) {
                bag.remove_id(raw);
            }
        }
        self.stats.dropped_claims += losing.len();

        let before = self.bags.len();
        self.bags.retain(|_, bag| !bag.ids().is_empty());
        self.stats.deleted_canonicals += before - self.bags.len();

        debug!(
            kind = %self.kind,
            dropped = losing.len(),
            deleted = before - self.bags.len(),
            "Finalized namespace"
        );

        let index = owners
            .into_iter()
            .map(|(bare, (owner, _))| (bare, owner))
            .collect();
        (
            IdentifierTable::from_parts(self.kind, index, self.bags),
            self.stats,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identifiers::properties::PropertyField;

    fn raw(s: &str) -> RawId {
        s.parse().unwrap()
    }

    fn metabolites() -> ResolutionBuilder {
        ResolutionBuilder::new(EntityKind::Metabolite, ResolutionConfig::default())
    }

    fn glucose(mass: &str, inchikey: &str) -> PropertyBag {
        PropertyBag::new()
            .with(PropertyField::Mass, [mass])
            .with(PropertyField::Inchikey, [inchikey])
            .with(PropertyField::Names, ["D-Glucose"])
    }

    #[test]
    fn primary_record_reuses_existing_canonical_id() {
        let mut builder = metabolites();
        let first = builder
            .ingest_primary_record(&[raw("kegg:C00031")], &PropertyBag::new())
            .unwrap();
        let second = builder
            .ingest_primary_record(
                &[raw("kegg:C00031")],
                &PropertyBag::new().with(PropertyField::Formula, ["C6H12O6", "-"]),
            )
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(builder.canonical_count(), 1);
        assert_eq!(
            builder.properties(first).unwrap().formula(),
            &["C6H12O6".to_string()]
        );
    }

    #[test]
    fn co_listed_ids_are_unioned_without_corroboration() {
        let mut builder = metabolites();
        let a = builder
            .ingest_primary_record(&[raw("seed:cpd00027")], &PropertyBag::new())
            .unwrap();
        let b = builder
            .ingest_primary_record(&[raw("bigg:glc__D")], &PropertyBag::new())
            .unwrap();

        let merged = builder
            .ingest_primary_record(&[raw("bigg:glc__D"), raw("seed:cpd00027")], &PropertyBag::new())
            .unwrap();

        assert_eq!(merged, a.min(b));
        assert_eq!(builder.canonical_count(), 1);
        assert_eq!(builder.canonical_of(&raw("bigg:glc__D")), Some(merged));
        assert_eq!(builder.stats().merges, 1);
    }

    #[test]
    fn cross_reference_binds_unindexed_identifier() {
        let mut builder = metabolites();
        let id = builder
            .ingest_primary_record(&[raw("kegg:C00031")], &PropertyBag::new())
            .unwrap();
        let outcome = builder
            .ingest_cross_reference(&raw("kegg:C00031"), &raw("chebi:4167"))
            .unwrap();

        assert_eq!(outcome, CrossReferenceOutcome::Bound(id));
        assert!(builder.properties(id).unwrap().ids().contains(&raw("chebi:4167")));
    }

    #[test]
    fn cross_reference_from_unknown_source_is_counted() {
        let mut builder = metabolites();
        let outcome = builder
            .ingest_cross_reference(&raw("kegg:C99999"), &raw("chebi:1"))
            .unwrap();
        assert_eq!(outcome, CrossReferenceOutcome::UnknownSource);
        assert_eq!(builder.stats().unknown_sources, 1);
        assert_eq!(builder.canonical_of(&raw("chebi:1")), None);
    }

    #[test]
    fn cross_reference_merges_when_corroborated() {
        let key = "WQZGKKKJIJFFOK-GASJEMHNSA-N";
        let mut builder = metabolites();
        let a = builder
            .ingest_primary_record(&[raw("kegg:C00031")], &glucose("180.06", key))
            .unwrap();
        let b = builder
            .ingest_primary_record(&[raw("bigg:glc__D")], &glucose("180.16", key))
            .unwrap();

        let outcome = builder
            .ingest_cross_reference(&raw("kegg:C00031"), &raw("bigg:glc__D"))
            .unwrap();

        assert_eq!(
            outcome,
            CrossReferenceOutcome::Merge(MergeOutcome::Merged {
                survivor: a,
                absorbed: b
            })
        );
        assert_eq!(builder.properties(a).unwrap().mass().len(), 2);
        assert!(builder.properties(b).is_none());
    }

    #[test]
    fn cross_reference_declines_on_inchikey_mismatch() {
        let mut builder = metabolites();
        let a = builder
            .ingest_primary_record(&[raw("kegg:C00031")], &glucose("180.06", "AAAA"))
            .unwrap();
        let b = builder
            .ingest_primary_record(&[raw("bigg:glc__D")], &glucose("180.06", "BBBB"))
            .unwrap();

        let outcome = builder
            .ingest_cross_reference(&raw("kegg:C00031"), &raw("bigg:glc__D"))
            .unwrap();

        assert!(matches!(
            outcome,
            CrossReferenceOutcome::Merge(MergeOutcome::Declined(DeclineReason::Contradicted(_)))
        ));
        assert_ne!(
            builder.canonical_of(&raw("kegg:C00031")),
            builder.canonical_of(&raw("bigg:glc__D"))
        );
        assert!(builder.properties(a).is_some() && builder.properties(b).is_some());
    }

    #[test]
    fn cross_reference_skips_targets_already_listing_the_source_database() {
        let mut builder = metabolites();
        builder.ingest_primary_record(&[raw("kegg:C00031")], &PropertyBag::new());
        builder.ingest_primary_record(
            &[raw("bigg:glc__D"), raw("kegg:C00267")],
            &PropertyBag::new(),
        );

        let outcome = builder
            .ingest_cross_reference(&raw("kegg:C00031"), &raw("bigg:glc__D"))
            .unwrap();
        assert_eq!(outcome, CrossReferenceOutcome::SameNamespace);
    }

    #[test]
    fn reactions_merge_without_corroboration() {
        let mut builder = ResolutionBuilder::new(EntityKind::Reaction, ResolutionConfig::default());
        let a = builder
            .ingest_primary_record(&[raw("metanetx:MNXR102535")], &PropertyBag::new())
            .unwrap();
        builder.ingest_primary_record(&[raw("bigg:PGI")], &PropertyBag::new());

        let outcome = builder
            .ingest_cross_reference(&raw("metanetx:MNXR102535"), &raw("bigg:PGI"))
            .unwrap();
        assert!(matches!(
            outcome,
            CrossReferenceOutcome::Merge(MergeOutcome::Merged { survivor, .. }) if survivor == a
        ));
    }

    #[test]
    fn merge_canonicals_is_idempotent_and_rejects_unknown_ids() {
        let mut builder = metabolites();
        let a = builder
            .ingest_primary_record(&[raw("kegg:C00031")], &PropertyBag::new())
            .unwrap();
        assert_eq!(
            builder.merge_canonicals(a, a, true).unwrap(),
            MergeOutcome::Unchanged(a)
        );
        assert!(matches!(
            builder.merge_canonicals(a, CanonicalId::new(99), false),
            Err(EngineError::UnknownCanonical(_))
        ));
    }

    #[test]
    fn finalize_gives_shared_bare_code_to_preferred_namespace() {
        let mut builder = metabolites();
        let metanetx = builder
            .ingest_primary_record(&[raw("metanetx:00001")], &PropertyBag::new())
            .unwrap();
        let chebi = builder
            .ingest_primary_record(&[raw("chebi:00001"), raw("chebi:CHEBI:1")], &PropertyBag::new())
            .unwrap();
        let kegg = builder
            .ingest_primary_record(&[raw("kegg:00001")], &PropertyBag::new())
            .unwrap();

        let (table, stats) = builder.finalize_namespace();

        assert_eq!(table.lookup("00001"), Some(kegg));
        assert_eq!(table.lookup("CHEBI:1"), Some(chebi));
        assert!(table.properties(metanetx).is_none());
        assert_eq!(stats.dropped_claims, 2);
        assert_eq!(stats.deleted_canonicals, 1);
    }

    #[test]
    fn finalize_keeps_codes_shared_within_one_canonical_id() {
        let mut builder = metabolites();
        let id = builder
            .ingest_primary_record(&[raw("seed:00001"), raw("kegg:00001")], &PropertyBag::new())
            .unwrap();
        let (table, stats) = builder.finalize_namespace();
        assert_eq!(table.lookup("00001"), Some(id));
        assert_eq!(table.properties(id).unwrap().ids().len(), 2);
        assert_eq!(stats.dropped_claims, 0);
    }

    #[test]
    fn rebuilding_from_the_same_records_yields_the_same_partition() {
        let records = vec![
            FeedRecord::primary(vec![raw("kegg:C00031")], glucose("180.06", "KEY")),
            FeedRecord::primary(vec![raw("bigg:glc__D")], glucose("180.1", "KEY")),
            FeedRecord::primary(
                vec![raw("seed:cpd00027"), raw("seed:cpd26821")],
                PropertyBag::new(),
            ),
            FeedRecord::cross_reference(
                raw("kegg:C00031"),
                vec![raw("bigg:glc__D"), raw("chebi:4167")],
            ),
        ];
        let build = || {
            let mut builder = metabolites();
            for record in &records {
                builder.ingest_record(record).unwrap();
            }
            builder.finalize_namespace().0
        };

        let first = build();
        let second = build();
        assert_eq!(first.partition(), second.partition());
        assert_eq!(first.lookup("glc__D"), first.lookup("4167"));
    }
}
