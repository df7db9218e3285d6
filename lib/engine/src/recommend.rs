//! Recommendation orchestration.
//!
//! A request embeds the query record, retrieves `k * oversampling`
//! candidates from the opposite collection, drops candidates that fail the
//! hard filter, re-scores the rest exactly and returns the top `k`.
//!
//! Candidate preparation runs sequentially; scoring fans out over the rayon
//! pool. Both phases check the request's [`CancellationToken`] between
//! candidates.

use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::records::RecordSource;
use ahash::AHashMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use talentmatch_core::index::rank_order;
use talentmatch_core::{
    CareerStage, CollectionStats, EmbeddingVector, EntityType, Error, Filter, IndexMode, Industry,
    JobRecord, RecordFilter, RecordRef, Result, ResumeRecord, Staleness, Vector, VectorStore,
};
use talentmatch_embed::{EmbeddingCapability, EmbeddingNormalizer};
use talentmatch_scoring::{
    JobSignals, MarketSignals, MatchResult, MatchStats, PreferenceOverrides, ResolvedWeights,
    ScoringEngine, WeightProfileResolver,
};

/// The record recommendations are computed for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "record", rename_all = "snake_case")]
pub enum QueryEntity {
    Job(JobRecord),
    Resume(ResumeRecord),
}

impl QueryEntity {
    pub fn as_record(&self) -> RecordRef<'_> {
        match self {
            QueryEntity::Job(job) => RecordRef::Job(job),
            QueryEntity::Resume(resume) => RecordRef::Resume(resume),
        }
    }

    pub fn entity_type(&self) -> EntityType {
        self.as_record().entity_type()
    }

    pub fn id(&self) -> &str {
        self.as_record().id()
    }
}

impl From<JobRecord> for QueryEntity {
    fn from(job: JobRecord) -> Self {
        QueryEntity::Job(job)
    }
}

impl From<ResumeRecord> for QueryEntity {
    fn from(resume: ResumeRecord) -> Self {
        QueryEntity::Resume(resume)
    }
}

#[derive(Debug, Clone)]
pub struct RecommendationRequest {
    pub query: QueryEntity,
    pub k: usize,
    pub filter: Option<RecordFilter>,
    pub overrides: PreferenceOverrides,
    pub market: MarketSignals,
    /// Market demand / career growth per job id; absent jobs score neutral
    pub job_signals: AHashMap<String, JobSignals>,
    pub cancellation: Option<CancellationToken>,
}

impl RecommendationRequest {
    pub fn new(query: impl Into<QueryEntity>, k: usize) -> Self {
        Self {
            query: query.into(),
            k,
            filter: None,
            overrides: PreferenceOverrides::new(),
            market: MarketSignals::default(),
            job_signals: AHashMap::new(),
            cancellation: None,
        }
    }

    /// Jobs for a candidate
    pub fn for_resume(resume: ResumeRecord, k: usize) -> Self {
        Self::new(resume, k)
    }

    /// Candidates for a job
    pub fn for_job(job: JobRecord, k: usize) -> Self {
        Self::new(job, k)
    }

    #[must_use]
    pub fn with_filter(mut self, filter: RecordFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: PreferenceOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    #[must_use]
    pub fn with_market(mut self, market: MarketSignals) -> Self {
        self.market = market;
        self
    }

    #[must_use]
    pub fn with_job_signals(mut self, job_id: impl Into<String>, signals: JobSignals) -> Self {
        self.job_signals.insert(job_id.into(), signals);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// What happened to the retrieved candidates of one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub query_id: String,
    pub target: EntityType,
    pub requested: usize,
    /// Candidates returned by vector search
    pub retrieved: usize,
    /// Rejected by the hard filter
    pub filtered: usize,
    /// Record or stored vector no longer available
    pub skipped_missing: usize,
    /// Failed to score
    pub skipped_failed: usize,
    /// Scored with base weights after the adjusted profile degenerated
    pub weight_fallbacks: usize,
    pub returned: usize,
    pub index_mode: IndexMode,
    /// Set when the searched collection asks for a rebuild
    pub stale: Option<Staleness>,
    pub elapsed_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Best first, ranks starting at 1
    pub results: Vec<MatchResult>,
    pub diagnostics: Diagnostics,
}

impl Recommendations {
    pub fn stats(&self) -> MatchStats {
        MatchStats::compute(&self.results, self.diagnostics.retrieved)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

enum CandidateRecord {
    Job(Arc<JobRecord>),
    Resume(Arc<ResumeRecord>),
}

impl CandidateRecord {
    fn as_record(&self) -> RecordRef<'_> {
        match self {
            CandidateRecord::Job(job) => RecordRef::Job(job),
            CandidateRecord::Resume(resume) => RecordRef::Resume(resume),
        }
    }
}

struct Candidate {
    record: CandidateRecord,
    embedding: Arc<EmbeddingVector>,
    weights: ResolvedWeights,
}

/// Profile-derived overrides for the resume side, followed by the request's own.
///
/// Resumes carry no salary-sensitivity or growth-focus signal, so both stay neutral.
fn candidate_overrides(resume: &ResumeRecord, request: &PreferenceOverrides) -> PreferenceOverrides {
    const NEUTRAL: f32 = 0.5;
    PreferenceOverrides::from_profile(resume.remote_preference, NEUTRAL, NEUTRAL).extend(request)
}

/// Job side and resume side of a query/candidate pair
fn pair<'a>(
    query: RecordRef<'a>,
    candidate: RecordRef<'a>,
) -> Option<(&'a JobRecord, &'a ResumeRecord)> {
    match (query, candidate) {
        (RecordRef::Job(job), RecordRef::Resume(resume))
        | (RecordRef::Resume(resume), RecordRef::Job(job)) => Some((job, resume)),
        _ => None,
    }
}

pub struct Recommender {
    config: EngineConfig,
    normalizer: EmbeddingNormalizer,
    scoring: ScoringEngine,
    store: Arc<VectorStore>,
    records: Arc<dyn RecordSource>,
}

impl Recommender {
    pub fn new(
        config: EngineConfig,
        capability: Arc<dyn EmbeddingCapability>,
        records: Arc<dyn RecordSource>,
    ) -> Result<Self> {
        config.validate()?;
        if capability.dimensions() != config.store.jobs.dim {
            return Err(Error::InvalidDimension {
                expected: config.store.jobs.dim,
                actual: capability.dimensions(),
            });
        }

        let resolver = WeightProfileResolver::new(config.weights.clone())?;
        let scoring = ScoringEngine::new(config.scoring.clone(), config.skills.clone(), resolver);
        let store = Arc::new(VectorStore::new(config.store.clone())?);

        tracing::info!(
            model = capability.model_name(),
            dim = capability.dimensions(),
            oversampling = config.oversampling,
            "recommender ready"
        );

        Ok(Self {
            config,
            normalizer: EmbeddingNormalizer::new(capability),
            scoring,
            store,
            records,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<VectorStore> {
        &self.store
    }

    pub fn scoring(&self) -> &ScoringEngine {
        &self.scoring
    }

    pub fn normalizer(&self) -> &EmbeddingNormalizer {
        &self.normalizer
    }

    /// Embed and stage a job. The record itself stays with the [`RecordSource`].
    pub fn ingest_job(&self, job: &JobRecord) -> Result<()> {
        let embedding = self.normalizer.embed_job(job)?;
        self.store.upsert_embedding(embedding)
    }

    pub fn ingest_resume(&self, resume: &ResumeRecord) -> Result<()> {
        let embedding = self.normalizer.embed_resume(resume)?;
        self.store.upsert_embedding(embedding)
    }

    pub fn remove(&self, entity_type: EntityType, id: &str) -> bool {
        self.store.remove(entity_type, id)
    }

    pub fn rebuild_all(&self) -> Vec<CollectionStats> {
        EntityType::ALL
            .into_iter()
            .map(|entity_type| self.store.rebuild(entity_type))
            .collect()
    }

    pub fn recommend(&self, request: &RecommendationRequest) -> Result<Recommendations> {
        let started = Instant::now();
        if request.k == 0 {
            return Err(Error::InvalidArgument("k must be positive".into()));
        }
        request.overrides.validate()?;
        let market = request.market.validated()?;

        let query = request.query.as_record();
        let target = query.entity_type().opposite();
        let query_vector = self.query_vector(query)?;

        let limit = request.k.saturating_mul(self.config.oversampling);
        let outcome = self.store.search(target, &query_vector, limit)?;
        if let Some(staleness) = &outcome.staleness {
            tracing::debug!(
                collection = %target,
                reason = %staleness.reason,
                indexed = staleness.indexed,
                current = staleness.current,
                "searching a stale index"
            );
        }

        let mut diagnostics = Diagnostics {
            query_id: query.id().to_string(),
            target,
            requested: request.k,
            retrieved: outcome.hits.len(),
            filtered: 0,
            skipped_missing: 0,
            skipped_failed: 0,
            weight_fallbacks: 0,
            returned: 0,
            index_mode: outcome.mode,
            stale: outcome.staleness,
            elapsed_ms: 0,
        };

        // Remote preference is keyed by bit pattern; it feeds the profile overrides
        let mut weight_cache: AHashMap<(Industry, CareerStage, u32), ResolvedWeights> =
            AHashMap::new();
        let mut candidates = Vec::with_capacity(outcome.hits.len());
        for hit in &outcome.hits {
            request.check_cancelled()?;

            let Some(record) = self.candidate_record(target, &hit.id) else {
                diagnostics.skipped_missing += 1;
                continue;
            };
            if let Some(filter) = &request.filter {
                if !filter.matches(record.as_record()) {
                    diagnostics.filtered += 1;
                    continue;
                }
            }
            let Some(embedding) = self.store.get(target, &hit.id) else {
                diagnostics.skipped_missing += 1;
                continue;
            };
            let Some((job, resume)) = pair(query, record.as_record()) else {
                diagnostics.skipped_failed += 1;
                continue;
            };

            let key = (
                job.industry(),
                resume.career_stage(),
                resume.remote_preference.to_bits(),
            );
            let weights = match weight_cache.get(&key) {
                Some(weights) => *weights,
                None => {
                    let overrides = candidate_overrides(resume, &request.overrides);
                    let resolved = self.scoring.weights_for(key.0, key.1, &overrides, &market)?;
                    weight_cache.insert(key, resolved);
                    resolved
                }
            };
            if weights.fallback {
                diagnostics.weight_fallbacks += 1;
            }

            candidates.push(Candidate {
                record,
                embedding,
                weights,
            });
        }

        let scored: Vec<Option<MatchResult>> = candidates
            .par_iter()
            .map(|candidate| {
                request.check_cancelled()?;
                Ok(self.score_candidate(request, query, &query_vector, candidate))
            })
            .collect::<Result<_>>()?;

        let mut results: Vec<MatchResult> = Vec::with_capacity(scored.len());
        for result in scored {
            match result {
                Some(result) => results.push(result),
                None => diagnostics.skipped_failed += 1,
            }
        }

        results.sort_by(|a, b| rank_order(a.score, a.counterpart_id(), b.score, b.counterpart_id()));
        results.truncate(request.k);
        for (i, result) in results.iter_mut().enumerate() {
            result.rank = i + 1;
        }

        diagnostics.returned = results.len();
        diagnostics.elapsed_ms = started.elapsed().as_millis() as u64;

        tracing::debug!(
            query = %diagnostics.query_id,
            target = %target,
            retrieved = diagnostics.retrieved,
            filtered = diagnostics.filtered,
            skipped_missing = diagnostics.skipped_missing,
            skipped_failed = diagnostics.skipped_failed,
            returned = diagnostics.returned,
            elapsed_ms = diagnostics.elapsed_ms,
            "recommendation complete"
        );

        Ok(Recommendations {
            results,
            diagnostics,
        })
    }

    fn query_vector(&self, query: RecordRef<'_>) -> Result<Vector> {
        let embedding = self.normalizer.embed_record(query)?;
        if embedding.vector.norm() <= f32::EPSILON {
            return Err(Error::EmbeddingCapability(format!(
                "{} returned a zero vector for '{}'",
                self.normalizer.model_name(),
                query.id()
            )));
        }
        Ok(if embedding.vector.is_unit() {
            embedding.vector
        } else {
            embedding.vector.normalized()
        })
    }

    fn candidate_record(&self, target: EntityType, id: &str) -> Option<CandidateRecord> {
        match target {
            EntityType::Job => self.records.job(id).map(CandidateRecord::Job),
            EntityType::Resume => self.records.resume(id).map(CandidateRecord::Resume),
        }
    }

    /// `None` when the pair fails to score; the failure is logged.
    fn score_candidate(
        &self,
        request: &RecommendationRequest,
        query: RecordRef<'_>,
        query_vector: &Vector,
        candidate: &Candidate,
    ) -> Option<MatchResult> {
        let candidate_ref = candidate.record.as_record();
        let (job, resume) = pair(query, candidate_ref)?;
        let (job_vector, resume_vector) = match query {
            RecordRef::Job(_) => (query_vector, &candidate.embedding.vector),
            RecordRef::Resume(_) => (&candidate.embedding.vector, query_vector),
        };
        let signals = request.job_signals.get(&job.id).copied().unwrap_or_default();

        match self.scoring.score(
            job,
            resume,
            &candidate.weights.profile,
            job_vector,
            resume_vector,
            signals,
        ) {
            Ok(mut result) => {
                result.weight_fallback = candidate.weights.fallback;
                Some(result.with_counterpart(candidate_ref.entity_type()))
            }
            Err(e) => {
                tracing::warn!(
                    candidate = candidate_ref.id(),
                    error = %e,
                    "skipping candidate that failed to score"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::InMemoryRecords;
    use talentmatch_core::{FilterCondition, RemotePolicy};
    use talentmatch_embed::HashingEmbedder;
    use talentmatch_scoring::Factor;

    const DIM: usize = 64;

    fn recommender() -> (Recommender, Arc<InMemoryRecords>) {
        let records = Arc::new(InMemoryRecords::new());
        let recommender = Recommender::new(
            EngineConfig::with_dim(DIM),
            Arc::new(HashingEmbedder::new(DIM)),
            records.clone(),
        )
        .unwrap();
        (recommender, records)
    }

    fn add_job(recommender: &Recommender, records: &InMemoryRecords, job: JobRecord) {
        recommender.ingest_job(&job).unwrap();
        records.insert_job(job);
    }

    fn add_resume(recommender: &Recommender, records: &InMemoryRecords, resume: ResumeRecord) {
        recommender.ingest_resume(&resume).unwrap();
        records.insert_resume(resume);
    }

    fn seeded() -> (Recommender, Arc<InMemoryRecords>) {
        let (recommender, records) = recommender();
        add_job(
            &recommender,
            &records,
            JobRecord::new("j-austin", "Data Engineer")
                .with_required_skills(["Python", "SQL"])
                .with_preferred_skills(["Docker"])
                .with_experience(3.0, 7.0)
                .with_salary(Some(100_000.0), Some(140_000.0))
                .with_location("Austin, TX", RemotePolicy::OnSite),
        );
        add_job(
            &recommender,
            &records,
            JobRecord::new("j-remote", "Backend Engineer")
                .with_required_skills(["Python", "Go"])
                .with_experience(2.0, 6.0)
                .with_salary(Some(90_000.0), Some(120_000.0))
                .with_location("Denver, CO", RemotePolicy::Remote),
        );
        add_job(
            &recommender,
            &records,
            JobRecord::new("j-nurse", "Registered Nurse")
                .with_required_skills(["Patient Care"])
                .with_experience(1.0, 10.0)
                .with_location("Boston, MA", RemotePolicy::OnSite),
        );
        (recommender, records)
    }

    fn candidate() -> ResumeRecord {
        ResumeRecord::new("r1", "Kim Lee")
            .with_role("Data Engineer")
            .with_skills(["Python", "SQL", "Docker"])
            .with_experience(5.0)
            .with_location("Austin, TX")
            .with_salary_expectation(120_000.0)
    }

    #[test]
    fn test_recommend_ranks_and_explains() {
        let (recommender, _records) = seeded();
        let recs = recommender
            .recommend(&RecommendationRequest::for_resume(candidate(), 10))
            .unwrap();

        assert_eq!(recs.len(), 3);
        assert_eq!(recs.results[0].job_id, "j-austin");
        assert_eq!(recs.results[0].counterpart, EntityType::Job);
        assert!((recs.results[0].factor_score(Factor::Skill) - 1.0).abs() < 1e-6);
        for (i, result) in recs.results.iter().enumerate() {
            assert_eq!(result.rank, i + 1);
            assert_eq!(result.resume_id, "r1");
        }
        assert!(recs.results.windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(recs.diagnostics.retrieved, 3);
        assert_eq!(recs.diagnostics.returned, 3);
        assert_eq!(recs.stats().results_count, 3);
    }

    #[test]
    fn test_fewer_eligible_than_k() {
        let (recommender, _records) = seeded();
        let request = RecommendationRequest::for_resume(candidate(), 5).with_filter(
            RecordFilter::new(FilterCondition::HasSkill {
                skill: "python".into(),
            }),
        );
        let recs = recommender.recommend(&request).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs.diagnostics.filtered, 1);
        assert!(recs.results.iter().all(|r| r.job_id != "j-nurse"));
    }

    #[test]
    fn test_k_truncates() {
        let (recommender, _records) = seeded();
        let recs = recommender
            .recommend(&RecommendationRequest::for_resume(candidate(), 1))
            .unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs.results[0].rank, 1);
    }

    #[test]
    fn test_zero_k_is_rejected() {
        let (recommender, _records) = seeded();
        let err = recommender
            .recommend(&RecommendationRequest::for_resume(candidate(), 0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_invalid_query_record_is_rejected() {
        let (recommender, _records) = seeded();
        let bad = candidate().with_experience(-3.0);
        assert!(recommender
            .recommend(&RecommendationRequest::for_resume(bad, 3))
            .is_err());
    }

    #[test]
    fn test_missing_records_are_skipped() {
        let (recommender, records) = seeded();
        records.remove(EntityType::Job, "j-remote");
        let recs = recommender
            .recommend(&RecommendationRequest::for_resume(candidate(), 10))
            .unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs.diagnostics.skipped_missing, 1);
    }

    #[test]
    fn test_job_query_returns_candidates() {
        let (recommender, records) = seeded();
        add_resume(&recommender, &records, candidate());
        add_resume(
            &recommender,
            &records,
            ResumeRecord::new("r2", "Sam Park")
                .with_skills(["Java"])
                .with_experience(1.0)
                .with_location("Seattle, WA"),
        );
        let job = records.job("j-austin").unwrap().as_ref().clone();

        let recs = recommender
            .recommend(&RecommendationRequest::for_job(job, 5))
            .unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs.results[0].counterpart, EntityType::Resume);
        assert_eq!(recs.results[0].counterpart_id(), "r1");
        assert_eq!(recs.results[0].job_id, "j-austin");
    }

    #[test]
    fn test_job_signals_are_used() {
        let (recommender, _records) = seeded();
        let request = RecommendationRequest::for_resume(candidate(), 10).with_job_signals(
            "j-remote",
            JobSignals {
                market_demand: Some(1.0),
                career_growth: Some(0.9),
            },
        );
        let recs = recommender.recommend(&request).unwrap();
        let remote = recs.results.iter().find(|r| r.job_id == "j-remote").unwrap();
        assert_eq!(remote.factor_score(Factor::MarketDemand), 1.0);
        assert_eq!(remote.factor_score(Factor::CareerGrowth), 0.9);
        let austin = recs.results.iter().find(|r| r.job_id == "j-austin").unwrap();
        assert_eq!(austin.factor_score(Factor::MarketDemand), 0.5);
    }

    #[test]
    fn test_degenerate_overrides_fall_back() {
        let (recommender, _records) = seeded();
        let mut overrides = PreferenceOverrides::new();
        for factor in Factor::ALL {
            overrides = overrides.scale(factor, 0.0);
        }
        let recs = recommender
            .recommend(&RecommendationRequest::for_resume(candidate(), 10).with_overrides(overrides))
            .unwrap();
        assert_eq!(recs.len(), 3);
        assert_eq!(recs.diagnostics.weight_fallbacks, 3);
        assert!(recs.results.iter().all(|r| r.weight_fallback));
    }

    #[test]
    fn test_cancelled_request() {
        let (recommender, _records) = seeded();
        let token = CancellationToken::new();
        token.cancel();
        let err = recommender
            .recommend(&RecommendationRequest::for_resume(candidate(), 3).with_cancellation(token))
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    #[test]
    fn test_removed_vectors_are_not_recommended() {
        let (recommender, _records) = seeded();
        assert!(recommender.remove(EntityType::Job, "j-nurse"));
        recommender.rebuild_all();
        let recs = recommender
            .recommend(&RecommendationRequest::for_resume(candidate(), 10))
            .unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs.diagnostics.retrieved, 2);
    }

    #[test]
    fn test_capability_dimension_must_match_store() {
        let result = Recommender::new(
            EngineConfig::with_dim(DIM),
            Arc::new(HashingEmbedder::new(DIM + 1)),
            Arc::new(InMemoryRecords::new()),
        );
        assert!(matches!(result, Err(Error::InvalidDimension { .. })));
    }

    fn denver_job() -> JobRecord {
        JobRecord::new("j-denver", "Data Engineer")
            .with_required_skills(["Python", "SQL"])
            .with_experience(3.0, 7.0)
            .with_location("Denver, CO", RemotePolicy::OnSite)
    }

    fn location_weight(result: &MatchResult) -> f32 {
        result.breakdown.get(Factor::Location).unwrap().weight
    }

    #[test]
    fn test_remote_preference_lowers_location_weight() {
        let (recommender, records) = recommender();
        add_job(&recommender, &records, denver_job());

        let top = |preference: f32| {
            let resume = candidate().with_remote_preference(preference);
            let mut recs = recommender
                .recommend(&RecommendationRequest::for_resume(resume, 1))
                .unwrap();
            recs.results.remove(0)
        };
        let remote_leaning = top(0.95);
        let office_leaning = top(0.05);

        assert_eq!(remote_leaning.factor_score(Factor::Location), 0.0);
        assert!(location_weight(&remote_leaning) < location_weight(&office_leaning));
        assert!(remote_leaning.score > office_leaning.score);
    }

    #[test]
    fn test_job_query_weighs_each_candidate_profile() {
        let (recommender, records) = recommender();
        add_resume(&recommender, &records, candidate().with_remote_preference(0.95));
        let mut office = candidate().with_remote_preference(0.05);
        office.id = "r2".into();
        add_resume(&recommender, &records, office);

        let recs = recommender
            .recommend(&RecommendationRequest::for_job(denver_job(), 5))
            .unwrap();
        assert_eq!(recs.len(), 2);
        let by_id = |id: &str| recs.results.iter().find(|r| r.resume_id == id).unwrap();
        assert!(location_weight(by_id("r1")) < location_weight(by_id("r2")));
        assert_eq!(recs.results[0].resume_id, "r1");
    }
}
