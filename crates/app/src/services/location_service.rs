//! Location service — search, remote sync and the saved user location.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use devmgmt_domain::error::{DevMgmtError, NotFoundError, ValidationError};
use devmgmt_domain::location::{
    DistrictMerge, LocationFilter, LocationRecord, LocationType, StateReconciliation,
    district_parent_id, reconcile_districts, reconcile_states,
};

use crate::ports::{
    BootstrapSource, Collection, Document, DocumentStore, ListOptions, LocationSource, Selector,
};

/// Settings document holding the location chosen by the user.
pub const SAVED_LOCATION_ID: &str = "location";

/// Application service for location lookups.
///
/// When a remote source is configured, searches go online first and the
/// results are written back to the local store; the local store answers when
/// the remote is unavailable.
pub struct LocationService<S, L> {
    store: S,
    remote: Option<L>,
}

impl<S: DocumentStore, L: LocationSource> LocationService<S, L> {
    /// Create a new service backed by `store`, optionally synced from `remote`.
    pub fn new(store: S, remote: Option<L>) -> Self {
        Self { store, remote }
    }

    /// Search locations, preferring the remote source.
    ///
    /// # Errors
    ///
    /// Returns the local search error when the remote is absent or fails.
    #[tracing::instrument(skip(self), fields(location_type = filter.location_type.as_str()))]
    pub async fn search(
        &self,
        filter: &LocationFilter,
    ) -> Result<Vec<LocationRecord>, DevMgmtError> {
        if self.remote.is_some() {
            match self.sync_from_remote(filter).await {
                Ok(records) => return Ok(records),
                Err(err) => {
                    tracing::warn!(error = %err, "remote location search failed, using local data");
                }
            }
        }
        self.search_local(filter).await
    }

    /// Answer a search from the local store only.
    ///
    /// States are returned without their districts; a district search
    /// returns the districts of the matched state.
    ///
    /// # Errors
    ///
    /// Returns [`DevMgmtError::NotFound`] when a district search names an
    /// unknown state, or a storage error from the store.
    pub async fn search_local(
        &self,
        filter: &LocationFilter,
    ) -> Result<Vec<LocationRecord>, DevMgmtError> {
        let selector = filter
            .parent_id
            .as_ref()
            .map_or_else(Selector::all, |id| Selector::eq("id", id.as_str()));
        let states = decode_all(self.store.find(Collection::Location, &selector).await?)?;
        tracing::debug!(count = states.len(), "read locations from local store");

        match filter.location_type {
            LocationType::State => Ok(states
                .into_iter()
                .map(LocationRecord::into_summary)
                .collect()),
            LocationType::District => states
                .into_iter()
                .next()
                .map(|state| state.data)
                .ok_or_else(|| {
                    NotFoundError {
                        entity: "Location",
                        id: filter.parent_id.clone().unwrap_or_default(),
                    }
                    .into()
                }),
        }
    }

    /// Fetch from the remote source and persist what came back.
    ///
    /// Persistence failures are logged and do not fail the search. The
    /// returned records never carry embedded children.
    ///
    /// # Errors
    ///
    /// Returns [`DevMgmtError::Upstream`] when no remote is configured or the
    /// remote call fails.
    pub async fn sync_from_remote(
        &self,
        filter: &LocationFilter,
    ) -> Result<Vec<LocationRecord>, DevMgmtError> {
        let remote = self
            .remote
            .as_ref()
            .ok_or_else(|| DevMgmtError::upstream("no remote location source configured"))?;
        let records = remote.search(filter).await?;
        tracing::debug!(count = records.len(), "fetched locations from remote");

        let persisted = match filter.location_type {
            LocationType::State => self.insert_states(records.clone()).await.map(|_| ()),
            LocationType::District if records.is_empty() => {
                tracing::info!("district data is empty");
                Ok(())
            }
            LocationType::District => self.update_districts(records.clone()).await.map(|_| ()),
        };
        if let Err(err) = persisted {
            tracing::error!(error = %err, "failed to store remote location data");
        }

        Ok(records.into_iter().map(LocationRecord::into_summary).collect())
    }

    /// Merge remote states into the store: unknown ids are inserted, known
    /// ids are replaced. A known state whose remote record carries no
    /// districts keeps the districts already stored.
    ///
    /// # Errors
    ///
    /// Returns a storage error from the store.
    #[tracing::instrument(skip_all, fields(remote = remote_states.len()))]
    pub async fn insert_states(
        &self,
        remote_states: Vec<LocationRecord>,
    ) -> Result<StateReconciliation, DevMgmtError> {
        let local: HashMap<String, LocationRecord> =
            decode_all(self.store.find(Collection::Location, &Selector::all()).await?)?
                .into_iter()
                .map(|state| (state.id.clone(), state))
                .collect();
        let local_ids: HashSet<String> = local.keys().cloned().collect();

        let mut reconciliation = reconcile_states(remote_states, &local_ids);
        if reconciliation.is_empty() {
            tracing::info!("state data is empty");
            return Ok(reconciliation);
        }

        for state in &mut reconciliation.to_update {
            if state.data.is_empty()
                && let Some(existing) = local.get(&state.id)
            {
                state.data.clone_from(&existing.data);
            }
        }

        if !reconciliation.to_insert.is_empty() {
            tracing::info!(count = reconciliation.to_insert.len(), "bulk insert of states");
            self.store
                .bulk(Collection::Location, encode_all(&reconciliation.to_insert)?)
                .await?;
        }
        if !reconciliation.to_update.is_empty() {
            tracing::info!(count = reconciliation.to_update.len(), "bulk update of states");
            self.store
                .bulk(Collection::Location, encode_all(&reconciliation.to_update)?)
                .await?;
        }
        Ok(reconciliation)
    }

    /// Replace the districts of their parent state.
    ///
    /// # Errors
    ///
    /// Returns [`DevMgmtError::Validation`] for an empty or mixed district
    /// list, [`DevMgmtError::NotFound`] when the parent state is not stored,
    /// or a storage error from the store.
    #[tracing::instrument(skip_all, fields(districts = districts.len()))]
    pub async fn update_districts(
        &self,
        districts: Vec<LocationRecord>,
    ) -> Result<DistrictMerge, DevMgmtError> {
        let parent_id = district_parent_id(&districts)?.to_string();
        let state = self
            .store
            .get(Collection::Location, &parent_id)
            .await?
            .map(decode)
            .transpose()?;

        let merge = reconcile_districts(districts, state)?;
        tracing::info!(parent_id = %merge.parent_id, "updating districts of state");
        self.store
            .update(Collection::Location, encode(&merge.merged_state)?)
            .await?;
        Ok(merge)
    }

    /// Store the location picked by the user.
    ///
    /// Both `state` and `city` must be JSON objects; this is checked before
    /// the store is touched.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MalformedLocation`] for malformed input, or
    /// a storage error from the store.
    pub async fn save_location(&self, request: Value) -> Result<Value, DevMgmtError> {
        let is_object = |key: &str| request.get(key).is_some_and(Value::is_object);
        if !is_object("state") || !is_object("city") {
            return Err(ValidationError::MalformedLocation.into());
        }
        self.store
            .upsert(
                Collection::Settings,
                Document::new(SAVED_LOCATION_ID, request.clone()),
            )
            .await?;
        Ok(request)
    }

    /// Load the bundled states and districts into an empty store.
    ///
    /// Returns the number of states inserted (zero when the store already
    /// holds location data).
    ///
    /// # Errors
    ///
    /// Returns errors from the bootstrap source or the store.
    #[tracing::instrument(skip_all)]
    pub async fn bootstrap<B: BootstrapSource>(&self, source: &B) -> Result<usize, DevMgmtError> {
        let existing = self
            .store
            .list(Collection::Location, ListOptions::limit(1))
            .await?;
        if !existing.is_empty() {
            tracing::debug!("location data already present");
            return Ok(0);
        }

        let mut states = source.read_states().await?;
        for state in &mut states {
            state.data = source.read_districts(&state.id).await?;
        }
        if states.is_empty() {
            return Ok(0);
        }

        tracing::debug!(count = states.len(), "inserting bundled location data");
        self.store
            .bulk(Collection::Location, encode_all(&states)?)
            .await?;
        Ok(states.len())
    }
}

fn decode(document: Document) -> Result<LocationRecord, DevMgmtError> {
    serde_json::from_value(document.body).map_err(DevMgmtError::storage)
}

fn decode_all(documents: Vec<Document>) -> Result<Vec<LocationRecord>, DevMgmtError> {
    documents.into_iter().map(decode).collect()
}

fn encode(record: &LocationRecord) -> Result<Document, DevMgmtError> {
    let body = serde_json::to_value(record).map_err(DevMgmtError::storage)?;
    Ok(Document::new(record.id.clone(), body))
}

fn encode_all(records: &[LocationRecord]) -> Result<Vec<Document>, DevMgmtError> {
    records.iter().map(encode).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryStore;
    use devmgmt_domain::location::LocationFilter;
    use serde_json::json;
    use std::future::Future;
    use std::sync::Mutex;

    struct FakeRemote {
        result: Mutex<Option<Result<Vec<LocationRecord>, DevMgmtError>>>,
    }

    impl FakeRemote {
        fn answering(records: Vec<LocationRecord>) -> Self {
            Self {
                result: Mutex::new(Some(Ok(records))),
            }
        }

        fn failing() -> Self {
            Self {
                result: Mutex::new(Some(Err(DevMgmtError::upstream("offline")))),
            }
        }
    }

    impl LocationSource for FakeRemote {
        fn search(
            &self,
            _filter: &LocationFilter,
        ) -> impl Future<Output = Result<Vec<LocationRecord>, DevMgmtError>> + Send {
            let result = self
                .result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Ok(Vec::new()));
            async { result }
        }
    }

    struct FakeBootstrap;

    impl BootstrapSource for FakeBootstrap {
        async fn read_states(&self) -> Result<Vec<LocationRecord>, DevMgmtError> {
            Ok(vec![state("ka"), state("tn")])
        }

        async fn read_districts(&self, state_id: &str) -> Result<Vec<LocationRecord>, DevMgmtError> {
            if state_id == "ka" {
                Ok(vec![district("blr", "ka")])
            } else {
                Ok(Vec::new())
            }
        }

        async fn read_resource_bundles(
            &self,
        ) -> Result<Vec<crate::ports::ResourceBundleFile>, DevMgmtError> {
            Ok(Vec::new())
        }
    }

    fn state(id: &str) -> LocationRecord {
        LocationRecord::new(id).with_field("type", "state")
    }

    fn district(id: &str, parent: &str) -> LocationRecord {
        LocationRecord::new(id)
            .with_parent(parent)
            .with_field("type", "district")
    }

    fn seed_state(store: &InMemoryStore, record: &LocationRecord) {
        store.seed(Collection::Location, encode(record).unwrap());
    }

    fn offline(store: InMemoryStore) -> LocationService<InMemoryStore, FakeRemote> {
        LocationService::new(store, None)
    }

    fn stored(service: &LocationService<InMemoryStore, FakeRemote>) -> Vec<LocationRecord> {
        decode_all(service.store.snapshot(Collection::Location)).unwrap()
    }

    fn states_filter() -> LocationFilter {
        LocationFilter::parse(Some("state"), None).unwrap()
    }

    fn districts_filter(parent: &str) -> LocationFilter {
        LocationFilter::parse(Some("district"), Some(parent)).unwrap()
    }

    #[tokio::test]
    async fn should_return_states_without_districts_from_local_store() {
        let store = InMemoryStore::default();
        seed_state(&store, &state("ka").with_data(vec![district("blr", "ka")]));
        seed_state(&store, &state("tn"));
        let svc = offline(store);

        let states = svc.search(&states_filter()).await.unwrap();
        assert_eq!(states.len(), 2);
        assert!(states.iter().all(|s| s.data.is_empty()));
    }

    #[tokio::test]
    async fn should_return_districts_of_matched_state() {
        let store = InMemoryStore::default();
        seed_state(
            &store,
            &state("ka").with_data(vec![district("blr", "ka"), district("mys", "ka")]),
        );
        let svc = offline(store);

        let districts = svc.search(&districts_filter("ka")).await.unwrap();
        let ids: Vec<&str> = districts.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["blr", "mys"]);
    }

    #[tokio::test]
    async fn should_return_not_found_for_districts_of_unknown_state() {
        let svc = offline(InMemoryStore::default());
        let result = svc.search(&districts_filter("zz")).await;
        assert!(matches!(result, Err(DevMgmtError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_insert_new_states_and_update_known_ones() {
        let store = InMemoryStore::default();
        seed_state(&store, &state("ka").with_data(vec![district("blr", "ka")]));
        let svc = offline(store);

        let result = svc
            .insert_states(vec![state("ka").with_field("name", "Karnataka"), state("tn")])
            .await
            .unwrap();
        assert_eq!(result.to_insert.len(), 1);
        assert_eq!(result.to_update.len(), 1);

        let all = stored(&svc);
        assert_eq!(all.len(), 2);
        let ka = all.iter().find(|s| s.id == "ka").unwrap();
        assert_eq!(ka.extra["name"], "Karnataka");
        assert_eq!(ka.data.len(), 1, "known districts are preserved");
    }

    #[tokio::test]
    async fn should_do_nothing_for_empty_remote_states() {
        let svc = offline(InMemoryStore::default());
        let result = svc.insert_states(Vec::new()).await.unwrap();
        assert!(result.is_empty());
        assert!(stored(&svc).is_empty());
    }

    #[tokio::test]
    async fn should_replace_districts_of_parent_state() {
        let store = InMemoryStore::default();
        seed_state(&store, &state("ka").with_data(vec![district("old", "ka")]));
        let svc = offline(store);

        let merge = svc
            .update_districts(vec![district("blr", "ka")])
            .await
            .unwrap();
        assert_eq!(merge.parent_id, "ka");

        let ka = stored(&svc).into_iter().next().unwrap();
        let ids: Vec<&str> = ka.data.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["blr"]);
    }

    #[tokio::test]
    async fn should_fail_district_update_for_unknown_parent() {
        let svc = offline(InMemoryStore::default());
        let result = svc.update_districts(vec![district("blr", "ka")]).await;
        assert!(matches!(result, Err(DevMgmtError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_store_remote_states_and_strip_children() {
        let remote = FakeRemote::answering(vec![
            state("ka").with_data(vec![district("blr", "ka")]),
            state("tn"),
        ]);
        let svc = LocationService::new(InMemoryStore::default(), Some(remote));

        let states = svc.search(&states_filter()).await.unwrap();
        assert_eq!(states.len(), 2);
        assert!(states.iter().all(|s| s.data.is_empty()));
        assert_eq!(stored(&svc).len(), 2);
    }

    #[tokio::test]
    async fn should_store_remote_districts_under_parent() {
        let store = InMemoryStore::default();
        seed_state(&store, &state("ka"));
        let remote = FakeRemote::answering(vec![district("blr", "ka"), district("mys", "ka")]);
        let svc = LocationService::new(store, Some(remote));

        let districts = svc.search(&districts_filter("ka")).await.unwrap();
        assert_eq!(districts.len(), 2);
        assert_eq!(stored(&svc)[0].data.len(), 2);
    }

    #[tokio::test]
    async fn should_return_remote_results_even_when_store_rejects_writes() {
        let remote = FakeRemote::answering(vec![state("ka")]);
        let svc = LocationService::new(InMemoryStore::failing_writes(), Some(remote));

        let states = svc.search(&states_filter()).await.unwrap();
        assert_eq!(states.len(), 1);
    }

    #[tokio::test]
    async fn should_fall_back_to_local_store_when_remote_fails() {
        let store = InMemoryStore::default();
        seed_state(&store, &state("ka"));
        let svc = LocationService::new(store, Some(FakeRemote::failing()));

        let states = svc.search(&states_filter()).await.unwrap();
        assert_eq!(states[0].id, "ka");
    }

    #[tokio::test]
    async fn should_reject_sync_without_remote() {
        let svc = offline(InMemoryStore::default());
        let result = svc.sync_from_remote(&states_filter()).await;
        assert!(matches!(result, Err(DevMgmtError::Upstream(_))));
    }

    #[tokio::test]
    async fn should_save_location_with_state_and_city_objects() {
        let svc = offline(InMemoryStore::default());
        let request = json!({ "state": { "id": "ka" }, "city": { "id": "blr" } });

        let saved = svc.save_location(request.clone()).await.unwrap();
        assert_eq!(saved, request);
        assert_eq!(
            svc.store.snapshot(Collection::Settings),
            vec![Document::new(SAVED_LOCATION_ID, request)]
        );
    }

    #[tokio::test]
    async fn should_reject_malformed_location_before_touching_store() {
        let svc = offline(InMemoryStore::failing_writes());
        let result = svc
            .save_location(json!({ "state": "ka", "city": { "id": "blr" } }))
            .await;
        assert!(matches!(
            result,
            Err(DevMgmtError::Validation(ValidationError::MalformedLocation))
        ));
    }

    #[tokio::test]
    async fn should_bootstrap_empty_store_once() {
        let svc = offline(InMemoryStore::default());

        assert_eq!(svc.bootstrap(&FakeBootstrap).await.unwrap(), 2);
        assert_eq!(svc.bootstrap(&FakeBootstrap).await.unwrap(), 0);

        let all = stored(&svc);
        let ka = all.iter().find(|s| s.id == "ka").unwrap();
        assert_eq!(ka.data.len(), 1);
    }
}
