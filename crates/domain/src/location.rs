//! Location — the two-level state/district hierarchy and the rules used to
//! reconcile remote location data with the local store.
//!
//! A **state** record has no `parentId` and owns its **districts** in `data`.
//! Remote district payloads are authoritative: they replace a state's `data`
//! wholesale instead of being merged element by element, so entries that only
//! exist locally are dropped on the next sync.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DevMgmtError, NotFoundError, ValidationError};

/// A state or district as exchanged with the remote location API.
///
/// Fields beyond `id`, `parentId` and `data` (`name`, `code`, `type`, …) are
/// kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<LocationRecord>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LocationRecord {
    /// Create a bare record with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            data: Vec::new(),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Vec<LocationRecord>) -> Self {
        self.data = data;
        self
    }

    /// The record without its embedded children, as returned by searches.
    #[must_use]
    pub fn into_summary(mut self) -> Self {
        self.data = Vec::new();
        self
    }
}

/// The level of the hierarchy a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationType {
    State,
    District,
}

impl LocationType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::District => "district",
        }
    }
}

/// A validated location search filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationFilter {
    pub location_type: LocationType,
    pub parent_id: Option<String>,
}

impl LocationFilter {
    /// Validate raw filter values.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingLocationType`] when `location_type`
    /// is absent or blank, [`ValidationError::UnknownLocationType`] for values
    /// other than `state`/`district`, and [`ValidationError::MissingParentId`]
    /// for a district search without a parent.
    pub fn parse(
        location_type: Option<&str>,
        parent_id: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let location_type = match location_type.map(str::trim) {
            None | Some("") => return Err(ValidationError::MissingLocationType),
            Some("state") => LocationType::State,
            Some("district") => LocationType::District,
            Some(other) => return Err(ValidationError::UnknownLocationType(other.to_string())),
        };
        let parent_id = parent_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(ToString::to_string);
        if location_type == LocationType::District && parent_id.is_none() {
            return Err(ValidationError::MissingParentId);
        }
        Ok(Self {
            location_type,
            parent_id,
        })
    }
}

/// Remote states split by whether the local store already knows them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct StateReconciliation {
    pub to_insert: Vec<LocationRecord>,
    pub to_update: Vec<LocationRecord>,
}

impl StateReconciliation {
    /// `true` when there is nothing to persist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_update.is_empty()
    }
}

/// Classify each remote state as new or existing relative to `local_ids`.
///
/// Every input record lands in exactly one of the two lists, in input order.
/// An empty input yields an empty reconciliation.
#[must_use]
pub fn reconcile_states(
    remote_states: Vec<LocationRecord>,
    local_ids: &HashSet<String>,
) -> StateReconciliation {
    let mut result = StateReconciliation::default();
    for state in remote_states {
        if local_ids.contains(&state.id) {
            result.to_update.push(state);
        } else {
            result.to_insert.push(state);
        }
    }
    result
}

/// A state whose districts were replaced by a remote district list.
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictMerge {
    pub parent_id: String,
    pub merged_state: LocationRecord,
}

/// Return the `parentId` shared by every district in the list.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyDistricts`] for an empty list,
/// [`ValidationError::MissingParentId`] when the first record has no parent
/// and [`ValidationError::MixedParents`] when records disagree.
pub fn district_parent_id(districts: &[LocationRecord]) -> Result<&str, ValidationError> {
    let (first, rest) = districts
        .split_first()
        .ok_or(ValidationError::EmptyDistricts)?;
    let parent = first
        .parent_id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(ValidationError::MissingParentId)?;
    if let Some(other) = rest
        .iter()
        .find(|d| d.parent_id.as_deref() != Some(parent))
    {
        return Err(ValidationError::MixedParents {
            expected: parent.to_string(),
            found: other.parent_id.clone().unwrap_or_default(),
        });
    }
    Ok(parent)
}

/// Replace the districts of `state` with `districts`.
///
/// `state` is the stored record looked up by the districts' `parentId`.
///
/// # Errors
///
/// Returns [`DevMgmtError::Validation`] when the district list is malformed
/// (see [`district_parent_id`]) and [`DevMgmtError::NotFound`] when the parent
/// state is absent.
pub fn reconcile_districts(
    districts: Vec<LocationRecord>,
    state: Option<LocationRecord>,
) -> Result<DistrictMerge, DevMgmtError> {
    let parent_id = district_parent_id(&districts)?.to_string();
    let mut state = state
        .filter(|s| s.id == parent_id)
        .ok_or_else(|| NotFoundError {
            entity: "Location",
            id: parent_id.clone(),
        })?;
    state.data = districts;
    Ok(DistrictMerge {
        parent_id,
        merged_state: state,
    })
}
