//! Advanced-search filter registry and URL query (de)serialization.
//!
//! Each [`SearchObjectType`] owns an ordered list of [`FilterDescriptor`]s.
//! A descriptor's [`FilterKind`] decides how the filter reads itself out of a
//! [`QueryParams`] and writes itself back. Reference filters only carry a uuid
//! in the URL, so turning them back into a labelled filter goes through a
//! [`ReferenceResolver`]; those lookups run concurrently.

use crate::error::{AnetError, Result};
use crate::settings::Settings;
use crate::types::{OrganizationType, PersonRole, PositionType, ReportState, SearchObjectType, Status};
use futures::future::join_all;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;

pub const TEXT_QUERY_KEY: &str = "text";

// ---------------------------------------------------------------------------
// QueryParams
// ---------------------------------------------------------------------------

const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Decoded URL query string. Insertion order is kept; when a key repeats the
/// first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `?a=b&c=d`. The leading `?` is optional, `+` decodes to a space
    /// and a key without `=` maps to an empty value.
    pub fn parse(query: &str) -> Self {
        let mut params = QueryParams::new();
        let query = query.strip_prefix('?').unwrap_or(query);
        for piece in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = piece.split_once('=').unwrap_or((piece, ""));
            let key = decode_component(key);
            if key.is_empty() || params.contains(&key) {
                continue;
            }
            params.pairs.push((key, decode_component(value)));
        }
        params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Like [`get`](Self::get) but treats an empty value as absent.
    pub fn get_nonempty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Set `key`, replacing an earlier value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Encode without a leading `?`.
    pub fn to_query_string(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, QUERY_VALUE),
                    utf8_percent_encode(v, QUERY_VALUE)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// JSON object of the pairs, as posted to the entity search endpoints.
    pub fn to_json(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .pairs
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        serde_json::Value::Object(map)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (k, v) in iter {
            let key = k.into();
            if !params.contains(&key) {
                params.pairs.push((key, v.into()));
            }
        }
        params
    }
}

// ---------------------------------------------------------------------------
// Filter values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterValue {
    /// Raw text, also used for checkbox and select filters.
    Text { value: String },
    Reference { uuid: String, label: String },
    DateRange {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end: Option<String>,
    },
}

impl FilterValue {
    pub fn text(value: impl Into<String>) -> Self {
        FilterValue::Text {
            value: value.into(),
        }
    }

    /// Human-readable rendering for listings.
    pub fn display(&self) -> String {
        match self {
            FilterValue::Text { value } => value.clone(),
            FilterValue::Reference { label, .. } => label.clone(),
            FilterValue::DateRange { start, end } => format!(
                "{} .. {}",
                start.as_deref().unwrap_or(""),
                end.as_deref().unwrap_or("")
            ),
        }
    }
}

/// A filter in use: the descriptor's display key plus its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedFilter {
    pub key: String,
    pub value: FilterValue,
}

impl UsedFilter {
    pub fn new(key: impl Into<String>, value: FilterValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

// ---------------------------------------------------------------------------
// FilterKind / FilterDescriptor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterKind {
    Text,
    Checkbox,
    Select { values: Vec<String> },
    /// Autocomplete over another object type; the URL carries its uuid.
    Reference { target: SearchObjectType },
    /// Reads `<queryKey>Start` and `<queryKey>End`.
    DateRange,
}

/// Result of reading one filter out of a query string.
#[derive(Debug, Clone, PartialEq)]
pub enum Deserialized {
    Ready(UsedFilter),
    Pending {
        key: String,
        target: SearchObjectType,
        uuid: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub key: String,
    pub query_key: String,
    pub kind: FilterKind,
}

impl FilterDescriptor {
    pub fn new(key: impl Into<String>, query_key: impl Into<String>, kind: FilterKind) -> Self {
        Self {
            key: key.into(),
            query_key: query_key.into(),
            kind,
        }
    }

    fn range_keys(&self) -> (String, String) {
        (
            format!("{}Start", self.query_key),
            format!("{}End", self.query_key),
        )
    }

    /// Read this filter from `params`. `None` when the filter is not in the
    /// query (unset, not empty).
    pub fn deserialize(&self, params: &QueryParams) -> Option<Deserialized> {
        match &self.kind {
            FilterKind::Text | FilterKind::Checkbox => {
                let value = params.get_nonempty(&self.query_key)?;
                Some(Deserialized::Ready(UsedFilter::new(
                    &self.key,
                    FilterValue::text(value),
                )))
            }
            FilterKind::Select { values } => {
                let value = params.get_nonempty(&self.query_key)?;
                if !values.iter().any(|v| v == value) {
                    tracing::warn!(filter = %self.key, value, "ignoring unknown select value");
                    return None;
                }
                Some(Deserialized::Ready(UsedFilter::new(
                    &self.key,
                    FilterValue::text(value),
                )))
            }
            FilterKind::Reference { target } => {
                let uuid = params.get_nonempty(&self.query_key)?;
                Some(Deserialized::Pending {
                    key: self.key.clone(),
                    target: *target,
                    uuid: uuid.to_string(),
                })
            }
            FilterKind::DateRange => {
                let (start_key, end_key) = self.range_keys();
                let start = params.get_nonempty(&start_key).map(str::to_string);
                let end = params.get_nonempty(&end_key).map(str::to_string);
                if start.is_none() && end.is_none() {
                    return None;
                }
                Some(Deserialized::Ready(UsedFilter::new(
                    &self.key,
                    FilterValue::DateRange { start, end },
                )))
            }
        }
    }

    /// Query pairs for `value`. A value of the wrong shape for this kind
    /// produces no pairs.
    pub fn to_query(&self, value: &FilterValue) -> Vec<(String, String)> {
        match (&self.kind, value) {
            (
                FilterKind::Text | FilterKind::Checkbox | FilterKind::Select { .. },
                FilterValue::Text { value },
            ) => vec![(self.query_key.clone(), value.clone())],
            (FilterKind::Reference { .. }, FilterValue::Reference { uuid, .. }) => {
                vec![(self.query_key.clone(), uuid.clone())]
            }
            (FilterKind::DateRange, FilterValue::DateRange { start, end }) => {
                let (start_key, end_key) = self.range_keys();
                let mut pairs = Vec::new();
                if let Some(start) = start {
                    pairs.push((start_key, start.clone()));
                }
                if let Some(end) = end {
                    pairs.push((end_key, end.clone()));
                }
                pairs
            }
            _ => {
                tracing::warn!(filter = %self.key, "filter value does not match its kind");
                Vec::new()
            }
        }
    }

    /// Build a value for this filter from a single textual input, as typed on
    /// the command line. Reference filters take a uuid and use it as label.
    pub fn value_from_text(&self, raw: &str) -> Result<FilterValue> {
        let invalid = || AnetError::InvalidFilterValue {
            key: self.key.clone(),
            value: raw.to_string(),
        };
        let raw_trimmed = raw.trim();
        if raw_trimmed.is_empty() {
            return Err(invalid());
        }
        match &self.kind {
            FilterKind::Text | FilterKind::Checkbox => Ok(FilterValue::text(raw_trimmed)),
            FilterKind::Select { values } => values
                .iter()
                .find(|v| v.eq_ignore_ascii_case(raw_trimmed))
                .map(FilterValue::text)
                .ok_or_else(invalid),
            FilterKind::Reference { .. } => Ok(FilterValue::Reference {
                uuid: raw_trimmed.to_string(),
                label: raw_trimmed.to_string(),
            }),
            FilterKind::DateRange => {
                let (start, end) = raw_trimmed.split_once("..").ok_or_else(invalid)?;
                let opt = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
                let (start, end) = (opt(start), opt(end));
                if start.is_none() && end.is_none() {
                    return Err(invalid());
                }
                Ok(FilterValue::DateRange { start, end })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ReferenceResolver
// ---------------------------------------------------------------------------

pub type ResolveError = Box<dyn std::error::Error + Send + Sync>;

/// Looks up the display label of a referenced record.
pub trait ReferenceResolver {
    fn resolve_label(
        &self,
        target: SearchObjectType,
        uuid: &str,
    ) -> impl Future<Output = std::result::Result<String, ResolveError>> + Send;
}

/// Offline resolver that labels every reference with its uuid.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidLabels;

impl ReferenceResolver for UuidLabels {
    async fn resolve_label(
        &self,
        _target: SearchObjectType,
        uuid: &str,
    ) -> std::result::Result<String, ResolveError> {
        Ok(uuid.to_string())
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeserializedQuery {
    pub object_type: SearchObjectType,
    pub filters: Vec<UsedFilter>,
    pub text: String,
}

/// Filter descriptors per object type, in display order.
#[derive(Debug, Clone)]
pub struct SearchFilters {
    filters: BTreeMap<SearchObjectType, Vec<FilterDescriptor>>,
    extra: BTreeMap<SearchObjectType, Vec<String>>,
}

fn select<T: Copy>(all: &[T], as_str: fn(T) -> &'static str) -> FilterKind {
    FilterKind::Select {
        values: all.iter().map(|v| as_str(*v).to_string()).collect(),
    }
}

fn reference(target: SearchObjectType) -> FilterKind {
    FilterKind::Reference { target }
}

impl SearchFilters {
    pub fn new(settings: &Settings) -> Self {
        use SearchObjectType as T;

        let advisor_org = settings.fields.advisor.org.name.as_str();
        let principal_org = settings.fields.principal.org.name.as_str();
        let status = || select(Status::all(), Status::as_str);

        let mut ranks: Vec<String> = Vec::new();
        for rank in settings
            .fields
            .advisor
            .person
            .ranks
            .iter()
            .chain(&settings.fields.principal.person.ranks)
        {
            if !ranks.contains(rank) {
                ranks.push(rank.clone());
            }
        }

        let mut filters = BTreeMap::new();
        filters.insert(
            T::Reports,
            vec![
                FilterDescriptor::new("Author", "authorUuid", reference(T::People)),
                FilterDescriptor::new("Attendee", "attendeeUuid", reference(T::People)),
                FilterDescriptor::new(
                    "Pending Approval Of",
                    "pendingApprovalOf",
                    reference(T::People),
                ),
                FilterDescriptor::new(advisor_org, "advisorOrgUuid", reference(T::Organizations)),
                FilterDescriptor::new(
                    principal_org,
                    "principalOrgUuid",
                    reference(T::Organizations),
                ),
                FilterDescriptor::new("Engagement Date", "engagementDate", FilterKind::DateRange),
                FilterDescriptor::new("Release Date", "releasedAt", FilterKind::DateRange),
                FilterDescriptor::new("Location", "locationUuid", reference(T::Locations)),
                FilterDescriptor::new("Task", "taskUuid", reference(T::Tasks)),
                FilterDescriptor::new("State", "state", select(ReportState::all(), ReportState::as_str)),
                FilterDescriptor::new(
                    "Authorized for me",
                    "sensitiveInfo",
                    FilterKind::Checkbox,
                ),
            ],
        );
        filters.insert(
            T::People,
            vec![
                FilterDescriptor::new("Organization", "orgUuid", reference(T::Organizations)),
                FilterDescriptor::new("Role", "role", select(PersonRole::all(), PersonRole::as_str)),
                FilterDescriptor::new("Status", "status", status()),
                FilterDescriptor::new("Location", "locationUuid", reference(T::Locations)),
                FilterDescriptor::new("Rank", "rank", FilterKind::Select { values: ranks }),
                FilterDescriptor::new("Nationality", "country", FilterKind::Text),
            ],
        );
        filters.insert(
            T::Organizations,
            vec![
                FilterDescriptor::new("Status", "status", status()),
                FilterDescriptor::new(
                    "Organization type",
                    "type",
                    select(OrganizationType::all(), OrganizationType::as_str),
                ),
                FilterDescriptor::new(
                    "Parent Organization",
                    "parentOrgUuid",
                    reference(T::Organizations),
                ),
            ],
        );
        filters.insert(
            T::Positions,
            vec![
                FilterDescriptor::new(
                    "Position type",
                    "type",
                    select(PositionType::all(), PositionType::as_str),
                ),
                FilterDescriptor::new("Organization", "organizationUuid", reference(T::Organizations)),
                FilterDescriptor::new("Status", "status", status()),
                FilterDescriptor::new("Location", "locationUuid", reference(T::Locations)),
                FilterDescriptor::new(
                    "Is filled?",
                    "isFilled",
                    FilterKind::Select {
                        values: vec!["true".to_string(), "false".to_string()],
                    },
                ),
                FilterDescriptor::new("Code", "code", FilterKind::Text),
            ],
        );
        filters.insert(
            T::Locations,
            vec![FilterDescriptor::new("Status", "status", status())],
        );
        filters.insert(
            T::Tasks,
            vec![
                FilterDescriptor::new("Status", "status", status()),
                FilterDescriptor::new(
                    "Responsible Organization",
                    "responsibleOrgUuid",
                    reference(T::Organizations),
                ),
            ],
        );
        filters.insert(
            T::AuthorizationGroups,
            vec![FilterDescriptor::new("Status", "status", status())],
        );

        let mut extra = BTreeMap::new();
        extra.insert(T::Reports, vec!["includeEngagementDayOfWeek".to_string()]);

        Self { filters, extra }
    }

    pub fn filters(&self, object_type: SearchObjectType) -> &[FilterDescriptor] {
        self.filters
            .get(&object_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Query keys passed through verbatim for `object_type`.
    pub fn extra_filters(&self, object_type: SearchObjectType) -> &[String] {
        self.extra
            .get(&object_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn descriptor(&self, object_type: SearchObjectType, key: &str) -> Option<&FilterDescriptor> {
        self.filters(object_type).iter().find(|d| d.key == key)
    }

    /// Look a descriptor up by display key or query key, case-insensitively.
    pub fn find(&self, object_type: SearchObjectType, name: &str) -> Option<&FilterDescriptor> {
        self.filters(object_type)
            .iter()
            .find(|d| d.key.eq_ignore_ascii_case(name) || d.query_key.eq_ignore_ascii_case(name))
    }

    /// Build a filter from `name=value` input. Extra filter keys pass through
    /// as text.
    pub fn filter_from_text(
        &self,
        object_type: SearchObjectType,
        name: &str,
        raw: &str,
    ) -> Result<UsedFilter> {
        if let Some(extra) = self.extra_filters(object_type).iter().find(|k| *k == name) {
            return Ok(UsedFilter::new(extra, FilterValue::text(raw)));
        }
        let descriptor = self
            .find(object_type, name)
            .ok_or_else(|| AnetError::InvalidFilterValue {
                key: name.to_string(),
                value: raw.to_string(),
            })?;
        Ok(UsedFilter::new(
            &descriptor.key,
            descriptor.value_from_text(raw)?,
        ))
    }

    /// Encode `filters` and the free-text term into a query string map.
    /// Filters with keys unknown to `object_type` are dropped.
    pub fn serialize_query_params(
        &self,
        object_type: SearchObjectType,
        filters: &[UsedFilter],
        text: &str,
    ) -> QueryParams {
        let mut params = QueryParams::new();
        if !text.is_empty() {
            params.insert(TEXT_QUERY_KEY, text);
        }
        for filter in filters {
            if self.extra_filters(object_type).contains(&filter.key) {
                if let FilterValue::Text { value } = &filter.value {
                    params.insert(filter.key.clone(), value.clone());
                }
                continue;
            }
            match self.descriptor(object_type, &filter.key) {
                Some(descriptor) => {
                    for (k, v) in descriptor.to_query(&filter.value) {
                        params.insert(k, v);
                    }
                }
                None => {
                    tracing::warn!(%object_type, filter = %filter.key, "dropping unknown filter");
                }
            }
        }
        params
    }

    /// Rebuild the active filter set from a query string.
    ///
    /// Extra filters come first, then registry filters in registry order.
    /// Reference lookups run concurrently; a failed lookup keeps the filter
    /// with its uuid as the label.
    pub async fn deserialize_query_params<R: ReferenceResolver>(
        &self,
        object_type: SearchObjectType,
        params: &QueryParams,
        resolver: &R,
    ) -> DeserializedQuery {
        let text = params.get(TEXT_QUERY_KEY).unwrap_or_default().to_string();

        let mut slots: Vec<Option<UsedFilter>> = Vec::new();
        for key in self.extra_filters(object_type) {
            if let Some(value) = params.get(key) {
                slots.push(Some(UsedFilter::new(key, FilterValue::text(value))));
            }
        }

        let mut pending = Vec::new();
        for descriptor in self.filters(object_type) {
            match descriptor.deserialize(params) {
                None => {}
                Some(Deserialized::Ready(filter)) => slots.push(Some(filter)),
                Some(Deserialized::Pending { key, target, uuid }) => {
                    pending.push((slots.len(), key, target, uuid));
                    slots.push(None);
                }
            }
        }

        let lookups = pending.iter().map(|(_, _, target, uuid)| resolver.resolve_label(*target, uuid));
        let labels = join_all(lookups).await;

        for ((slot, key, target, uuid), label) in pending.into_iter().zip(labels) {
            let label = label.unwrap_or_else(|e| {
                tracing::warn!(%target, %uuid, error = %e, "could not resolve filter reference");
                uuid.clone()
            });
            slots[slot] = Some(UsedFilter::new(key, FilterValue::Reference { uuid, label }));
        }

        DeserializedQuery {
            object_type,
            filters: slots.into_iter().flatten().collect(),
            text,
        }
    }
}
