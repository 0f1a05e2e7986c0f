use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer, ser::{SerializeMap, SerializeSeq}};

use crate::search_query::{SearchType, StatType};


#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultDocuments {
    pub solr_query_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_type: Option<SearchType>,
    pub total_found: u64,
    pub results: Vec<serde_json::Value>,
}

/// A query URL built without contacting the search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPreview {
    pub solr_query_url: String,
    pub query_type: String,
    pub normalized_values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalStats {
    pub total_patents: u64,
    pub total_approved: u64,
    pub total_pending: u64,
    pub total_abandoned: u64,
}

/// Sub-aggregation computed inside every statistics group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubFacet {
    Gau,
    Cpc,
}

impl SubFacet {
    pub const ALL: [SubFacet; 2] = [SubFacet::Gau, SubFacet::Cpc];

    /// Facet name in the engine request, also the output array key.
    pub fn name(&self) -> &'static str {
        match self {
            SubFacet::Gau => "gaus",
            SubFacet::Cpc => "cpcs",
        }
    }

    pub fn item_key(&self) -> &'static str {
        match self {
            SubFacet::Gau => "gau",
            SubFacet::Cpc => "cpc",
        }
    }

    pub fn unique_count_key(&self) -> &'static str {
        match self {
            SubFacet::Gau => "unique_gau_count",
            SubFacet::Cpc => "unique_cpc_count",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: serde_json::Value,
    pub count: u64,
}

/// One top-level facet bucket with its nested sub-facet buckets flattened out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedBucket {
    pub value: serde_json::Value,
    pub count: u64,
    pub nested: BTreeMap<SubFacet, Vec<FacetCount>>,
}

impl NormalizedBucket {
    pub fn items(&self, sub_facet: SubFacet) -> &[FacetCount] {
        self.nested.get(&sub_facet).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Derived from the bucket list, never read from the engine.
    pub fn unique_count(&self, sub_facet: SubFacet) -> usize {
        self.items(sub_facet).len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatsByDateRangeResponse {
    pub stat_type: StatType,
    /// Emit the `type` key; the examiner report leaves it out.
    pub include_type: bool,
    pub from_date: String,
    pub to_date: String,
    pub groups: Vec<NormalizedBucket>,
}

impl Serialize for StatsByDateRangeResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(if self.include_type { 5 } else { 4 }))?;
        if self.include_type {
            map.serialize_entry("type", &self.stat_type)?;
        }
        map.serialize_entry("from_date", &self.from_date)?;
        map.serialize_entry("to_date", &self.to_date)?;
        map.serialize_entry(self.stat_type.total_key(), &self.groups.len())?;
        map.serialize_entry(
            self.stat_type.plural_label(),
            &GroupList { stat_type: self.stat_type, groups: &self.groups },
        )?;
        map.end()
    }
}

struct GroupList<'a> {
    stat_type: StatType,
    groups: &'a [NormalizedBucket],
}

impl Serialize for GroupList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.groups.len()))?;
        for bucket in self.groups {
            seq.serialize_element(&GroupEntry { stat_type: self.stat_type, bucket })?;
        }
        seq.end()
    }
}

struct GroupEntry<'a> {
    stat_type: StatType,
    bucket: &'a NormalizedBucket,
}

impl Serialize for GroupEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(self.stat_type.label(), &self.bucket.value)?;
        map.serialize_entry("application_count", &self.bucket.count)?;
        for sub_facet in SubFacet::ALL {
            map.serialize_entry(sub_facet.unique_count_key(), &self.bucket.unique_count(sub_facet))?;
        }
        for sub_facet in SubFacet::ALL {
            map.serialize_entry(
                sub_facet.name(),
                &SubFacetList { sub_facet, items: self.bucket.items(sub_facet) },
            )?;
        }
        map.end()
    }
}

struct SubFacetList<'a> {
    sub_facet: SubFacet,
    items: &'a [FacetCount],
}

impl Serialize for SubFacetList<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in self.items {
            seq.serialize_element(&SubFacetEntry { key: self.sub_facet.item_key(), item })?;
        }
        seq.end()
    }
}

struct SubFacetEntry<'a> {
    key: &'static str,
    item: &'a FacetCount,
}

impl Serialize for SubFacetEntry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(self.key, &self.item.value)?;
        map.serialize_entry("application_count", &self.item.count)?;
        map.end()
    }
}
