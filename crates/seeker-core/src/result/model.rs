//! Search result domain models.
//!
//! `SearchResult` is the aggregate view-model built incrementally from the
//! analysis stream. It is both the unit the front-end renders and the unit
//! that gets persisted.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

use crate::error::{Result, SeekerError};

/// Search count above which a hot key is tagged [`Trend::Hot`].
pub const HOT_TREND_THRESHOLD: u64 = 15_000;

/// Search count above which a hot key is tagged [`Trend::Rising`].
pub const RISING_TREND_THRESHOLD: u64 = 10_000;

/// Upper bound on server-provided competitor card indices.
pub const MAX_COMPETITOR_SLOTS: usize = 256;

/// The aggregate view-model of one analysis session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Reasoning steps narrated by the backend, in arrival order.
    pub logic_steps: Vec<LogicStep>,
    /// Sparse, indexed by the server-provided card index.
    pub competitors: Vec<Option<Competitor>>,
    /// Chart images, unique by index and sorted by index.
    pub figures: Vec<Figure>,
    pub hot_keys_data: HotKeysData,
    pub requirement_card: Option<RequirementCard>,
    pub function_list: Vec<FunctionListEntry>,
}

/// One narrated reasoning step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicStep {
    pub title: String,
    pub description: String,
}

/// A competitor card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub name: String,
    pub slogan: String,
    pub relevance_score: Option<f64>,
    pub traffic: String,
    pub target_users: String,
    pub pain_points: Vec<String>,
    pub key_features: Vec<String>,
    pub weaknesses: Vec<String>,
    /// Always a single string; list inputs are joined with `", "`.
    pub revenue_model: String,
}

/// A rendered chart image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Figure {
    pub index: u32,
    /// Opaque base64 payload (PNG as produced by the backend).
    pub image_base64: String,
}

/// Derived popularity tier of a hot key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Trend {
    Hot,
    Rising,
    Stable,
}

impl Trend {
    /// Derives the tier from a raw search count.
    pub fn from_count(search_count: u64) -> Self {
        if search_count > HOT_TREND_THRESHOLD {
            Trend::Hot
        } else if search_count > RISING_TREND_THRESHOLD {
            Trend::Rising
        } else {
            Trend::Stable
        }
    }
}

/// A single searched tag with its count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotKey {
    pub tag: String,
    pub search_count: u64,
    pub trend: Trend,
}

impl HotKey {
    pub fn new(tag: impl Into<String>, search_count: u64) -> Self {
        Self {
            tag: tag.into(),
            search_count,
            trend: Trend::from_count(search_count),
        }
    }
}

/// The three named hot-key buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum HotKeyBucket {
    #[strum(serialize = "mostRelevant")]
    MostRelevant,
    #[strum(serialize = "allInSeeker")]
    AllInSeeker,
    #[strum(serialize = "allFields")]
    AllFields,
}

impl HotKeyBucket {
    /// Matches a bucket name ignoring case, spaces, dashes and underscores,
    /// so `"most_relevant"`, `"Most Relevant"` and `"mostRelevant"` agree.
    pub fn parse(raw: &str) -> Option<Self> {
        let folded: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match folded.as_str() {
            "mostrelevant" => Some(Self::MostRelevant),
            "allinseeker" => Some(Self::AllInSeeker),
            "allfields" => Some(Self::AllFields),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotKeysData {
    pub most_relevant: Vec<HotKey>,
    pub all_in_seeker: Vec<HotKey>,
    pub all_fields: Vec<HotKey>,
}

impl HotKeysData {
    pub fn bucket(&self, bucket: HotKeyBucket) -> &[HotKey] {
        match bucket {
            HotKeyBucket::MostRelevant => &self.most_relevant,
            HotKeyBucket::AllInSeeker => &self.all_in_seeker,
            HotKeyBucket::AllFields => &self.all_fields,
        }
    }

    fn bucket_mut(&mut self, bucket: HotKeyBucket) -> &mut Vec<HotKey> {
        match bucket {
            HotKeyBucket::MostRelevant => &mut self.most_relevant,
            HotKeyBucket::AllInSeeker => &mut self.all_in_seeker,
            HotKeyBucket::AllFields => &mut self.all_fields,
        }
    }
}

/// The product requirement summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementCard {
    pub user_story: String,
    pub slogan: String,
    pub target_user: String,
    pub pain_points: String,
    pub unique_selling_points: Vec<String>,
    pub revenue_model: String,
}

/// Feature priority tier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum PriorityType {
    #[serde(rename = "must-have")]
    #[strum(serialize = "must-have")]
    MustHave,
    #[serde(rename = "could-have")]
    #[strum(serialize = "could-have")]
    CouldHave,
    #[serde(rename = "may-have")]
    #[strum(serialize = "may-have")]
    MayHave,
    #[serde(rename = "others")]
    #[strum(serialize = "others")]
    Others,
}

impl PriorityType {
    /// Lenient parse: case-insensitive, `_`/space treated as `-`; anything
    /// unrecognised lands in [`PriorityType::Others`].
    pub fn parse_lenient(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        normalized.parse().unwrap_or(PriorityType::Others)
    }
}

/// Features of one priority tier, grouped by module name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionListEntry {
    pub priority_type: PriorityType,
    pub content: IndexMap<String, Vec<String>>,
}

impl SearchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of populated competitor slots.
    pub fn competitor_count(&self) -> usize {
        self.competitors.iter().filter(|c| c.is_some()).count()
    }

    pub fn competitor(&self, index: usize) -> Option<&Competitor> {
        self.competitors.get(index).and_then(Option::as_ref)
    }

    pub fn is_empty(&self) -> bool {
        self.logic_steps.is_empty()
            && self.competitor_count() == 0
            && self.figures.is_empty()
            && self.hot_keys_data == HotKeysData::default()
            && self.requirement_card.is_none()
            && self.function_list.is_empty()
    }

    /// One-line summary for history listings: the requirement-card slogan,
    /// else the first step title.
    pub fn headline(&self) -> String {
        self.requirement_card
            .as_ref()
            .map(|card| card.slogan.clone())
            .filter(|slogan| !slogan.is_empty())
            .or_else(|| self.logic_steps.first().map(|s| s.title.clone()))
            .unwrap_or_default()
    }

    pub fn push_logic_step(&mut self, step: LogicStep) {
        self.logic_steps.push(step);
    }

    /// Places a competitor at `index`, growing the sparse array as needed.
    /// A later card for the same index overwrites the earlier one.
    pub fn upsert_competitor(&mut self, index: usize, competitor: Competitor) -> Result<()> {
        if index >= MAX_COMPETITOR_SLOTS {
            return Err(SeekerError::protocol(format!(
                "competitor index {index} exceeds limit {MAX_COMPETITOR_SLOTS}"
            )));
        }
        if self.competitors.len() <= index {
            self.competitors.resize(index + 1, None);
        }
        self.competitors[index] = Some(competitor);
        Ok(())
    }

    /// Replaces a figure with the same index in place, or inserts it, keeping
    /// the list sorted by index.
    pub fn upsert_figure(&mut self, figure: Figure) {
        match self.figures.binary_search_by_key(&figure.index, |f| f.index) {
            Ok(pos) => self.figures[pos] = figure,
            Err(pos) => self.figures.insert(pos, figure),
        }
    }

    /// Replaces one hot-key bucket wholesale.
    pub fn replace_hot_keys(&mut self, bucket: HotKeyBucket, keys: Vec<HotKey>) {
        *self.hot_keys_data.bucket_mut(bucket) = keys;
    }

    pub fn set_requirement_card(&mut self, card: RequirementCard) {
        self.requirement_card = Some(card);
    }

    /// Merges an entry into the function list.
    ///
    /// Entries of the same priority are unioned per module, keeping the
    /// first-seen order of both modules and features.
    pub fn merge_function_list(&mut self, entry: FunctionListEntry) {
        let Some(existing) = self
            .function_list
            .iter_mut()
            .find(|e| e.priority_type == entry.priority_type)
        else {
            let mut entry = entry;
            for features in entry.content.values_mut() {
                dedup_in_order(features);
            }
            self.function_list.push(entry);
            return;
        };

        for (module, features) in entry.content {
            let target = existing.content.entry(module).or_default();
            for feature in features {
                if !target.contains(&feature) {
                    target.push(feature);
                }
            }
        }
    }
}

fn dedup_in_order(items: &mut Vec<String>) {
    let mut seen = Vec::with_capacity(items.len());
    items.retain(|item| {
        if seen.contains(item) {
            false
        } else {
            seen.push(item.clone());
            true
        }
    });
}

/// The persisted form of a search: the aggregate plus the query it answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub query: String,
    pub results: SearchResult,
    /// Unix epoch milliseconds of the write.
    pub timestamp: i64,
}

impl ResultEnvelope {
    pub fn new(query: impl Into<String>, results: SearchResult) -> Self {
        Self {
            query: query.into(),
            results,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Structural check applied before trusting a stored envelope: every
    /// slice must be present with the right container type.
    pub fn has_valid_shape(raw: &Value) -> bool {
        let Some(results) = raw.get("results").and_then(Value::as_object) else {
            return false;
        };
        if !raw.get("query").is_some_and(Value::is_string) {
            return false;
        }

        let is_array = |key: &str| results.get(key).is_some_and(Value::is_array);
        let hot_keys_ok = results
            .get("hotKeysData")
            .and_then(Value::as_object)
            .is_some_and(|buckets| {
                ["mostRelevant", "allInSeeker", "allFields"]
                    .iter()
                    .all(|b| buckets.get(*b).is_some_and(Value::is_array))
            });
        let card_ok = results
            .get("requirementCard")
            .is_some_and(|v| v.is_null() || v.is_object());

        is_array("logicSteps")
            && is_array("competitors")
            && is_array("figures")
            && is_array("functionList")
            && hot_keys_ok
            && card_ok
    }
}
