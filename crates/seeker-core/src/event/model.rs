//! Typed stream events.
//!
//! Raw events are JSON objects discriminated by a `step` field (or, on older
//! backends, a bare `id` field). [`StreamEvent::from_value`] turns them into a
//! closed sum type; unknown discriminators become [`StreamEvent::Ignored`].

use indexmap::IndexMap;
use serde_json::{Map, Value};
use strum::{AsRefStr, Display, EnumString};

use crate::error::{Result, SeekerError};
use crate::result::{
    Competitor, Figure, FunctionListEntry, HotKey, HotKeyBucket, LogicStep, PriorityType,
    RequirementCard,
};

/// Title used when a reasoning step carries no `## ` heading.
pub const DEFAULT_STEP_TITLE: &str = "Analysis step";

/// Known values of the `step` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
pub enum StepTag {
    #[strum(serialize = "chatID")]
    ChatId,
    #[strum(serialize = "step")]
    Step,
    #[strum(serialize = "Hot Keys")]
    HotKeys,
    #[strum(serialize = "Main Competitors")]
    MainCompetitors,
    #[strum(serialize = "figure")]
    Figure,
    #[strum(serialize = "requirementCard")]
    RequirementCard,
    #[strum(serialize = "functionList")]
    FunctionList,
    #[strum(serialize = "Done")]
    Done,
}

/// A decoded stream event.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// The backend asserts the authoritative search id.
    ChatId(String),
    LogicStep(LogicStep),
    HotKeys {
        bucket: HotKeyBucket,
        keys: Vec<HotKey>,
    },
    Competitor {
        index: usize,
        competitor: Competitor,
    },
    Figure(Figure),
    RequirementCard(RequirementCard),
    FunctionList(FunctionListEntry),
    Done,
    /// Unknown or missing discriminator. Carries the raw tag, if any.
    Ignored(Option<String>),
}

impl StreamEvent {
    /// The tag this event was decoded from.
    pub fn tag(&self) -> Option<StepTag> {
        match self {
            StreamEvent::ChatId(_) => Some(StepTag::ChatId),
            StreamEvent::LogicStep(_) => Some(StepTag::Step),
            StreamEvent::HotKeys { .. } => Some(StepTag::HotKeys),
            StreamEvent::Competitor { .. } => Some(StepTag::MainCompetitors),
            StreamEvent::Figure(_) => Some(StepTag::Figure),
            StreamEvent::RequirementCard(_) => Some(StepTag::RequirementCard),
            StreamEvent::FunctionList(_) => Some(StepTag::FunctionList),
            StreamEvent::Done => Some(StepTag::Done),
            StreamEvent::Ignored(_) => None,
        }
    }

    /// Decodes a raw event object.
    ///
    /// A recognised tag with an unusable body yields a `Protocol` error; the
    /// caller drops that one event and keeps reading.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(SeekerError::protocol("event payload is not a JSON object"));
        };

        let raw_tag = object
            .get("step")
            .or_else(|| object.get("id"))
            .and_then(Value::as_str);
        let Some(raw_tag) = raw_tag else {
            return Ok(StreamEvent::Ignored(None));
        };
        let Ok(tag) = raw_tag.parse::<StepTag>() else {
            return Ok(StreamEvent::Ignored(Some(raw_tag.to_string())));
        };

        match tag {
            StepTag::ChatId => parse_chat_id(object),
            StepTag::Step => Ok(StreamEvent::LogicStep(parse_logic_step(object))),
            StepTag::HotKeys => parse_hot_keys(object),
            StepTag::MainCompetitors => parse_competitor(object),
            StepTag::Figure => parse_figure(object),
            StepTag::RequirementCard => Ok(StreamEvent::RequirementCard(
                parse_requirement_card(object),
            )),
            StepTag::FunctionList => parse_function_list(object),
            StepTag::Done => Ok(StreamEvent::Done),
        }
    }
}

fn first_of<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| object.get(*k).filter(|v| !v.is_null()))
}

/// Renders scalars as text; lists are joined with `", "`.
pub fn lenient_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| lenient_string(Some(item)))
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}

/// Accepts a list of scalars or a single scalar.
pub fn lenient_list(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| lenient_string(Some(item)))
            .filter(|s| !s.is_empty())
            .collect(),
        Some(other) => {
            let single = lenient_string(Some(other));
            if single.is_empty() {
                Vec::new()
            } else {
                vec![single]
            }
        }
    }
}

fn lenient_index(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_score(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
        _ => None,
    }
}

fn parse_chat_id(object: &Map<String, Value>) -> Result<StreamEvent> {
    let id = lenient_string(first_of(object, &["content", "chatID", "chat_id"]));
    if id.is_empty() {
        return Err(SeekerError::protocol("chatID event without an id"));
    }
    Ok(StreamEvent::ChatId(id))
}

/// Splits a markdown message into a step: a leading `## ` heading becomes the
/// title and the rest the description.
pub fn split_step_message(message: &str) -> LogicStep {
    let trimmed = message.trim();
    if let Some(after_marker) = trimmed.strip_prefix("## ") {
        let (title, rest) = after_marker.split_once('\n').unwrap_or((after_marker, ""));
        return LogicStep {
            title: title.trim().to_string(),
            description: rest.trim().to_string(),
        };
    }
    LogicStep {
        title: DEFAULT_STEP_TITLE.to_string(),
        description: trimmed.to_string(),
    }
}

fn parse_logic_step(object: &Map<String, Value>) -> LogicStep {
    let message = lenient_string(first_of(object, &["messageContent", "content"]));
    split_step_message(&message)
}

fn parse_hot_keys(object: &Map<String, Value>) -> Result<StreamEvent> {
    let raw_bucket = lenient_string(object.get("type"));
    let bucket = HotKeyBucket::parse(&raw_bucket)
        .ok_or_else(|| SeekerError::protocol(format!("unknown hot keys bucket '{raw_bucket}'")))?;

    let content = first_of(object, &["content", "data"])
        .and_then(Value::as_object)
        .ok_or_else(|| SeekerError::protocol("hot keys event without a tag map"))?;

    let keys = content
        .iter()
        .map(|(tag, count)| HotKey::new(tag.clone(), lenient_index(Some(count)).unwrap_or(0)))
        .collect();

    Ok(StreamEvent::HotKeys { bucket, keys })
}

fn parse_competitor(object: &Map<String, Value>) -> Result<StreamEvent> {
    let index = lenient_index(first_of(object, &["card_index", "cardIndex", "index"]))
        .ok_or_else(|| SeekerError::protocol("competitor event without card_index"))?;
    let card = first_of(object, &["card_content", "cardContent", "content"])
        .and_then(Value::as_object)
        .ok_or_else(|| SeekerError::protocol("competitor event without card_content"))?;

    let competitor = Competitor {
        name: lenient_string(first_of(card, &["product_name", "productName", "name"])),
        slogan: lenient_string(card.get("slogan")),
        relevance_score: lenient_score(first_of(
            card,
            &["relevance_score", "relevanceScore", "relevance"],
        )),
        traffic: lenient_string(first_of(card, &["traffic", "traffic_estimate"])),
        target_users: lenient_string(first_of(card, &["target_users", "targetUsers"])),
        pain_points: lenient_list(first_of(card, &["pain_points", "painPoints"])),
        key_features: lenient_list(first_of(card, &["key_features", "keyFeatures"])),
        weaknesses: lenient_list(card.get("weaknesses")),
        revenue_model: lenient_string(first_of(card, &["revenue_model", "revenueModel"])),
    };

    Ok(StreamEvent::Competitor {
        index: index as usize,
        competitor,
    })
}

fn parse_figure(object: &Map<String, Value>) -> Result<StreamEvent> {
    let index = lenient_index(first_of(object, &["index", "figure_index"]))
        .and_then(|i| u32::try_from(i).ok())
        .ok_or_else(|| SeekerError::protocol("figure event without index"))?;
    let image_base64 = lenient_string(first_of(object, &["content", "figure", "image"]));
    if image_base64.is_empty() {
        return Err(SeekerError::protocol("figure event without image payload"));
    }
    Ok(StreamEvent::Figure(Figure {
        index,
        image_base64,
    }))
}

fn parse_requirement_card(object: &Map<String, Value>) -> RequirementCard {
    let source = object
        .get("content")
        .and_then(Value::as_object)
        .unwrap_or(object);

    RequirementCard {
        user_story: lenient_string(first_of(source, &["user_story", "userStory"])),
        slogan: lenient_string(source.get("slogan")),
        target_user: lenient_string(first_of(source, &["target_user", "targetUser"])),
        pain_points: lenient_string(first_of(source, &["pain_points", "painPoints"])),
        unique_selling_points: lenient_list(first_of(
            source,
            &["usp", "USP", "unique_selling_points", "uniqueSellingPoints"],
        )),
        revenue_model: lenient_string(first_of(source, &["revenue_model", "revenueModel"])),
    }
}

fn parse_function_list(object: &Map<String, Value>) -> Result<StreamEvent> {
    let priority_type =
        PriorityType::parse_lenient(&lenient_string(first_of(object, &["priority_type", "priorityType"])));
    let modules = first_of(object, &["content"])
        .and_then(Value::as_object)
        .ok_or_else(|| SeekerError::protocol("functionList event without module map"))?;

    let mut content = IndexMap::new();
    for (module, features) in modules {
        content.insert(module.clone(), lenient_list(Some(features)));
    }

    Ok(StreamEvent::FunctionList(FunctionListEntry {
        priority_type,
        content,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::Trend;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_unknown_step_is_ignored() {
        let event = StreamEvent::from_value(&json!({"step": "Brand New Thing"})).unwrap();
        assert_eq!(event, StreamEvent::Ignored(Some("Brand New Thing".into())));

        let event = StreamEvent::from_value(&json!({"content": "no tag"})).unwrap();
        assert_eq!(event, StreamEvent::Ignored(None));
    }

    #[test]
    fn test_legacy_id_discriminator() {
        let event = StreamEvent::from_value(&json!({"id": "Done"})).unwrap();
        assert_eq!(event, StreamEvent::Done);
    }

    #[test]
    fn test_non_object_payload_is_protocol_error() {
        let err = StreamEvent::from_value(&json!([1, 2])).unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn test_chat_id() {
        let event = StreamEvent::from_value(&json!({"step": "chatID", "content": "S1"})).unwrap();
        assert_eq!(event, StreamEvent::ChatId("S1".into()));
        assert!(StreamEvent::from_value(&json!({"step": "chatID"})).is_err());
    }

    #[test]
    fn test_logic_step_heading_split() {
        let step = split_step_message("## Find rivals\nLooking for competitors");
        assert_eq!(step.title, "Find rivals");
        assert_eq!(step.description, "Looking for competitors");

        let step = split_step_message("Just thinking out loud");
        assert_eq!(step.title, DEFAULT_STEP_TITLE);
        assert_eq!(step.description, "Just thinking out loud");
    }

    #[test]
    fn test_hot_keys_event() {
        let event = StreamEvent::from_value(&json!({
            "step": "Hot Keys",
            "type": "mostRelevant",
            "content": {"crm": 20000, "sales": 12000, "leads": "900"}
        }))
        .unwrap();

        let StreamEvent::HotKeys { bucket, keys } = event else {
            panic!("expected hot keys event");
        };
        assert_eq!(bucket, HotKeyBucket::MostRelevant);
        let trends: Vec<(&str, Trend)> = keys.iter().map(|k| (k.tag.as_str(), k.trend)).collect();
        assert_eq!(
            trends,
            vec![
                ("crm", Trend::Hot),
                ("sales", Trend::Rising),
                ("leads", Trend::Stable)
            ]
        );
        assert_eq!(keys[2].search_count, 900);
    }

    #[test]
    fn test_competitor_revenue_model_joined() {
        let event = StreamEvent::from_value(&json!({
            "step": "Main Competitors",
            "card_index": 0,
            "card_content": {
                "product_name": "Acme",
                "slogan": "Rivals, found.",
                "relevance_score": "87%",
                "key_features": ["alerts", "reports"],
                "weaknesses": "pricey",
                "revenue_model": ["ads", "subscription"]
            }
        }))
        .unwrap();

        let StreamEvent::Competitor { index, competitor } = event else {
            panic!("expected competitor event");
        };
        assert_eq!(index, 0);
        assert_eq!(competitor.name, "Acme");
        assert_eq!(competitor.relevance_score, Some(87.0));
        assert_eq!(competitor.key_features, vec!["alerts", "reports"]);
        assert_eq!(competitor.weaknesses, vec!["pricey"]);
        assert_eq!(competitor.revenue_model, "ads, subscription");
    }

    #[test]
    fn test_competitor_without_index_is_rejected() {
        let err = StreamEvent::from_value(&json!({
            "step": "Main Competitors",
            "card_content": {"product_name": "Acme"}
        }))
        .unwrap_err();
        assert!(err.is_protocol());
    }

    #[test]
    fn test_requirement_card_both_shapes() {
        let nested = StreamEvent::from_value(&json!({
            "step": "requirementCard",
            "content": {"user_story": "As a PM", "slogan": "Ship it", "usp": ["fast"]}
        }))
        .unwrap();
        let direct = StreamEvent::from_value(&json!({
            "step": "requirementCard",
            "user_story": "As a PM",
            "slogan": "Ship it",
            "usp": ["fast"]
        }))
        .unwrap();
        assert_eq!(nested, direct);

        let StreamEvent::RequirementCard(card) = nested else {
            panic!("expected requirement card");
        };
        assert_eq!(card.user_story, "As a PM");
        assert_eq!(card.unique_selling_points, vec!["fast"]);
    }

    #[test]
    fn test_function_list_event() {
        let event = StreamEvent::from_value(&json!({
            "step": "functionList",
            "priority_type": "must-have",
            "content": {"Search": ["filters", "filters", "sorting"]}
        }))
        .unwrap();
        let StreamEvent::FunctionList(entry) = event else {
            panic!("expected function list");
        };
        assert_eq!(entry.priority_type, PriorityType::MustHave);
        assert_eq!(entry.content["Search"].len(), 3);
    }

    #[test]
    fn test_figure_event() {
        let event = StreamEvent::from_value(&json!({
            "step": "figure", "index": 2, "content": "iVBORw0KGgo="
        }))
        .unwrap();
        assert_eq!(
            event,
            StreamEvent::Figure(Figure {
                index: 2,
                image_base64: "iVBORw0KGgo=".into()
            })
        );
    }
}
