//! Mapping between domain types and Qdrant wire types.

use std::collections::HashMap;

use qdrant_client::qdrant::{
    self, Condition, Distance, Filter, PointId, Value as QdrantValue, point_id::PointIdOptions,
};
use uuid::Uuid;

use crate::models::{DistanceMetric, Payload, SearchFilter};

/// Qdrant only accepts unsigned integers or UUIDs as point ids.
///
/// Canonical decimal ids map to the integer, canonical hyphenated UUIDs to
/// themselves and anything else to a deterministic UUIDv5 of the exact
/// string, so distinct product ids never share a point.
pub fn point_id(product_id: &str) -> PointId {
    if let Ok(num) = product_id.parse::<u64>()
        && num.to_string() == product_id
    {
        return PointId::from(num);
    }
    if let Ok(uuid) = Uuid::parse_str(product_id)
        && uuid.hyphenated().to_string() == product_id
    {
        return PointId::from(product_id.to_string());
    }
    PointId::from(Uuid::new_v5(&Uuid::NAMESPACE_OID, product_id.as_bytes()).to_string())
}

/// Best-effort string form of a point id, used when a payload lacks `product_id`
pub fn point_id_to_string(id: &PointId) -> Option<String> {
    match &id.point_id_options {
        Some(PointIdOptions::Num(n)) => Some(n.to_string()),
        Some(PointIdOptions::Uuid(u)) => Some(u.clone()),
        None => None,
    }
}

pub fn to_qdrant_distance(metric: DistanceMetric) -> Distance {
    match metric {
        DistanceMetric::Cosine => Distance::Cosine,
        DistanceMetric::Euclid => Distance::Euclid,
        DistanceMetric::Dot => Distance::Dot,
        DistanceMetric::Manhattan => Distance::Manhattan,
    }
}

pub fn from_qdrant_distance(distance: Distance) -> DistanceMetric {
    match distance {
        Distance::Euclid => DistanceMetric::Euclid,
        Distance::Dot => DistanceMetric::Dot,
        Distance::Manhattan => DistanceMetric::Manhattan,
        _ => DistanceMetric::Cosine,
    }
}

/// Translate the typed predicate into a Qdrant `must` filter
pub fn to_qdrant_filter(filter: &SearchFilter) -> Filter {
    match filter {
        SearchFilter::Equals { .. } => Filter::must([to_condition(filter)]),
        SearchFilter::And(filters) => Filter::must(filters.iter().map(to_condition)),
    }
}

fn to_condition(filter: &SearchFilter) -> Condition {
    match filter {
        SearchFilter::Equals { field, value } => Condition::matches(field.clone(), value.clone()),
        SearchFilter::And(_) => Condition::from(to_qdrant_filter(filter)),
    }
}

pub fn payload_to_qdrant(payload: Payload) -> HashMap<String, QdrantValue> {
    payload
        .into_iter()
        .filter_map(|(key, val)| json_to_qdrant_value(val).map(|v| (key, v)))
        .collect()
}

pub fn payload_from_qdrant(payload: HashMap<String, QdrantValue>) -> Payload {
    payload
        .into_iter()
        .filter_map(|(key, val)| qdrant_value_to_json(val).map(|v| (key, v)))
        .collect()
}

fn json_to_qdrant_value(val: serde_json::Value) -> Option<QdrantValue> {
    match val {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(QdrantValue::from(b)),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Some(QdrantValue::from(i)),
            None => n.as_f64().map(QdrantValue::from),
        },
        serde_json::Value::String(s) => Some(QdrantValue::from(s)),
        // Nested values are stored as their JSON text
        other => Some(QdrantValue::from(other.to_string())),
    }
}

fn qdrant_value_to_json(val: QdrantValue) -> Option<serde_json::Value> {
    use qdrant::value::Kind;

    match val.kind {
        Some(Kind::NullValue(_)) => Some(serde_json::Value::Null),
        Some(Kind::BoolValue(b)) => Some(serde_json::Value::Bool(b)),
        Some(Kind::IntegerValue(i)) => Some(serde_json::Value::Number(i.into())),
        Some(Kind::DoubleValue(f)) => serde_json::Number::from_f64(f).map(serde_json::Value::Number),
        Some(Kind::StringValue(s)) => Some(serde_json::Value::String(s)),
        _ => None,
    }
}
