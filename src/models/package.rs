use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Package {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(rename = "originalPrice")]
    pub original_price: f64,
    pub discount: i32,
    pub image: String,
    pub features: Vec<String>,
    pub created_at: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

/// Accepts a JSON number or a numeric string; clients send prices both
/// ways ("1299" and 1299 are both in the wild).
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum JsonNumber {
    Number(f64),
    Text(String),
}

impl JsonNumber {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonNumber::Number(n) => Some(*n),
            JsonNumber::Text(s) => s.trim().parse().ok(),
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            JsonNumber::Number(n) if n.fract() == 0.0 => Some(*n as i32),
            JsonNumber::Number(_) => None,
            JsonNumber::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreatePackageDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<JsonNumber>,
    #[serde(rename = "originalPrice")]
    pub original_price: Option<JsonNumber>,
    pub discount: Option<JsonNumber>,
    pub image: Option<String>,
    pub features: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdatePackageDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<JsonNumber>,
    #[serde(rename = "originalPrice")]
    pub original_price: Option<JsonNumber>,
    pub discount: Option<JsonNumber>,
    pub image: Option<String>,
    pub features: Option<Vec<String>>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct PackageResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    #[serde(rename = "originalPrice")]
    pub original_price: f64,
    pub discount: i32,
    pub image: String,
    pub features: Vec<String>,
}

impl From<Package> for PackageResponse {
    fn from(package: Package) -> Self {
        PackageResponse {
            id: package.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: package.name,
            description: package.description,
            price: package.price,
            original_price: package.original_price,
            discount: package.discount,
            image: package.image,
            features: package.features,
        }
    }
}

/// Coerce a client-supplied features value into a list of strings;
/// anything that is not a proper JSON array becomes an empty list.
pub fn coerce_features(value: &serde_json::Value) -> Vec<String> {
    match value.as_array() {
        Some(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prices_coerce_from_numbers_and_strings() {
        assert_eq!(JsonNumber::Number(1299.0).as_f64(), Some(1299.0));
        assert_eq!(JsonNumber::Text("1299.5".to_string()).as_f64(), Some(1299.5));
        assert_eq!(JsonNumber::Text("not a price".to_string()).as_f64(), None);
    }

    #[test]
    fn discount_requires_a_whole_number() {
        assert_eq!(JsonNumber::Number(19.0).as_i32(), Some(19));
        assert_eq!(JsonNumber::Text("20".to_string()).as_i32(), Some(20));
        assert_eq!(JsonNumber::Number(19.5).as_i32(), None);
    }

    #[test]
    fn features_fall_back_to_empty_when_not_a_list() {
        assert_eq!(
            coerce_features(&json!(["wifi", "breakfast"])),
            vec!["wifi".to_string(), "breakfast".to_string()]
        );
        assert!(coerce_features(&json!("wifi")).is_empty());
        assert!(coerce_features(&json!({"a": 1})).is_empty());
    }
}
