use serde::{Deserialize, Serialize};
use store_object::{FieldDef, Record, RecordDescriptor, RecordMeta};

static SQUAD: RecordDescriptor = RecordDescriptor::new(
    "Squad",
    "squad",
    &[
        FieldDef::id("id"),
        FieldDef::text("name"),
        FieldDef::text("product"),
        FieldDef::text("tool"),
        FieldDef::integer("memberCount"),
        FieldDef::timestamp("createdAt"),
        FieldDef::timestamp("updatedAt"),
    ],
);

/// A team working on a product with a given tool
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Squad {
    #[serde(flatten)]
    pub meta: RecordMeta,
    pub name: Option<String>,
    pub product: Option<String>,
    pub tool: Option<String>,
    pub member_count: Option<i64>,
}

impl Squad {
    pub fn new(name: &str, product: &str, tool: &str, member_count: i64) -> Self {
        Self {
            meta: RecordMeta::default(),
            name: Some(name.to_string()),
            product: Some(product.to_string()),
            tool: Some(tool.to_string()),
            member_count: Some(member_count),
        }
    }
}

impl Record for Squad {
    fn descriptor() -> &'static RecordDescriptor {
        &SQUAD
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_is_valid() {
        assert!(Squad::descriptor().validate().is_ok());
        assert_eq!(Squad::descriptor().cache_key(42), "squad:42");
        assert!(Squad::descriptor().use_cache);
        assert_eq!(Squad::descriptor().cache_time, 1800);
    }

    #[test]
    fn test_normalized_form() {
        let squad = Squad::new("Alpha", "P1", "T1", 5);
        let normalized = squad.normalized().unwrap();

        assert_eq!(
            serde_json::Value::Object(normalized),
            json!({
                "id": null,
                "name": "Alpha",
                "product": "P1",
                "tool": "T1",
                "memberCount": 5,
                "createdAt": null,
                "updatedAt": null
            })
        );
    }

    #[test]
    fn test_deserialize_request_body() {
        let squad: Squad = serde_json::from_value(json!({
            "name": "Beta",
            "memberCount": 3,
            "id": 12
        }))
        .unwrap();

        assert_eq!(squad.name.as_deref(), Some("Beta"));
        assert_eq!(squad.member_count, Some(3));
        assert_eq!(squad.id(), Some(12));
        assert!(squad.product.is_none());
    }
}
