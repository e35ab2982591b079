//! Embedded JSON Schemas

use rust_embed::Embed;
use std::collections::HashMap;

use crate::core::identity::EntityPrefix;

#[derive(Embed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

/// Schema documents keyed by the entity prefix they describe
pub struct SchemaRegistry {
    schemas: HashMap<EntityPrefix, String>,
}

impl SchemaRegistry {
    /// Schema file name for a prefix. Components are described inside the
    /// asset schema and have no file of their own.
    fn file_name(prefix: EntityPrefix) -> Option<&'static str> {
        match prefix {
            EntityPrefix::Ast => Some("asset.schema.json"),
            EntityPrefix::Cmp => None,
        }
    }

    /// Raw schema JSON for an entity prefix
    pub fn get(&self, prefix: EntityPrefix) -> Option<&str> {
        self.schemas.get(&prefix).map(String::as_str)
    }

    /// Prefixes with a registered schema
    pub fn prefixes(&self) -> impl Iterator<Item = EntityPrefix> + '_ {
        self.schemas.keys().copied()
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        let mut schemas = HashMap::new();
        for prefix in EntityPrefix::all() {
            let Some(name) = Self::file_name(*prefix) else {
                continue;
            };
            match EmbeddedSchemas::get(name) {
                Some(file) => {
                    schemas.insert(*prefix, String::from_utf8_lossy(&file.data).into_owned());
                }
                None => tracing::warn!(schema = name, "embedded schema missing"),
            }
        }
        Self { schemas }
    }
}
