use crate::error::{TxError, TxResult};
use crate::model::{CreateMethod, Entity, EntityConfig, Kind, CONTENT_FIELD};
use crate::path::PathTemplate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

const CONTENT_PATH: PathTemplate =
    PathTemplate::new("project/{project_slug}/resource/{slug}/content/");
const STATS_PATH: PathTemplate = PathTemplate::new("project/{project_slug}/resource/{slug}/stats/");

/// Field under which [`Entity::<Resource>::stats`] caches the raw statistics.
pub const STATS_FIELD: &str = "stats";

/// A translatable source file inside a project.
#[derive(Debug, Clone, Copy)]
pub struct Resource;

impl Kind for Resource {
    const CONFIG: EntityConfig = EntityConfig {
        name: "Resource",
        collection_path: Some(PathTemplate::new("project/{project_slug}/resources/")),
        item_path: PathTemplate::new("project/{project_slug}/resource/{slug}/?details"),
        url_fields: &["project_slug", "slug"],
        writable_fields: &[
            "name",
            "mimetype",
            "content",
            "i18n_type",
            "categories",
            "accept_translations",
            "source_language",
            "priority",
        ],
        create_method: CreateMethod::Post,
        create_body_url_fields: &["slug"],
    };
}

/// Metrics for one language, as returned by the server.
///
/// Keys are kept as they arrive; the accessors read the common ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LanguageStats(pub Map<String, Value>);

impl LanguageStats {
    /// Completion percentage, e.g. `"91%"`.
    pub fn completed(&self) -> Option<&str> {
        self.0.get("completed").and_then(Value::as_str)
    }

    pub fn translated_entities(&self) -> Option<u64> {
        self.count("translated_entities")
    }

    pub fn untranslated_entities(&self) -> Option<u64> {
        self.count("untranslated_entities")
    }

    pub fn translated_words(&self) -> Option<u64> {
        self.count("translated_words")
    }

    pub fn untranslated_words(&self) -> Option<u64> {
        self.count("untranslated_words")
    }

    pub fn reviewed(&self) -> Option<u64> {
        self.count("reviewed")
    }

    pub fn reviewed_percentage(&self) -> Option<&str> {
        self.0.get("reviewed_percentage").and_then(Value::as_str)
    }

    pub fn last_update(&self) -> Option<&str> {
        self.0.get("last_update").and_then(Value::as_str)
    }

    pub fn last_committer(&self) -> Option<&str> {
        self.0.get("last_committer").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn count(&self, key: &str) -> Option<u64> {
        self.0.get(key).and_then(Value::as_u64)
    }
}

impl Entity<Resource> {
    /// Fetches the source content from its own endpoint and caches it as the `content` field.
    pub fn retrieve_content(&mut self) -> TxResult<Value> {
        let path = self.resolve(CONTENT_PATH)?;
        let mut body = self.session().transport().get(&path, &[])?;
        let content = body
            .get_mut(CONTENT_FIELD)
            .map(Value::take)
            .ok_or_else(|| {
                TxError::UnexpectedResponse(format!("no content in response for {self}"))
            })?;
        self.cache(CONTENT_FIELD, content.clone());
        Ok(content)
    }

    /// Fetches per-language statistics, keyed by language code, and caches the raw body.
    pub fn stats(&mut self) -> TxResult<BTreeMap<String, LanguageStats>> {
        let path = self.resolve(STATS_PATH)?;
        let body = self.session().transport().get(&path, &[])?;
        if !body.is_object() {
            return Err(TxError::UnexpectedResponse(format!(
                "expected statistics by language for {self}, got {body}"
            )));
        }
        self.cache(STATS_FIELD, body.clone());
        Ok(serde_json::from_value(body)?)
    }
}
