use super::LanguageStats;
use crate::model::{CreateMethod, Entity, EntityConfig, Kind};
use crate::path::PathTemplate;

/// Read-only statistics of a resource in one language.
#[derive(Debug, Clone, Copy)]
pub struct Stats;

impl Kind for Stats {
    const CONFIG: EntityConfig = EntityConfig {
        name: "Stats",
        collection_path: Some(PathTemplate::new("project/{project_slug}/resource/{slug}/stats/")),
        item_path: PathTemplate::new("project/{project_slug}/resource/{slug}/stats/{lang}/"),
        url_fields: &["project_slug", "slug", "lang"],
        writable_fields: &[],
        create_method: CreateMethod::Post,
        create_body_url_fields: &[],
    };
}

impl Entity<Stats> {
    /// The populated fields viewed as language metrics.
    pub fn metrics(&self) -> LanguageStats {
        LanguageStats(self.populated_fields().clone())
    }
}
