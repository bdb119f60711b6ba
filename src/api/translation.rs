use crate::model::{CreateMethod, EntityConfig, Kind};
use crate::path::PathTemplate;

const TRANSLATION_PATH: PathTemplate =
    PathTemplate::new("project/{project_slug}/resource/{slug}/translation/{lang}/");

/// Translation of a resource into one language.
///
/// Uploads are idempotent on the server, so creating one is a PUT on the
/// same path that reads it.
#[derive(Debug, Clone, Copy)]
pub struct Translation;

impl Kind for Translation {
    const CONFIG: EntityConfig = EntityConfig {
        name: "Translation",
        collection_path: Some(TRANSLATION_PATH),
        item_path: TRANSLATION_PATH,
        url_fields: &["project_slug", "slug", "lang"],
        writable_fields: &["content"],
        create_method: CreateMethod::Put,
        create_body_url_fields: &[],
    };
}
