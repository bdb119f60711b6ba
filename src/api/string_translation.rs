use crate::model::{CreateMethod, EntityConfig, Kind};
use crate::path::PathTemplate;

/// All translated strings of a resource in one language.
///
/// There is no collection: the strings exist once the resource does, so an
/// instance is fetched and then updated with PUT on its item path.
#[derive(Debug, Clone, Copy)]
pub struct StringTranslation;

impl Kind for StringTranslation {
    const CONFIG: EntityConfig = EntityConfig {
        name: "StringTranslation",
        collection_path: None,
        item_path: PathTemplate::new(
            "project/{project_slug}/resource/{slug}/translation/{lang}/strings/",
        ),
        url_fields: &["project_slug", "slug", "lang"],
        writable_fields: &["content"],
        create_method: CreateMethod::Put,
        create_body_url_fields: &[],
    };
}

/// The translation of one source string, addressed by its source hash.
#[derive(Debug, Clone, Copy)]
pub struct SingleStringTranslation;

impl Kind for SingleStringTranslation {
    const CONFIG: EntityConfig = EntityConfig {
        name: "SingleStringTranslation",
        collection_path: None,
        item_path: PathTemplate::new(
            "project/{project_slug}/resource/{slug}/translation/{lang}/string/{source_hash}/",
        ),
        url_fields: &["project_slug", "slug", "lang", "source_hash"],
        writable_fields: &["content"],
        create_method: CreateMethod::Put,
        create_body_url_fields: &[],
    };
}
