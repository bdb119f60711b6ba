use crate::model::{CreateMethod, EntityConfig, Kind};
use crate::path::PathTemplate;

/// A project, identified by its slug.
#[derive(Debug, Clone, Copy)]
pub struct Project;

impl Kind for Project {
    const CONFIG: EntityConfig = EntityConfig {
        name: "Project",
        collection_path: Some(PathTemplate::new("projects/")),
        item_path: PathTemplate::new("project/{slug}/?details"),
        url_fields: &["slug"],
        writable_fields: &[
            "name",
            "description",
            "long_description",
            "private",
            "homepage",
            "feed",
            "anyone_submit",
            "hidden",
            "bug_tracker",
            "trans_instructions",
            "tags",
            "maintainers",
            "outsource",
            "source_language_code",
            "repository_url",
            "license",
        ],
        create_method: CreateMethod::Post,
        create_body_url_fields: &["slug"],
    };
}
