mod common;

use common::{expect_get, is, json_body, respond, session, MockBackend};
use pretty_assertions::assert_eq;
use reqwest::Method;
use serde_json::{json, Value};
use txlib::api::Project;
use txlib::{Entity, ErrorKind, FieldError, FieldValue, SavePolicy, State};

#[test]
fn get_populates_object() {
    let mut backend = MockBackend::new();
    expect_get(&mut backend, "/api/2/project/slug/", r#"{"id": 100, "slug": "slug"}"#);

    let obj = Entity::<Project>::get(&session(backend), [("slug", "slug")]).unwrap();

    assert_eq!(obj.state(), State::Populated);
    assert_eq!(obj.get_field("id").unwrap(), json!(100));
    assert_eq!(obj.get_field("slug").unwrap(), "slug");
    assert_eq!(
        Value::Object(obj.populated_fields().clone()),
        json!({"id": 100, "slug": "slug"})
    );
}

#[test]
fn get_keeps_details_query_and_extra_args() {
    let mut backend = MockBackend::new();
    backend
        .expect_execute()
        .withf(|req| {
            is(req, Method::GET, "/api/2/project/p1/")
                && req.url.query() == Some("details")
                && req.query == vec![("lang".to_string(), "el".to_string())]
        })
        .times(1)
        .returning(|_| respond(200, "{}"));

    let obj = Entity::<Project>::get(&session(backend), [("slug", "p1"), ("lang", "el")]).unwrap();
    assert!(obj.is_populated());
}

#[test]
fn get_without_url_field_makes_no_request() {
    let backend = MockBackend::new();
    let err = Entity::<Project>::get(&session(backend), Vec::<(&str, &str)>::new()).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Field);
    assert_eq!(err.to_string(), "Project requires URL attribute \"slug\"");
}

#[test]
fn get_rejects_non_object_body() {
    let mut backend = MockBackend::new();
    expect_get(&mut backend, "/api/2/project/p1/", "[1, 2]");

    let err = Entity::<Project>::get(&session(backend), [("slug", "p1")]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[test]
fn setting_invalid_field_raises_error() {
    let mut obj = Entity::<Project>::new(&session(MockBackend::new()), [("slug", "slug")]).unwrap();
    obj.set_field("name", "name").unwrap();
    obj.set_field("description", "description").unwrap();

    assert_eq!(
        obj.set_field("invalid_field", ""),
        Err(FieldError::NotWritable {
            entity: "Project",
            field: "invalid_field".to_string(),
        })
    );
    assert_eq!(
        obj.set_field("slug", "other"),
        Err(FieldError::UrlFieldImmutable {
            entity: "Project",
            field: "slug".to_string(),
        })
    );
}

#[test]
fn unpopulated_object_reads_only_local_values() {
    let mut obj = Entity::<Project>::new(&session(MockBackend::new()), [("slug", "slug")]).unwrap();
    assert_eq!(obj.state(), State::Unpopulated);

    let err = obj.get_field("invalid").unwrap_err();
    assert_eq!(err.to_string(), "Project has no readable attribute \"invalid\"");

    obj.set_field("private", true).unwrap();
    assert_eq!(obj.get_field("private").unwrap(), json!(true));
    assert_eq!(obj.url_field("slug"), Some("slug"));
}

#[test]
fn local_assignment_shadows_server_state() {
    let mut backend = MockBackend::new();
    expect_get(&mut backend, "/api/2/project/p1/", r#"{"slug": "p1", "name": "Remote"}"#);

    let mut obj = Entity::<Project>::get(&session(backend), [("slug", "p1")]).unwrap();
    obj.set_field("name", "Local").unwrap();

    assert_eq!(obj.get_field("name").unwrap(), "Local");
    assert_eq!(obj.populated_fields()["name"], json!("Remote"));
}

#[test]
fn saving_existing_object_updates_it() {
    let mut backend = MockBackend::new();
    expect_get(&mut backend, "/api/2/project/slug/", r#"{"id": 100, "slug": "slug"}"#);
    backend
        .expect_execute()
        .withf(|req| {
            is(req, Method::PUT, "/api/2/project/slug/")
                && json_body(req).map(|b| Value::Object(b.clone()))
                    == Some(json!({"name": "name", "description": "description"}))
        })
        .times(1)
        .returning(|_| {
            respond(
                200,
                r#"{"id": 100, "slug": "slug", "description": "description", "name": "name"}"#,
            )
        });

    let mut obj = Entity::<Project>::get(&session(backend), [("slug", "slug")]).unwrap();
    obj.save_with([("description", "description"), ("name", "name")])
        .unwrap();

    assert_eq!(obj.get_field("name").unwrap(), "name");
    assert_eq!(obj.get_field("description").unwrap(), "description");
}

#[test]
fn saving_empty_object_does_not_make_request() {
    let mut backend = MockBackend::new();
    expect_get(&mut backend, "/api/2/project/slug/", r#"{"id": 100, "slug": "slug"}"#);

    let mut obj = Entity::<Project>::get(&session(backend), [("slug", "slug")]).unwrap();
    obj.save().unwrap();
}

#[test]
fn saving_new_object_creates_it() {
    let mut backend = MockBackend::new();
    backend
        .expect_execute()
        .withf(|req| {
            is(req, Method::POST, "/api/2/projects/")
                && json_body(req).map(|b| Value::Object(b.clone()))
                    == Some(json!({"slug": "slug", "name": "name", "description": "description"}))
        })
        .times(2)
        .returning(|_| respond(201, r#"{"id": 100, "description": "description"}"#));
    let session = session(backend);

    // set fields, then save
    let mut obj = Entity::<Project>::new(&session, [("slug", "slug")]).unwrap();
    obj.set_field("name", "name").unwrap();
    obj.set_field("description", "description").unwrap();
    obj.save().unwrap();
    assert!(obj.is_populated());
    assert_eq!(obj.get_field("name").unwrap(), "name");
    assert_eq!(obj.get_field("id").unwrap(), json!(100));

    // everything at once
    let mut obj = Entity::<Project>::new(&session, [("slug", "slug")]).unwrap();
    obj.save_with([("name", "name"), ("description", "description")])
        .unwrap();
    assert_eq!(obj.get_field("description").unwrap(), "description");
}

#[test]
fn create_is_never_skipped() {
    let mut backend = MockBackend::new();
    backend
        .expect_execute()
        .withf(|req| {
            is(req, Method::POST, "/api/2/projects/")
                && json_body(req).map(|b| Value::Object(b.clone())) == Some(json!({"slug": "p1"}))
        })
        .times(1)
        .returning(|_| respond(201, ""));

    let mut obj = Entity::<Project>::new(&session(backend), [("slug", "p1")]).unwrap();
    obj.save().unwrap();
    assert!(obj.is_populated());
}

#[test]
fn modified_fields_are_resent_after_create() {
    let mut backend = MockBackend::new();
    backend
        .expect_execute()
        .withf(|req| is(req, Method::POST, "/api/2/projects/"))
        .times(1)
        .returning(|_| respond(201, "{}"));
    backend
        .expect_execute()
        .withf(|req| {
            is(req, Method::PUT, "/api/2/project/p1/")
                && json_body(req).map(|b| Value::Object(b.clone())) == Some(json!({"name": "n"}))
        })
        .times(1)
        .returning(|_| respond(200, "{}"));

    let mut obj = Entity::<Project>::new(&session(backend), [("slug", "p1")]).unwrap();
    obj.save_with([("name", "n")]).unwrap();
    obj.save().unwrap();
    assert_eq!(obj.modified_fields().len(), 1);
}

#[test]
fn clear_policy_drops_confirmed_fields() {
    let mut backend = MockBackend::new();
    backend
        .expect_execute()
        .withf(|req| is(req, Method::POST, "/api/2/projects/"))
        .times(1)
        .returning(|_| respond(201, "{}"));

    let mut obj = Entity::<Project>::new(&session(backend), [("slug", "p1")])
        .unwrap()
        .with_save_policy(SavePolicy::ClearModified);
    obj.save_with([("name", "n")]).unwrap();

    assert!(obj.modified_fields().is_empty());
    assert_eq!(obj.get_field("name").unwrap(), "n");
    // nothing left to send
    obj.save().unwrap();
}

#[test]
fn invalid_field_in_save_raises_error() {
    let mut obj = Entity::<Project>::new(&session(MockBackend::new()), [("slug", "p1")]).unwrap();
    let err = obj
        .save_with([
            ("name", FieldValue::from("name")),
            ("description", FieldValue::from("description")),
            ("invalid", FieldValue::from("anything")),
        ])
        .unwrap_err();

    assert_eq!(err.to_string(), "Project has no writable attribute \"invalid\"");
    assert!(obj.modified_fields().is_empty());
}

#[test]
fn delete_existing_object() {
    let mut backend = MockBackend::new();
    expect_get(&mut backend, "/api/2/project/slug/", r#"{"id": 100, "slug": "slug"}"#);
    backend
        .expect_execute()
        .withf(|req| is(req, Method::DELETE, "/api/2/project/slug/"))
        .times(1)
        .returning(|_| respond(204, ""));

    let obj = Entity::<Project>::get(&session(backend), [("slug", "slug")]).unwrap();
    obj.delete().unwrap();
}

#[test]
fn delete_of_missing_object_surfaces_not_found() {
    let mut backend = MockBackend::new();
    backend
        .expect_execute()
        .withf(|req| is(req, Method::DELETE, "/api/2/project/ghost/"))
        .times(1)
        .returning(|_| respond(404, "Not found"));

    let obj = Entity::<Project>::new(&session(backend), [("slug", "ghost")]).unwrap();
    let err = obj.delete().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.status(), Some(404));
}

#[test]
fn create_conflict_is_distinguished() {
    let mut backend = MockBackend::new();
    backend
        .expect_execute()
        .withf(|req| is(req, Method::POST, "/api/2/projects/"))
        .times(1)
        .returning(|_| respond(409, "Project already exists"));

    let mut obj = Entity::<Project>::new(&session(backend), [("slug", "p1")]).unwrap();
    let err = obj.save_with([("name", "n")]).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.to_string(), "conflict: Project already exists");
    assert!(!obj.is_populated());
}

#[test]
fn instance_prefix_overrides_session_prefix() {
    let mut backend = MockBackend::new();
    expect_get(&mut backend, "/api/3/project/p1/", "{}");
    let session = session(backend);

    let mut obj = Entity::<Project>::new(&session, [("slug", "p1")])
        .unwrap()
        .with_prefix("/api/3/");
    obj.reload().unwrap();
    assert!(obj.is_populated());
    assert_eq!(obj.to_string(), "[Project slug=p1]");
}
