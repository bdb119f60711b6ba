//! Client library for the Transifex REST API.
//!
//! Remote projects, resources, translations and statistics are handled
//! through [`Entity`], a local proxy that fetches remote state on
//! [`Entity::get`], keeps local assignments apart from server state, and
//! creates or updates the remote object on [`Entity::save`].
//!
//! ```no_run
//! use txlib::api::{Project, Resource};
//! use txlib::{Config, Entity, Session};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     txlib::logging::init(&config);
//!     let session = Session::from_config(&config)?;
//!
//!     let mut project = Entity::<Project>::get(&session, [("slug", "my-project")])?;
//!     project.set_field("description", "Strings of the web app")?;
//!     project.save()?;
//!
//!     let mut resource = Entity::<Resource>::new(
//!         &session,
//!         [("project_slug", "my-project"), ("slug", "web")],
//!     )?;
//!     resource.save_with([("name", "Web"), ("i18n_type", "PO"), ("content", "msgid \"\"")])?;
//!     for (lang, stats) in resource.stats()? {
//!         println!("{lang}: {:?}", stats.completed());
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod model;
pub mod path;
pub mod session;

pub use auth::{AuthInfo, Credentials};
pub use config::Config;
pub use error::{ErrorKind, FieldError, TxError, TxResult};
pub use http::{HttpBackend, HttpRequest, HttpResponse, NoResponse, RequestBody, Transport};
pub use model::{Entity, FieldValue, SavePolicy, State};
pub use session::Session;
