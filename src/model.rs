//! Generic proxy between local entity instances and the remote API.
//!
//! An [`Entity`] keeps two field maps: `populated`, the last state confirmed
//! by the server, and `modified`, values assigned locally and not yet
//! confirmed. Reads look at `modified` first, so local assignments shadow the
//! server state. Which names are accepted, and which paths are used, comes
//! from the [`EntityConfig`] of the entity's [`Kind`].

use crate::error::{FieldError, TxError, TxResult};
use crate::path::{join_subpaths, PathTemplate};
use crate::session::Session;
use bytes::Bytes;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// The only field that may carry binary data; it is uploaded as a file part.
pub const CONTENT_FIELD: &str = "content";

/// HTTP method used to create a new remote object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateMethod {
    /// POST to the collection path.
    Post,
    /// PUT to the collection path, for upsert-style endpoints.
    Put,
}

/// Static description of one kind of remote object.
#[derive(Debug, Clone, Copy)]
pub struct EntityConfig {
    pub name: &'static str,
    pub collection_path: Option<PathTemplate>,
    pub item_path: PathTemplate,
    /// Fields embedded in the path. Required at construction, immutable afterwards.
    pub url_fields: &'static [&'static str],
    /// Fields that may be assigned locally and sent in bodies.
    pub writable_fields: &'static [&'static str],
    pub create_method: CreateMethod,
    /// URL fields the server also expects in the body of a create request.
    pub create_body_url_fields: &'static [&'static str],
}

impl EntityConfig {
    pub fn url_field(&self, name: &str) -> Option<&'static str> {
        self.url_fields.iter().copied().find(|f| *f == name)
    }

    pub fn writable_field(&self, name: &str) -> Option<&'static str> {
        self.writable_fields.iter().copied().find(|f| *f == name)
    }
}

/// Implemented by marker types such as [`crate::api::Project`].
pub trait Kind {
    const CONFIG: EntityConfig;
}

/// A field value: JSON, or raw bytes for binary content.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Json(Value),
    Binary(Bytes),
}

impl FieldValue {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            FieldValue::Json(value) => Some(value),
            FieldValue::Binary(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_json().and_then(Value::as_str)
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            FieldValue::Binary(bytes) => Some(bytes),
            FieldValue::Json(_) => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, FieldValue::Binary(_))
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::Json(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Json(Value::from(value))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Json(Value::from(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Json(Value::from(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Json(Value::from(value))
    }
}

impl From<Bytes> for FieldValue {
    fn from(value: Bytes) -> Self {
        FieldValue::Binary(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        FieldValue::Binary(Bytes::from(value))
    }
}

impl PartialEq<&str> for FieldValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<Value> for FieldValue {
    fn eq(&self, other: &Value) -> bool {
        self.as_json() == Some(other)
    }
}

/// What happens to `modified` after a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SavePolicy {
    /// Modified fields persist until overwritten; a later save resends them.
    #[default]
    KeepModified,
    /// Modified fields are dropped once the server accepted them.
    ClearModified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Unpopulated,
    Populated,
}

/// Local handle to one remote object of kind `K`.
#[derive(Debug, Clone)]
pub struct Entity<K: Kind> {
    session: Session,
    prefix: String,
    url_values: BTreeMap<&'static str, String>,
    populated: Map<String, Value>,
    modified: BTreeMap<String, FieldValue>,
    state: State,
    save_policy: SavePolicy,
    kind: PhantomData<K>,
}

impl<K: Kind> Entity<K> {
    /// Builds an unpopulated instance without any request.
    ///
    /// Every URL field must be given, and nothing else.
    pub fn new<I, N, V>(session: &Session, url_values: I) -> TxResult<Self>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<String>,
    {
        let config = K::CONFIG;
        let mut values = BTreeMap::new();
        for (name, value) in url_values {
            let name = name.as_ref();
            let field = config
                .url_field(name)
                .ok_or_else(|| FieldError::UnknownUrlField {
                    entity: config.name,
                    field: name.to_string(),
                })?;
            values.insert(field, value.into());
        }
        Self::with_url_values(session, values)
    }

    /// Fetches the object identified by the URL fields in `args`.
    ///
    /// Arguments that are not URL fields are sent as query parameters.
    pub fn get<I, N, V>(session: &Session, args: I) -> TxResult<Self>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<String>,
    {
        let config = K::CONFIG;
        let mut values = BTreeMap::new();
        let mut params = Vec::new();
        for (name, value) in args {
            let name = name.as_ref();
            match config.url_field(name) {
                Some(field) => {
                    values.insert(field, value.into());
                }
                None => params.push((name.to_string(), value.into())),
            }
        }
        let mut entity = Self::with_url_values(session, values)?;
        entity.populate(&params)?;
        Ok(entity)
    }

    fn with_url_values(
        session: &Session,
        url_values: BTreeMap<&'static str, String>,
    ) -> TxResult<Self> {
        let config = K::CONFIG;
        if let Some(missing) = config
            .url_fields
            .iter()
            .copied()
            .find(|f| !url_values.contains_key(f))
        {
            return Err(FieldError::MissingUrlField {
                entity: config.name,
                field: missing.to_string(),
            }
            .into());
        }
        Ok(Self {
            session: session.clone(),
            prefix: session.prefix().to_string(),
            url_values,
            populated: Map::new(),
            modified: BTreeMap::new(),
            state: State::Unpopulated,
            save_policy: SavePolicy::default(),
            kind: PhantomData,
        })
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_save_policy(mut self, policy: SavePolicy) -> Self {
        self.save_policy = policy;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_populated(&self) -> bool {
        self.state == State::Populated
    }

    pub fn populated_fields(&self) -> &Map<String, Value> {
        &self.populated
    }

    pub fn modified_fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.modified
    }

    /// Value of a URL field given at construction.
    pub fn url_field(&self, name: &str) -> Option<&str> {
        self.url_values.get(name).map(String::as_str)
    }

    pub fn path_to_collection(&self) -> TxResult<String> {
        let config = K::CONFIG;
        let template = config
            .collection_path
            .ok_or_else(|| TxError::Config(format!("{} has no collection path", config.name)))?;
        self.resolve(template)
    }

    pub fn path_to_item(&self) -> TxResult<String> {
        self.resolve(K::CONFIG.item_path)
    }

    /// Renders `template` with this instance's URL fields under its prefix.
    pub(crate) fn resolve(&self, template: PathTemplate) -> TxResult<String> {
        let subpath = template.render(&self.url_values)?;
        Ok(join_subpaths(&[self.prefix.as_str(), subpath.as_str()]))
    }

    /// Stores a value fetched from a sub-endpoint as server state.
    pub(crate) fn cache(&mut self, name: &str, value: Value) {
        self.populated.insert(name.to_string(), value);
    }

    pub fn get_field(&self, name: &str) -> Result<FieldValue, FieldError> {
        if let Some(value) = self.modified.get(name) {
            return Ok(value.clone());
        }
        if let Some(value) = self.populated.get(name) {
            return Ok(FieldValue::Json(value.clone()));
        }
        Err(FieldError::Unreadable {
            entity: K::CONFIG.name,
            field: name.to_string(),
        })
    }

    /// Assigns a writable field locally; nothing is sent until [`Entity::save`].
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), FieldError> {
        let value = value.into();
        Self::check_writable(name, &value)?;
        self.modified.insert(name.to_string(), value);
        Ok(())
    }

    fn check_writable(name: &str, value: &FieldValue) -> Result<(), FieldError> {
        let config = K::CONFIG;
        if config.url_field(name).is_some() {
            return Err(FieldError::UrlFieldImmutable {
                entity: config.name,
                field: name.to_string(),
            });
        }
        if config.writable_field(name).is_none() {
            return Err(FieldError::NotWritable {
                entity: config.name,
                field: name.to_string(),
            });
        }
        if value.is_binary() && name != CONTENT_FIELD {
            return Err(FieldError::BinaryNotAllowed {
                entity: config.name,
                field: name.to_string(),
            });
        }
        Ok(())
    }

    /// Re-fetches the item and replaces the populated fields.
    pub fn reload(&mut self) -> TxResult<()> {
        self.populate(&[])
    }

    fn populate(&mut self, params: &[(String, String)]) -> TxResult<()> {
        let path = self.path_to_item()?;
        let body = self.session.transport().get(&path, params)?;
        match body {
            Value::Object(fields) => {
                self.populated = fields;
                self.state = State::Populated;
                Ok(())
            }
            other => Err(TxError::UnexpectedResponse(format!(
                "expected a JSON object for {self}, got {other}"
            ))),
        }
    }

    /// Sends the pending modifications.
    pub fn save(&mut self) -> TxResult<()> {
        self.save_with(Vec::<(&str, FieldValue)>::new())
    }

    /// Merges `fields` into the modifications, then creates or updates the remote object.
    ///
    /// A populated instance is updated with PUT on its item path; an update
    /// with nothing to send makes no request. Otherwise the object is created
    /// through the collection path, even with an empty body. All names are
    /// checked before any of them is merged.
    pub fn save_with<I, N, V>(&mut self, fields: I) -> TxResult<()>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<FieldValue>,
    {
        let fields: Vec<(String, FieldValue)> = fields
            .into_iter()
            .map(|(name, value)| (name.as_ref().to_string(), value.into()))
            .collect();
        for (name, value) in &fields {
            Self::check_writable(name, value)?;
        }
        self.modified.extend(fields);

        match self.state {
            State::Populated => self.update(),
            State::Unpopulated => self.create(),
        }
    }

    fn update(&mut self) -> TxResult<()> {
        if self.modified.is_empty() {
            tracing::debug!("Nothing to update for {}", self);
            return Ok(());
        }
        let path = self.path_to_item()?;
        let (data, content) = self.payload(&[]);
        tracing::debug!("Updating {} at {}", self, path);
        let response = self.session.transport().put(&path, data.clone(), content)?;
        self.confirm(data, &response);
        Ok(())
    }

    fn create(&mut self) -> TxResult<()> {
        let config = K::CONFIG;
        let path = self.path_to_collection()?;
        let (data, content) = self.payload(config.create_body_url_fields);
        tracing::debug!("Creating {} at {} ({:?})", self, path, config.create_method);
        let transport = self.session.transport();
        let response = match config.create_method {
            CreateMethod::Post => transport.post(&path, data.clone(), content)?,
            CreateMethod::Put => transport.put(&path, data.clone(), content)?,
        };
        self.confirm(data, &response);
        Ok(())
    }

    /// JSON body from the modified fields; binary content is split off as the file part.
    fn payload(&self, url_fields: &[&str]) -> (Map<String, Value>, Option<Bytes>) {
        let mut data = Map::new();
        for name in url_fields {
            if let Some(value) = self.url_values.get(*name) {
                data.insert(name.to_string(), Value::String(value.clone()));
            }
        }
        let mut content = None;
        for (name, value) in &self.modified {
            match value {
                FieldValue::Json(json) => {
                    data.insert(name.clone(), json.clone());
                }
                FieldValue::Binary(bytes) => content = Some(bytes.clone()),
            }
        }
        (data, content)
    }

    /// Records a successful save: sent fields and any JSON object returned become server state.
    fn confirm(&mut self, sent: Map<String, Value>, response: &str) {
        self.populated.extend(sent);
        match serde_json::from_str::<Value>(response) {
            Ok(Value::Object(fields)) => self.populated.extend(fields),
            _ => tracing::debug!("Response for {} is not a JSON object", self),
        }
        self.state = State::Populated;
        if self.save_policy == SavePolicy::ClearModified {
            self.modified.clear();
        }
    }

    /// Deletes the remote object. Errors such as not-found are returned as is.
    pub fn delete(&self) -> TxResult<()> {
        let path = self.path_to_item()?;
        tracing::debug!("Deleting {} at {}", self, path);
        self.session.transport().delete(&path)?;
        Ok(())
    }
}

impl<K: Kind> fmt::Display for Entity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}", K::CONFIG.name)?;
        for field in K::CONFIG.url_fields {
            if let Some(value) = self.url_values.get(*field) {
                write!(f, " {field}={value}")?;
            }
        }
        f.write_str("]")
    }
}
