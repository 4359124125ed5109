use crate::core::connection::{extract_field, Connection};
use crate::core::location::Location;
use crate::domain::model::ServerVersion;
use crate::domain::ports::{ConfigProvider, Credentials};
use crate::utils::error::{ActiniaError, Result};
use crate::utils::validation::{
    validate_api_version, validate_epsg_code, validate_resource_name, validate_url,
};
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_API_VERSION: &str = "v3";

/// A session against one actinia server.
///
/// Mirrors the server's locations as [`Location`] objects. The mapping is
/// filled by [`Actinia::get_locations`] and kept in step with
/// [`Actinia::create_location`] / [`Actinia::delete_location`].
#[derive(Debug)]
pub struct Actinia {
    base_url: String,
    api_version: String,
    connection: Arc<Connection>,
    locations: HashMap<String, Location>,
}

impl Actinia {
    pub fn new(base_url: &str, api_version: &str) -> Result<Self> {
        validate_url("base_url", base_url)?;
        validate_api_version("api_version", api_version)?;

        let connection = Connection::new(base_url, api_version, None, None)?;
        Ok(Self::with_connection(base_url, api_version, connection))
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        validate_url("base_url", config.base_url())?;
        validate_api_version("api_version", config.api_version())?;

        let connection = Connection::new(
            config.base_url(),
            config.api_version(),
            config.credentials(),
            config.timeout(),
        )?;
        Ok(Self::with_connection(
            config.base_url(),
            config.api_version(),
            connection,
        ))
    }

    fn with_connection(base_url: &str, api_version: &str, connection: Connection) -> Self {
        tracing::debug!("actinia session for {}", connection.api_root());
        Self {
            base_url: base_url.to_string(),
            api_version: api_version.to_string(),
            connection: Arc::new(connection),
            locations: HashMap::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Use basic auth for every later request.
    ///
    /// Objects fetched under the previous identity are dropped, since another
    /// user may see different locations and mapsets.
    pub fn set_authentication(&mut self, user: &str, password: &str) {
        tracing::info!("🔑 Authenticating as {}", user);
        let credentials = Credentials::new(user, password);
        self.connection = Arc::new(self.connection.with_credentials(Some(credentials)));
        self.locations.clear();
    }

    pub fn is_authenticated(&self) -> bool {
        self.connection.credentials().is_some()
    }

    pub async fn get_version(&self) -> Result<ServerVersion> {
        let response = self.connection.get(&["version"]).await?;
        Ok(serde_json::from_value(response)?)
    }

    /// Fetch the location names and rebuild the local mapping.
    pub async fn get_locations(&mut self) -> Result<&HashMap<String, Location>> {
        let response = self.connection.get(&["locations"]).await?;
        let names: Vec<String> = extract_field(response, "locations")?;
        tracing::debug!("Found {} locations", names.len());

        self.locations = names
            .into_iter()
            .map(|name| {
                let location = Location::new(Arc::clone(&self.connection), name.clone());
                (name, location)
            })
            .collect();

        Ok(&self.locations)
    }

    pub async fn create_location(&mut self, name: &str, epsg: &str) -> Result<&mut Location> {
        validate_resource_name("location", name)?;
        validate_epsg_code("epsg", epsg)?;

        let body = serde_json::json!({ "epsg": epsg });
        self.connection.post(&["locations", name], Some(&body)).await?;
        tracing::info!("✅ Created location {} (EPSG:{})", name, epsg);

        let location = Location::new(Arc::clone(&self.connection), name.to_string());
        self.locations.insert(name.to_string(), location);
        self.location_mut(name)
    }

    pub async fn delete_location(&mut self, name: &str) -> Result<()> {
        validate_resource_name("location", name)?;

        self.connection.delete(&["locations", name]).await?;
        tracing::info!("🗑️ Deleted location {}", name);

        self.locations.remove(name);
        Ok(())
    }

    pub fn locations(&self) -> &HashMap<String, Location> {
        &self.locations
    }

    pub fn location(&self, name: &str) -> Result<&Location> {
        self.locations
            .get(name)
            .ok_or_else(|| ActiniaError::not_found("location", name))
    }

    pub fn location_mut(&mut self, name: &str) -> Result<&mut Location> {
        self.locations
            .get_mut(name)
            .ok_or_else(|| ActiniaError::not_found("location", name))
    }
}
