use crate::core::connection::{process_results, Connection};
use crate::core::mapset::Mapset;
use crate::domain::model::LocationInfo;
use crate::utils::error::{ActiniaError, Result};
use crate::utils::validation::validate_resource_name;
use std::collections::HashMap;
use std::sync::Arc;

/// A GRASS location on the server and the mapsets fetched from it.
#[derive(Debug)]
pub struct Location {
    connection: Arc<Connection>,
    name: String,
    info: Option<LocationInfo>,
    mapsets: HashMap<String, Mapset>,
}

impl Location {
    pub(crate) fn new(connection: Arc<Connection>, name: String) -> Self {
        Self {
            connection,
            name,
            info: None,
            mapsets: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Projection and default region, cached after the first fetch.
    pub fn info(&self) -> Option<&LocationInfo> {
        self.info.as_ref()
    }

    pub async fn get_info(&mut self) -> Result<&LocationInfo> {
        let response = self
            .connection
            .get(&["locations", self.name.as_str(), "info"])
            .await?;
        let info = process_results(response)?;
        Ok(&*self.info.insert(info))
    }

    pub async fn get_mapsets(&mut self) -> Result<&HashMap<String, Mapset>> {
        let response = self
            .connection
            .get(&["locations", self.name.as_str(), "mapsets"])
            .await?;
        let names: Vec<String> = process_results(response)?;
        tracing::debug!("Location {} has {} mapsets", self.name, names.len());

        self.mapsets = names
            .into_iter()
            .map(|name| {
                let mapset = Mapset::new(
                    Arc::clone(&self.connection),
                    self.name.clone(),
                    name.clone(),
                );
                (name, mapset)
            })
            .collect();

        Ok(&self.mapsets)
    }

    pub async fn create_mapset(&mut self, name: &str) -> Result<&mut Mapset> {
        validate_resource_name("mapset", name)?;

        self.connection
            .post::<()>(&["locations", self.name.as_str(), "mapsets", name], None)
            .await?;
        tracing::info!("✅ Created mapset {} in location {}", name, self.name);

        let mapset = Mapset::new(
            Arc::clone(&self.connection),
            self.name.clone(),
            name.to_string(),
        );
        self.mapsets.insert(name.to_string(), mapset);
        self.mapset_mut(name)
    }

    pub async fn delete_mapset(&mut self, name: &str) -> Result<()> {
        validate_resource_name("mapset", name)?;

        self.connection
            .delete(&["locations", self.name.as_str(), "mapsets", name])
            .await?;
        tracing::info!("🗑️ Deleted mapset {} in location {}", name, self.name);

        self.mapsets.remove(name);
        Ok(())
    }

    pub fn mapsets(&self) -> &HashMap<String, Mapset> {
        &self.mapsets
    }

    pub fn mapset(&self, name: &str) -> Result<&Mapset> {
        self.mapsets
            .get(name)
            .ok_or_else(|| ActiniaError::not_found("mapset", name))
    }

    pub fn mapset_mut(&mut self, name: &str) -> Result<&mut Mapset> {
        self.mapsets
            .get_mut(name)
            .ok_or_else(|| ActiniaError::not_found("mapset", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn location(server: &MockServer) -> Location {
        let connection = Connection::new(&server.base_url(), "v3", None, None).unwrap();
        Location::new(Arc::new(connection), "nc_spm_08".to_string())
    }

    #[tokio::test]
    async fn test_get_info() {
        let server = MockServer::start();
        let info_mock = server.mock(|when, then| {
            when.method(GET).path("/api/v3/locations/nc_spm_08/info");
            then.status(200).json_body(serde_json::json!({
                "status": "finished",
                "process_results": {
                    "projection": "PROJCRS[\"NAD83(HARN) / North Carolina\"]",
                    "region": {
                        "n": 228500.0, "s": 215000.0, "e": 645000.0, "w": 630000.0,
                        "nsres": 10.0, "ewres": 10.0, "rows": 1350, "cols": 1500,
                        "cells": 2025000, "proj": 99, "zone": 0
                    }
                }
            }));
        });

        let mut location = location(&server);
        assert!(location.info().is_none());

        let info = location.get_info().await.unwrap();
        info_mock.assert();
        assert!(info.projection.contains("North Carolina"));
        assert_eq!(info.region.cells, 2025000);
        assert!(location.info().is_some());
    }

    #[tokio::test]
    async fn test_get_mapsets() {
        let server = MockServer::start();
        let mapsets_mock = server.mock(|when, then| {
            when.method(GET).path("/api/v3/locations/nc_spm_08/mapsets");
            then.status(200).json_body(serde_json::json!({
                "status": "finished",
                "process_results": ["PERMANENT", "landsat", "modis_lst"]
            }));
        });

        let mut location = location(&server);
        let mapsets = location.get_mapsets().await.unwrap();

        mapsets_mock.assert();
        assert_eq!(mapsets.len(), 3);
        let permanent = location.mapset("PERMANENT").unwrap();
        assert_eq!(permanent.name(), "PERMANENT");
        assert_eq!(permanent.location_name(), "nc_spm_08");
    }

    #[tokio::test]
    async fn test_failed_create_leaves_mapsets_untouched() {
        let server = MockServer::start();
        let create_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v3/locations/nc_spm_08/mapsets/PERMANENT");
            then.status(400).json_body(serde_json::json!({
                "status": "error",
                "message": "Mapset <PERMANENT> exists."
            }));
        });

        let mut location = location(&server);
        let err = location.create_mapset("PERMANENT").await.unwrap_err();

        create_mock.assert();
        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("Mapset <PERMANENT> exists."));
        assert!(location.mapsets().is_empty());
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_mapset() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/v3/locations/nc_spm_08/mapsets/user1");
            then.status(200).json_body(serde_json::json!({"status": "finished"}));
        });
        server.mock(|when, then| {
            when.method(DELETE)
                .path("/api/v3/locations/nc_spm_08/mapsets/user1");
            then.status(500).body("Internal Server Error");
        });

        let mut location = location(&server);
        location.create_mapset("user1").await.unwrap();

        let err = location.delete_mapset("user1").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert!(location.mapsets().contains_key("user1"));
    }
}
