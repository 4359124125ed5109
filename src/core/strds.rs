use crate::core::connection::{process_results, Connection};
use crate::core::mapset::MapsetPath;
use crate::domain::model::{Metadata, RasterRegistration, StrdsRasterEntry};
use crate::utils::error::Result;
use crate::utils::validation::validate_resource_name;
use std::sync::Arc;

/// A space-time raster dataset (STRDS) in a mapset.
#[derive(Debug)]
pub struct SpaceTimeRasterDataset {
    connection: Arc<Connection>,
    path: MapsetPath,
    name: String,
    info: Option<Metadata>,
}

impl SpaceTimeRasterDataset {
    pub(crate) fn new(connection: Arc<Connection>, path: MapsetPath, name: String) -> Self {
        Self {
            connection,
            path,
            name,
            info: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// GRASS style identifier, `name@mapset`.
    pub fn id(&self) -> String {
        format!("{}@{}", self.name, self.path.mapset)
    }

    pub fn location_name(&self) -> &str {
        &self.path.location
    }

    pub fn mapset_name(&self) -> &str {
        &self.path.mapset
    }

    /// Metadata from the last [`Self::get_info`] call.
    pub fn info(&self) -> Option<&Metadata> {
        self.info.as_ref()
    }

    /// Fetch `t.info` metadata (cells, min, max, temporal extent, ...).
    pub async fn get_info(&mut self) -> Result<&Metadata> {
        let segments = self.path.segments(&["strds", self.name.as_str()]);
        let response = self.connection.get(&segments).await?;
        let info: Metadata = process_results(response)?;
        tracing::debug!("STRDS {} info has {} entries", self.name, info.len());
        Ok(&*self.info.insert(info))
    }

    /// Raster maps registered in the dataset, optionally filtered with a
    /// temporal SQL `where` clause such as `start_time >= '2016-01-01'`.
    pub async fn get_raster_layers(&self, where_clause: Option<&str>) -> Result<Vec<StrdsRasterEntry>> {
        let segments = self
            .path
            .segments(&["strds", self.name.as_str(), "raster_layers"]);
        let response = match where_clause {
            Some(clause) => {
                self.connection
                    .get_with_query(&segments, &[("where", clause)])
                    .await?
            }
            None => self.connection.get(&segments).await?,
        };
        process_results(response)
    }

    pub async fn register_raster_layers(&mut self, layers: &[RasterRegistration]) -> Result<()> {
        for layer in layers {
            validate_resource_name("raster", &layer.name)?;
        }

        let segments = self
            .path
            .segments(&["strds", self.name.as_str(), "raster_layers"]);
        self.connection.put(&segments, layers).await?;
        tracing::info!("✅ Registered {} raster layers in STRDS {}", layers.len(), self.name);

        // temporal extent and map count changed
        self.info = None;
        Ok(())
    }

    pub async fn unregister_raster_layers(&mut self, names: &[&str]) -> Result<()> {
        for name in names {
            validate_resource_name("raster", name)?;
        }

        let segments = self
            .path
            .segments(&["strds", self.name.as_str(), "raster_layers"]);
        self.connection.delete_with_body(&segments, names).await?;
        tracing::info!("🗑️ Unregistered {} raster layers from STRDS {}", names.len(), self.name);

        self.info = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use httpmock::prelude::*;

    const STRDS_PATH: &str = "/api/v3/locations/nc_spm_08/mapsets/modis_lst/strds/LST_Day_monthly";

    fn strds(server: &MockServer) -> SpaceTimeRasterDataset {
        let connection = Connection::new(&server.base_url(), "v3", None, None).unwrap();
        SpaceTimeRasterDataset::new(
            Arc::new(connection),
            MapsetPath::new("nc_spm_08", "modis_lst"),
            "LST_Day_monthly".to_string(),
        )
    }

    #[test]
    fn test_id_includes_mapset() {
        let server = MockServer::start();
        assert_eq!(strds(&server).id(), "LST_Day_monthly@modis_lst");
    }

    #[tokio::test]
    async fn test_get_info_is_cached() {
        let server = MockServer::start();
        let info_mock = server.mock(|when, then| {
            when.method(GET).path(STRDS_PATH);
            then.status(200).json_body(serde_json::json!({
                "status": "finished",
                "process_results": {
                    "cells": "2025000",
                    "min_min": "-20.53", "max_max": "39.81",
                    "number_of_maps": "24",
                    "temporal_type": "absolute",
                    "start_time": "'2015-01-01 00:00:00'"
                }
            }));
        });

        let mut strds = strds(&server);
        assert!(strds.info().is_none());

        let info = strds.get_info().await.unwrap();
        assert_eq!(info.get("number_of_maps"), Some("24"));

        info_mock.assert();
        assert_eq!(strds.info().and_then(|i| i.get("temporal_type")), Some("absolute"));
    }

    #[tokio::test]
    async fn test_get_raster_layers_with_where_clause() {
        let server = MockServer::start();
        let list_mock = server.mock(|when, then| {
            when.method(GET)
                .path(format!("{}/raster_layers", STRDS_PATH))
                .query_param("where", "start_time >= '2016-01-01'");
            then.status(200).json_body(serde_json::json!({
                "status": "finished",
                "process_results": [
                    {
                        "id": "MOD11B3.A2016001@modis_lst",
                        "name": "MOD11B3.A2016001",
                        "mapset": "modis_lst",
                        "start_time": "2016-01-01 00:00:00",
                        "end_time": "2016-02-01 00:00:00"
                    }
                ]
            }));
        });

        let strds = strds(&server);
        let layers = strds
            .get_raster_layers(Some("start_time >= '2016-01-01'"))
            .await
            .unwrap();

        list_mock.assert();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].name, "MOD11B3.A2016001");
        assert_eq!(layers[0].start_time.as_deref(), Some("2016-01-01 00:00:00"));
        assert_eq!(layers[0].extra.get("mapset"), Some(&serde_json::json!("modis_lst")));
    }

    #[tokio::test]
    async fn test_register_and_unregister() {
        let server = MockServer::start();
        let register_mock = server.mock(|when, then| {
            when.method(PUT)
                .path(format!("{}/raster_layers", STRDS_PATH))
                .json_body(serde_json::json!([{
                    "name": "test_raster",
                    "start_time": "2016-01-01 00:00:00",
                    "end_time": "2016-02-01 00:00:00"
                }]));
            then.status(200).json_body(serde_json::json!({"status": "finished"}));
        });
        let unregister_mock = server.mock(|when, then| {
            when.method(DELETE)
                .path(format!("{}/raster_layers", STRDS_PATH))
                .json_body(serde_json::json!(["test_raster"]));
            then.status(200).json_body(serde_json::json!({"status": "finished"}));
        });

        let start = NaiveDate::from_ymd_opt(2016, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let end = NaiveDate::from_ymd_opt(2016, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let mut strds = strds(&server);
        strds
            .register_raster_layers(&[RasterRegistration::new("test_raster", start, end)])
            .await
            .unwrap();
        register_mock.assert();

        strds.unregister_raster_layers(&["test_raster"]).await.unwrap();
        unregister_mock.assert();
    }

    #[tokio::test]
    async fn test_register_rejects_qualified_names() {
        let server = MockServer::start();
        let register_mock = server.mock(|when, then| {
            when.method(PUT).path(format!("{}/raster_layers", STRDS_PATH));
            then.status(200);
        });

        let now = NaiveDate::from_ymd_opt(2016, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut strds = strds(&server);
        let result = strds
            .register_raster_layers(&[RasterRegistration::new("elevation@PERMANENT", now, now)])
            .await;

        assert!(result.is_err());
        register_mock.assert_hits(0);
    }
}
