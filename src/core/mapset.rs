use crate::core::connection::{process_results, Connection};
use crate::core::layer::{Layer, LayerKind};
use crate::core::strds::SpaceTimeRasterDataset;
use crate::domain::model::{MapsetInfo, StrdsCreation, TemporalType};
use crate::utils::error::{ActiniaError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_resource_name};
use reqwest::multipart::{Form, Part};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Location and mapset every mapset-level resource lives under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapsetPath {
    pub location: String,
    pub mapset: String,
}

impl MapsetPath {
    pub fn new(location: impl Into<String>, mapset: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            mapset: mapset.into(),
        }
    }

    /// `locations/{location}/mapsets/{mapset}` followed by `tail`.
    pub fn segments<'a>(&'a self, tail: &[&'a str]) -> Vec<&'a str> {
        let mut segments = vec![
            "locations",
            self.location.as_str(),
            "mapsets",
            self.mapset.as_str(),
        ];
        segments.extend_from_slice(tail);
        segments
    }
}

/// A mapset and the raster layers, vector layers and STRDS fetched from it.
#[derive(Debug)]
pub struct Mapset {
    connection: Arc<Connection>,
    path: MapsetPath,
    info: Option<MapsetInfo>,
    raster_layers: HashMap<String, Layer>,
    vector_layers: HashMap<String, Layer>,
    strds: HashMap<String, SpaceTimeRasterDataset>,
}

impl Mapset {
    pub(crate) fn new(connection: Arc<Connection>, location: String, name: String) -> Self {
        Self {
            connection,
            path: MapsetPath::new(location, name),
            info: None,
            raster_layers: HashMap::new(),
            vector_layers: HashMap::new(),
            strds: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.path.mapset
    }

    pub fn location_name(&self) -> &str {
        &self.path.location
    }

    pub fn info(&self) -> Option<&MapsetInfo> {
        self.info.as_ref()
    }

    pub async fn get_info(&mut self) -> Result<&MapsetInfo> {
        let segments = self.path.segments(&["info"]);
        let response = self.connection.get(&segments).await?;
        let info = process_results(response)?;
        Ok(&*self.info.insert(info))
    }

    async fn fetch_names(&self, collection: &str) -> Result<Vec<String>> {
        let segments = self.path.segments(&[collection]);
        let response = self.connection.get(&segments).await?;
        let names: Vec<String> = process_results(response)?;

        // listings may qualify names as name@mapset; only our own suffix is dropped
        Ok(names
            .into_iter()
            .map(|name| match name.split_once('@') {
                Some((bare, mapset)) if mapset == self.path.mapset => bare.to_string(),
                _ => name,
            })
            .collect())
    }

    fn layer(&self, kind: LayerKind, name: String) -> Layer {
        Layer::new(Arc::clone(&self.connection), self.path.clone(), kind, name)
    }

    pub async fn get_raster_layers(&mut self) -> Result<&HashMap<String, Layer>> {
        let names = self.fetch_names(LayerKind::Raster.collection()).await?;
        tracing::debug!("Mapset {} has {} raster layers", self.name(), names.len());

        self.raster_layers = names
            .into_iter()
            .map(|name| (name.clone(), self.layer(LayerKind::Raster, name)))
            .collect();
        Ok(&self.raster_layers)
    }

    pub async fn get_vector_layers(&mut self) -> Result<&HashMap<String, Layer>> {
        let names = self.fetch_names(LayerKind::Vector.collection()).await?;
        tracing::debug!("Mapset {} has {} vector layers", self.name(), names.len());

        self.vector_layers = names
            .into_iter()
            .map(|name| (name.clone(), self.layer(LayerKind::Vector, name)))
            .collect();
        Ok(&self.vector_layers)
    }

    /// Upload a GeoTIFF as a new raster map.
    pub async fn upload_raster(&mut self, name: &str, file: impl AsRef<Path>) -> Result<&mut Layer> {
        validate_resource_name("raster", name)?;

        let file = file.as_ref();
        let handle = tokio::fs::File::open(file).await?;
        let length = handle.metadata().await?.len();
        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.tif")
            .to_string();
        tracing::debug!("Uploading {} ({} bytes) as {}", file.display(), length, name);

        let part = Part::stream_with_length(handle, length)
            .file_name(file_name)
            .mime_str("image/tiff")?;
        let form = Form::new().part("file", part);

        let segments = self.path.segments(&[LayerKind::Raster.collection(), name]);
        self.connection.post_multipart(&segments, form).await?;
        tracing::info!("✅ Uploaded raster {} to {}/{}", name, self.location_name(), self.name());

        let layer = self.layer(LayerKind::Raster, name.to_string());
        self.raster_layers.insert(name.to_string(), layer);
        self.raster_layer_mut(name)
    }

    pub async fn delete_raster(&mut self, name: &str) -> Result<()> {
        validate_resource_name("raster", name)?;

        let segments = self.path.segments(&[LayerKind::Raster.collection(), name]);
        self.connection.delete(&segments).await?;
        tracing::info!("🗑️ Deleted raster {} from {}/{}", name, self.location_name(), self.name());

        self.raster_layers.remove(name);
        Ok(())
    }

    pub async fn get_strds(&mut self) -> Result<&HashMap<String, SpaceTimeRasterDataset>> {
        let names = self.fetch_names("strds").await?;
        tracing::debug!("Mapset {} has {} STRDS", self.name(), names.len());

        self.strds = names
            .into_iter()
            .map(|name| {
                let strds = SpaceTimeRasterDataset::new(
                    Arc::clone(&self.connection),
                    self.path.clone(),
                    name.clone(),
                );
                (name, strds)
            })
            .collect();
        Ok(&self.strds)
    }

    pub async fn create_strds(
        &mut self,
        name: &str,
        title: &str,
        description: &str,
        temporal_type: TemporalType,
    ) -> Result<&mut SpaceTimeRasterDataset> {
        validate_resource_name("strds", name)?;
        validate_non_empty_string("title", title)?;

        let body = StrdsCreation {
            title,
            description,
            temporaltype: temporal_type,
        };
        let segments = self.path.segments(&["strds", name]);
        self.connection.post(&segments, Some(&body)).await?;
        tracing::info!("✅ Created {} STRDS {} in {}/{}", temporal_type, name, self.location_name(), self.name());

        let strds = SpaceTimeRasterDataset::new(
            Arc::clone(&self.connection),
            self.path.clone(),
            name.to_string(),
        );
        self.strds.insert(name.to_string(), strds);
        self.strds_mut(name)
    }

    pub async fn delete_strds(&mut self, name: &str) -> Result<()> {
        validate_resource_name("strds", name)?;

        let segments = self.path.segments(&["strds", name]);
        self.connection.delete(&segments).await?;
        tracing::info!("🗑️ Deleted STRDS {} from {}/{}", name, self.location_name(), self.name());

        self.strds.remove(name);
        Ok(())
    }

    pub fn raster_layers(&self) -> &HashMap<String, Layer> {
        &self.raster_layers
    }

    pub fn raster_layer_mut(&mut self, name: &str) -> Result<&mut Layer> {
        self.raster_layers
            .get_mut(name)
            .ok_or_else(|| ActiniaError::not_found("raster layer", name))
    }

    pub fn vector_layers(&self) -> &HashMap<String, Layer> {
        &self.vector_layers
    }

    pub fn vector_layer_mut(&mut self, name: &str) -> Result<&mut Layer> {
        self.vector_layers
            .get_mut(name)
            .ok_or_else(|| ActiniaError::not_found("vector layer", name))
    }

    pub fn strds(&self) -> &HashMap<String, SpaceTimeRasterDataset> {
        &self.strds
    }

    pub fn strds_mut(&mut self, name: &str) -> Result<&mut SpaceTimeRasterDataset> {
        self.strds
            .get_mut(name)
            .ok_or_else(|| ActiniaError::not_found("STRDS", name))
    }
}
