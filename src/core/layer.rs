use crate::core::connection::{process_results, Connection};
use crate::core::mapset::MapsetPath;
use crate::domain::model::Metadata;
use crate::utils::error::Result;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Raster,
    Vector,
}

impl LayerKind {
    /// Collection segment in the mapset URL.
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Raster => "raster_layers",
            Self::Vector => "vector_layers",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raster => f.write_str("raster layer"),
            Self::Vector => f.write_str("vector layer"),
        }
    }
}

/// A raster or vector map inside a mapset.
#[derive(Debug)]
pub struct Layer {
    connection: Arc<Connection>,
    path: MapsetPath,
    kind: LayerKind,
    name: String,
    info: Option<Metadata>,
}

impl Layer {
    pub(crate) fn new(
        connection: Arc<Connection>,
        path: MapsetPath,
        kind: LayerKind,
        name: String,
    ) -> Self {
        Self {
            connection,
            path,
            kind,
            name,
            info: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn location_name(&self) -> &str {
        &self.path.location
    }

    pub fn mapset_name(&self) -> &str {
        &self.path.mapset
    }

    pub fn info(&self) -> Option<&Metadata> {
        self.info.as_ref()
    }

    /// `r.info` / `v.info` output of the map.
    pub async fn get_info(&mut self) -> Result<&Metadata> {
        let segments = self
            .path
            .segments(&[self.kind.collection(), self.name.as_str()]);
        let response = self.connection.get(&segments).await?;
        let info = process_results(response)?;
        Ok(&*self.info.insert(info))
    }
}
