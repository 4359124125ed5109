pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::toml_config::TomlConfig;

pub use crate::core::{
    actinia::{Actinia, DEFAULT_API_VERSION},
    layer::{Layer, LayerKind},
    location::Location,
    mapset::Mapset,
    strds::SpaceTimeRasterDataset,
};
pub use crate::domain::model::{
    LocationInfo, MapsetInfo, Metadata, RasterRegistration, Region, ServerVersion,
    StrdsRasterEntry, TemporalType,
};
pub use crate::domain::ports::{ConfigProvider, Credentials};
pub use crate::utils::error::{ActiniaError, Result};
