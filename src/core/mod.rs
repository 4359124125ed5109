pub mod actinia;
pub mod connection;
pub mod layer;
pub mod location;
pub mod mapset;
pub mod strds;

pub use crate::domain::model::{Metadata, TemporalType};
pub use crate::domain::ports::{ConfigProvider, Credentials};
pub use crate::utils::error::Result;
