use crate::config::toml_config::TomlConfig;
use crate::config::ConnectionSettings;
use crate::core::actinia::DEFAULT_API_VERSION;
use crate::core::{Credentials, TemporalType};
use crate::domain::model::{RasterRegistration, GRASS_DATETIME_FORMAT};
use crate::utils::error::{ActiniaError, Result};
use crate::utils::validation::Validate;
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "actinia")]
#[command(about = "Command line client for the actinia GRASS GIS REST API")]
pub struct CliConfig {
    #[arg(long, global = true, help = "TOML file with [server], [auth] and [logging] sections")]
    pub config: Option<PathBuf>,

    #[arg(long, env = "ACTINIA_URL", global = true)]
    pub base_url: Option<String>,

    #[arg(long, env = "ACTINIA_API_VERSION", global = true)]
    pub api_version: Option<String>,

    #[arg(long, env = "ACTINIA_USER", global = true)]
    pub user: Option<String>,

    #[arg(long, env = "ACTINIA_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    #[arg(long, global = true, help = "Request timeout in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct LocationArgs {
    pub location: String,
}

#[derive(Debug, Clone, Args)]
pub struct MapsetArgs {
    pub location: String,
    pub mapset: String,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Server and GRASS GIS version
    Version,
    Locations,
    LocationInfo(LocationArgs),
    CreateLocation {
        #[command(flatten)]
        target: LocationArgs,
        #[arg(long, default_value = "4326")]
        epsg: String,
    },
    DeleteLocation(LocationArgs),
    Mapsets(LocationArgs),
    MapsetInfo(MapsetArgs),
    CreateMapset(MapsetArgs),
    DeleteMapset(MapsetArgs),
    RasterLayers(MapsetArgs),
    RasterInfo {
        #[command(flatten)]
        target: MapsetArgs,
        raster: String,
    },
    /// Upload a GeoTIFF into a mapset
    UploadRaster {
        #[command(flatten)]
        target: MapsetArgs,
        raster: String,
        file: PathBuf,
    },
    DeleteRaster {
        #[command(flatten)]
        target: MapsetArgs,
        raster: String,
    },
    VectorLayers(MapsetArgs),
    VectorInfo {
        #[command(flatten)]
        target: MapsetArgs,
        vector: String,
    },
    Strds(MapsetArgs),
    StrdsInfo {
        #[command(flatten)]
        target: MapsetArgs,
        strds: String,
    },
    CreateStrds {
        #[command(flatten)]
        target: MapsetArgs,
        strds: String,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "absolute")]
        temporal_type: TemporalType,
    },
    DeleteStrds {
        #[command(flatten)]
        target: MapsetArgs,
        strds: String,
    },
    StrdsRasterLayers {
        #[command(flatten)]
        target: MapsetArgs,
        strds: String,
        #[arg(long = "where", help = "Temporal SQL filter, e.g. \"start_time >= '2016-01-01'\"")]
        where_clause: Option<String>,
    },
    /// Register rasters given as NAME,START,END with timestamps like 2016-01-01 00:00:00
    RegisterRasters {
        #[command(flatten)]
        target: MapsetArgs,
        strds: String,
        #[arg(long = "raster", required = true, value_parser = parse_registration)]
        rasters: Vec<RasterRegistration>,
    },
    UnregisterRasters {
        #[command(flatten)]
        target: MapsetArgs,
        strds: String,
        #[arg(required = true)]
        rasters: Vec<String>,
    },
}

fn parse_registration(value: &str) -> std::result::Result<RasterRegistration, String> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [name, start, end] = parts.as_slice() else {
        return Err(format!("expected NAME,START,END but got '{}'", value));
    };

    let parse_time = |s: &str| {
        NaiveDateTime::parse_from_str(s, GRASS_DATETIME_FORMAT)
            .map_err(|e| format!("invalid timestamp '{}': {}", s, e))
    };

    Ok(RasterRegistration::new(*name, parse_time(*start)?, parse_time(*end)?))
}

impl CliConfig {
    /// Merge the optional TOML file with flags and environment. Flags win.
    pub fn settings(&self) -> Result<ConnectionSettings> {
        let file = match &self.config {
            Some(path) => {
                let config = TomlConfig::from_file(path)?;
                config.validate()?;
                Some(ConnectionSettings::from_provider(&config))
            }
            None => None,
        };

        let base_url = self
            .base_url
            .clone()
            .or_else(|| file.as_ref().map(|f| f.base_url.clone()))
            .ok_or_else(|| ActiniaError::MissingConfigError {
                field: "base_url (--base-url, ACTINIA_URL or [server].base_url)".to_string(),
            })?;

        let api_version = self
            .api_version
            .clone()
            .or_else(|| file.as_ref().map(|f| f.api_version.clone()))
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let file_credentials = file.as_ref().and_then(|f| f.credentials.clone());
        let credentials = match (&self.user, &self.password) {
            (Some(user), Some(password)) => Some(Credentials::new(user, password)),
            (None, None) => file_credentials,
            (Some(user), None) => match file_credentials {
                Some(c) => Some(Credentials::new(user, c.password)),
                None => {
                    return Err(ActiniaError::MissingConfigError {
                        field: "password (--password or ACTINIA_PASSWORD)".to_string(),
                    })
                }
            },
            (None, Some(password)) => match file_credentials {
                Some(c) => Some(Credentials::new(c.user, password)),
                None => {
                    return Err(ActiniaError::MissingConfigError {
                        field: "user (--user or ACTINIA_USER)".to_string(),
                    })
                }
            },
        };

        let timeout = self
            .timeout_seconds
            .map(Duration::from_secs)
            .or_else(|| file.as_ref().and_then(|f| f.timeout));

        let settings = ConnectionSettings {
            base_url,
            api_version,
            credentials,
            timeout,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// `[logging]` level (only when set) and JSON flag from the config file.
    pub fn file_logging(&self) -> (Option<String>, bool) {
        let Some(config) = self
            .config
            .as_ref()
            .and_then(|path| TomlConfig::from_file(path).ok())
        else {
            return (None, false);
        };
        (config.log_level().map(str::to_string), config.json_logs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(args: &[&str]) -> CliConfig {
        let mut full = vec!["actinia"];
        full.extend_from_slice(args);
        CliConfig::try_parse_from(full).unwrap()
    }

    #[test]
    fn test_flags_only() {
        let cli = parse(&[
            "--base-url",
            "http://localhost:8088",
            "--user",
            "actinia-gdi",
            "--password",
            "actinia-gdi",
            "locations",
        ]);
        let settings = cli.settings().unwrap();

        assert_eq!(settings.base_url, "http://localhost:8088");
        assert_eq!(settings.api_version, "v3");
        assert_eq!(settings.credentials, Some(Credentials::new("actinia-gdi", "actinia-gdi")));
        assert!(matches!(cli.command, Command::Locations));
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[server]
base_url = "https://actinia.mundialis.de"
timeout_seconds = 15

[auth]
user = "demouser"
password = "gu3st!pa55w0rd"
"#,
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let cli = parse(&["--config", path, "--user", "other", "version"]);
        let settings = cli.settings().unwrap();

        assert_eq!(settings.base_url, "https://actinia.mundialis.de");
        assert_eq!(settings.timeout, Some(Duration::from_secs(15)));
        assert_eq!(settings.credentials, Some(Credentials::new("other", "gu3st!pa55w0rd")));
    }

    #[test]
    fn test_user_without_password_is_rejected() {
        let cli = parse(&["--base-url", "http://localhost:8088", "--user", "demouser", "locations"]);
        assert!(matches!(
            cli.settings(),
            Err(ActiniaError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_zero_timeout_flag_is_rejected() {
        let cli = parse(&[
            "--base-url",
            "http://localhost:8088",
            "--timeout-seconds",
            "0",
            "locations",
        ]);
        assert!(matches!(
            cli.settings(),
            Err(ActiniaError::InvalidConfigValueError { .. })
        ));
    }

    #[test]
    fn test_file_logging_level_without_json_format() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[server]
base_url = "https://actinia.mundialis.de"

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let cli = parse(&["--config", path, "version"]);
        assert_eq!(cli.file_logging(), (Some("debug".to_string()), false));

        let without_file = parse(&["version"]);
        assert_eq!(without_file.file_logging(), (None, false));
    }

    #[test]
    fn test_create_strds_arguments() {
        let cli = parse(&[
            "create-strds",
            "nc_spm_08",
            "PERMANENT",
            "test_strds",
            "--title",
            "test title",
            "--temporal-type",
            "relative",
        ]);

        match cli.command {
            Command::CreateStrds {
                target,
                strds,
                title,
                description,
                temporal_type,
            } => {
                assert_eq!(target.location, "nc_spm_08");
                assert_eq!(target.mapset, "PERMANENT");
                assert_eq!(strds, "test_strds");
                assert_eq!(title, "test title");
                assert_eq!(description, "");
                assert_eq!(temporal_type, TemporalType::Relative);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_register_rasters_parsing() {
        let cli = parse(&[
            "register-rasters",
            "nc_spm_08",
            "PERMANENT",
            "test_strds",
            "--raster",
            "test_raster,2016-01-01 00:00:00,2016-02-01 00:00:00",
        ]);

        let Command::RegisterRasters { rasters, .. } = cli.command else {
            panic!("expected register-rasters");
        };
        assert_eq!(rasters.len(), 1);
        assert_eq!(rasters[0].name, "test_raster");
        assert_eq!(rasters[0].end_time.to_string(), "2016-02-01 00:00:00");

        assert!(parse_registration("test_raster,2016-01-01").is_err());
        assert!(parse_registration("test_raster,yesterday,today").is_err());
    }
}
