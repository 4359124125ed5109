use actinia_client::config::cli::{Command, LocationArgs, MapsetArgs};
use actinia_client::utils::logger;
use actinia_client::{Actinia, ActiniaError, CliConfig, Mapset, SpaceTimeRasterDataset};
use clap::Parser;
use serde::Serialize;
use std::collections::HashMap;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    let (file_level, file_json) = config.file_logging();
    let json = config.json_logs || file_json;
    let level = logger::log_level(config.verbose, file_level.as_deref(), json);
    if json {
        logger::init_json_logger(&level);
    } else {
        logger::init_cli_logger(&level);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ actinia request failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        std::process::exit(e.severity().exit_code());
    }

    Ok(())
}

async fn run(config: &CliConfig) -> Result<(), ActiniaError> {
    let settings = config.settings()?;
    tracing::debug!(
        "Connecting to {} ({}), authenticated: {}",
        settings.base_url,
        settings.api_version,
        settings.credentials.is_some()
    );
    let mut actinia = Actinia::from_config(&settings)?;

    match &config.command {
        Command::Version => print_json(&actinia.get_version().await?),
        Command::Locations => print_names(actinia.get_locations().await?),
        Command::LocationInfo(LocationArgs { location }) => {
            actinia.get_locations().await?;
            let info = actinia.location_mut(location)?.get_info().await?;
            print_json(info)
        }
        Command::CreateLocation { target, epsg } => {
            actinia.create_location(&target.location, epsg).await?;
            print_status(&format!("location {} created", target.location))
        }
        Command::DeleteLocation(LocationArgs { location }) => {
            actinia.delete_location(location).await?;
            print_status(&format!("location {} deleted", location))
        }
        Command::Mapsets(LocationArgs { location }) => {
            actinia.get_locations().await?;
            print_names(actinia.location_mut(location)?.get_mapsets().await?)
        }
        Command::MapsetInfo(target) => {
            let info = open_mapset(&mut actinia, target).await?.get_info().await?;
            print_json(info)
        }
        Command::CreateMapset(MapsetArgs { location, mapset }) => {
            actinia.get_locations().await?;
            actinia.location_mut(location)?.create_mapset(mapset).await?;
            print_status(&format!("mapset {}/{} created", location, mapset))
        }
        Command::DeleteMapset(MapsetArgs { location, mapset }) => {
            actinia.get_locations().await?;
            actinia.location_mut(location)?.delete_mapset(mapset).await?;
            print_status(&format!("mapset {}/{} deleted", location, mapset))
        }
        Command::RasterLayers(target) => {
            print_names(open_mapset(&mut actinia, target).await?.get_raster_layers().await?)
        }
        Command::RasterInfo { target, raster } => {
            let mapset = open_mapset(&mut actinia, target).await?;
            mapset.get_raster_layers().await?;
            print_json(mapset.raster_layer_mut(raster)?.get_info().await?)
        }
        Command::UploadRaster {
            target,
            raster,
            file,
        } => {
            open_mapset(&mut actinia, target)
                .await?
                .upload_raster(raster, file)
                .await?;
            print_status(&format!("raster {} uploaded", raster))
        }
        Command::DeleteRaster { target, raster } => {
            open_mapset(&mut actinia, target)
                .await?
                .delete_raster(raster)
                .await?;
            print_status(&format!("raster {} deleted", raster))
        }
        Command::VectorLayers(target) => {
            print_names(open_mapset(&mut actinia, target).await?.get_vector_layers().await?)
        }
        Command::VectorInfo { target, vector } => {
            let mapset = open_mapset(&mut actinia, target).await?;
            mapset.get_vector_layers().await?;
            print_json(mapset.vector_layer_mut(vector)?.get_info().await?)
        }
        Command::Strds(target) => {
            print_names(open_mapset(&mut actinia, target).await?.get_strds().await?)
        }
        Command::StrdsInfo { target, strds } => {
            let info = open_strds(&mut actinia, target, strds)
                .await?
                .get_info()
                .await?;
            print_json(info)
        }
        Command::CreateStrds {
            target,
            strds,
            title,
            description,
            temporal_type,
        } => {
            open_mapset(&mut actinia, target)
                .await?
                .create_strds(strds, title, description, *temporal_type)
                .await?;
            print_status(&format!("STRDS {} created", strds))
        }
        Command::DeleteStrds { target, strds } => {
            open_mapset(&mut actinia, target)
                .await?
                .delete_strds(strds)
                .await?;
            print_status(&format!("STRDS {} deleted", strds))
        }
        Command::StrdsRasterLayers {
            target,
            strds,
            where_clause,
        } => {
            let layers = open_strds(&mut actinia, target, strds)
                .await?
                .get_raster_layers(where_clause.as_deref())
                .await?;
            print_json(&layers)
        }
        Command::RegisterRasters {
            target,
            strds,
            rasters,
        } => {
            open_strds(&mut actinia, target, strds)
                .await?
                .register_raster_layers(rasters)
                .await?;
            print_status(&format!("{} rasters registered in {}", rasters.len(), strds))
        }
        Command::UnregisterRasters {
            target,
            strds,
            rasters,
        } => {
            let names: Vec<&str> = rasters.iter().map(String::as_str).collect();
            open_strds(&mut actinia, target, strds)
                .await?
                .unregister_raster_layers(&names)
                .await?;
            print_status(&format!("{} rasters unregistered from {}", names.len(), strds))
        }
    }
}

/// Walk locations and mapsets the way an interactive session would.
async fn open_mapset<'a>(actinia: &'a mut Actinia, target: &MapsetArgs) -> Result<&'a mut Mapset, ActiniaError> {
    actinia.get_locations().await?;
    let location = actinia.location_mut(&target.location)?;
    location.get_mapsets().await?;
    location.mapset_mut(&target.mapset)
}

async fn open_strds<'a>(
    actinia: &'a mut Actinia,
    target: &MapsetArgs,
    name: &str,
) -> Result<&'a mut SpaceTimeRasterDataset, ActiniaError> {
    let mapset = open_mapset(actinia, target).await?;
    mapset.get_strds().await?;
    mapset.strds_mut(name)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), ActiniaError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_names<V>(items: &HashMap<String, V>) -> Result<(), ActiniaError> {
    let mut names: Vec<&String> = items.keys().collect();
    names.sort();
    print_json(&names)
}

fn print_status(message: &str) -> Result<(), ActiniaError> {
    tracing::info!("✅ {}", message);
    print_json(&serde_json::json!({ "status": "success", "message": message }))
}
