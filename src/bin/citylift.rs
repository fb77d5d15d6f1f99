//! citylift CLI - extrude building footprints into CityJSON.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use citylift::cityjson::{Properties, SchemaStore, DEFAULT_LOD, DEFAULT_VERSION};
use citylift::convert::{convert_file, ConvertOptions};
use citylift::source::geojson::write_feature_collection;
use citylift::source::osm::OsmData;

#[derive(Parser)]
#[command(name = "citylift")]
#[command(about = "Extrude 2D building footprints into CityJSON solids", long_about = None)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert OSM XML or GeoJSON footprints to a CityJSON document
    Convert {
        /// Input file (.osm, .xml, .geojson or .json)
        input: PathBuf,
        /// Output CityJSON file
        output: PathBuf,
        /// Level of detail recorded on every solid
        #[arg(long, default_value_t = DEFAULT_LOD)]
        lod: f64,
        /// CityJSON version to write (default: latest in --schemas, else 1.0)
        #[arg(long = "cityjson-version")]
        cityjson_version: Option<String>,
        /// Directory of versioned CityJSON schemas
        #[arg(long)]
        schemas: Option<PathBuf>,
        /// JSON file holding the metadata block
        #[arg(long)]
        metadata: Option<PathBuf>,
        /// Merge coincident vertices
        #[arg(long)]
        dedup: bool,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
    /// Export the building footprints of an OSM file as GeoJSON
    Osm2geojson {
        /// Input OSM XML file
        input: PathBuf,
        /// Output GeoJSON file
        output: PathBuf,
        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert {
            input,
            output,
            lod,
            cityjson_version,
            schemas,
            metadata,
            dedup,
            pretty,
        } => {
            let version = resolve_version(schemas.as_deref(), cityjson_version)?;
            let metadata = metadata.as_deref().map(read_metadata).transpose()?;
            let options = ConvertOptions {
                lod,
                version,
                metadata,
                deduplicate: dedup,
                ..ConvertOptions::default()
            };
            let document = convert_file(&input, &options)
                .with_context(|| format!("converting {}", input.display()))?;
            let writer = BufWriter::new(create(&output)?);
            document.write_to(writer, pretty)?;
            info!(output = %output.display(), "wrote CityJSON");
        }
        Commands::Osm2geojson { input, output, pretty } => {
            let features = OsmData::from_path(&input)
                .with_context(|| format!("reading {}", input.display()))?
                .footprints();
            let writer = BufWriter::new(create(&output)?);
            write_feature_collection(&features, writer, pretty)?;
            info!(output = %output.display(), features = features.len(), "wrote GeoJSON");
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "citylift=debug" } else { "citylift=info" };
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy()
        .add_directive(level.parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).with_writer(std::io::stderr).init();
}

/// Picks the output version, checking it against the schema store when one is given.
fn resolve_version(schemas: Option<&Path>, requested: Option<String>) -> Result<String> {
    let Some(root) = schemas else {
        return Ok(requested.unwrap_or_else(|| DEFAULT_VERSION.to_owned()));
    };
    let store = SchemaStore::discover(root)?;
    let version = store.resolve(requested.as_deref())?;
    version
        .fetch("cityjson")
        .with_context(|| format!("loading CityJSON {} schema", version.version()))?;
    info!(version = version.version(), "using schema version");
    Ok(version.version().to_owned())
}

fn read_metadata(path: &Path) -> Result<Properties> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing metadata {}", path.display()))
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("creating {}", path.display()))
}
