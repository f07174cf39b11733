//! # ISLEFORGE
//!
//! Offline world generator.
//!
//! Usage:
//!   isleforge dungeon 1001 --seed 7              # BSP dungeon to levels/1001.json
//!   isleforge island 1002 --grass-variants       # Noise island to levels/1002.json
//!   isleforge group levels/1002.json water.json --only Water
//!   isleforge trim big.json small.json --rows 80 --cols 120
//!   isleforge migrate old/1002.json levels/1002.json

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use isleforge_core::TileKind;
use isleforge_procedural::grouping::{group, group_matching, GroupingStats};
use isleforge_procedural::{seeded_rng, GenerationConfig, RoomPartitioner, TerrainSynthesizer};
use isleforge_storage::grouped::save_json;
use isleforge_storage::{DirectoryStore, GroupedArchive, LayerKind, WorldDocument, WorldExporter};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Parser)]
#[command(name = "isleforge")]
#[command(about = "Procedural dungeons and islands for tile worlds", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a room-and-corridor dungeon
    Dungeon {
        /// World id, also the output file stem
        world_id: u32,
        #[command(flatten)]
        generate: GenerateArgs,
    },
    /// Generate a noise island
    Island {
        /// World id, also the output file stem
        world_id: u32,
        #[command(flatten)]
        generate: GenerateArgs,
        /// Scatter flower grass variants
        #[arg(long)]
        grass_variants: bool,
    },
    /// Group one layer of a world document into rectangles
    Group {
        /// World document to read
        document: PathBuf,
        /// Grouped output file
        output: PathBuf,
        /// Layer to group
        #[arg(long, value_enum, default_value_t = Layer::Biome)]
        layer: Layer,
        /// Only group tiles of this kind (e.g. Water)
        #[arg(long)]
        only: Option<String>,
        /// Write an LZ4 archive instead of JSON
        #[arg(long)]
        binary: bool,
    },
    /// Crop every layer of a world document, keeping it centered
    Trim {
        /// World document to read
        document: PathBuf,
        /// Trimmed output file
        output: PathBuf,
        /// Rows to keep
        #[arg(long)]
        rows: usize,
        /// Columns to keep
        #[arg(long)]
        cols: usize,
    },
    /// Rewrite integer tile rows as strings
    Migrate {
        /// Legacy world document
        input: PathBuf,
        /// Converted output file
        output: PathBuf,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Random seed; drawn from the OS when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// TOML generation config
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output directory
    #[arg(long, default_value = "levels")]
    out: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Layer {
    Biome,
    Constructions,
}

impl From<Layer> for LayerKind {
    fn from(layer: Layer) -> Self {
        match layer {
            Layer::Biome => Self::Biome,
            Layer::Constructions => Self::Constructions,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         ISLEFORGE WORLD GENERATOR                                ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    match cli.command {
        Commands::Dungeon { world_id, generate } => run_dungeon(world_id, &generate),
        Commands::Island {
            world_id,
            generate,
            grass_variants,
        } => run_island(world_id, &generate, grass_variants),
        Commands::Group {
            document,
            output,
            layer,
            only,
            binary,
        } => run_group(&document, &output, layer.into(), only.as_deref(), binary),
        Commands::Trim {
            document,
            output,
            rows,
            cols,
        } => run_trim(&document, &output, rows, cols),
        Commands::Migrate { input, output } => run_migrate(&input, &output),
    }
}

/// Loads the config file, or the defaults when none is given.
fn load_config(path: Option<&Path>) -> Result<GenerationConfig> {
    match path {
        Some(path) => GenerationConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(GenerationConfig::default()),
    }
}

/// Uses the given seed or draws a fresh one, so every run can be repeated.
fn resolve_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| ChaCha8Rng::from_entropy().gen())
}

fn run_dungeon(world_id: u32, args: &GenerateArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let seed = resolve_seed(args.seed);
    println!(
        "Generating dungeon {world_id} ({}x{}, seed {seed})",
        config.width, config.height
    );

    let dungeon = RoomPartitioner::new(&config.dungeon)
        .generate(config.width, config.height, &mut seeded_rng(seed))
        .context("Dungeon generation failed")?;

    let doc = WorldExporter::default().dungeon_document(world_id, &dungeon);
    let path = DirectoryStore::new(&args.out)
        .save(&doc)
        .with_context(|| format!("Failed to write dungeon {world_id}"))?;

    println!();
    println!("┌─ DUNGEON ──────────────────────────────────────────────────────┐");
    println!("│ Rooms:              {}", dungeon.rooms.len());
    println!("│ Floor tiles:        {}", dungeon.grid.count(TileKind::Pavement));
    println!("│ Wall tiles:         {}", dungeon.grid.count(TileKind::Wall));
    println!("└────────────────────────────────────────────────────────────────┘");
    println!("Dungeon {world_id} saved to {}", path.display());
    Ok(())
}

fn run_island(world_id: u32, args: &GenerateArgs, grass_variants: bool) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    config.island.grass_variants |= grass_variants;
    config.validate().context("Invalid generation config")?;
    let seed = resolve_seed(args.seed);
    println!(
        "Generating island {world_id} ({}x{}, seed {seed})",
        config.width, config.height
    );

    let island = TerrainSynthesizer::new(&config.island).generate(
        config.width,
        config.height,
        &mut seeded_rng(seed),
    );

    let doc = WorldExporter::default().island_document(world_id, &island.grid);
    let path = DirectoryStore::new(&args.out)
        .save(&doc)
        .with_context(|| format!("Failed to write island {world_id}"))?;

    let grass: usize = TileKind::GRASS_KINDS.iter().map(|&k| island.grid.count(k)).sum();
    println!();
    println!("┌─ ISLAND ───────────────────────────────────────────────────────┐");
    println!("│ Water tiles:        {}", island.grid.count(TileKind::Water));
    println!("│ Sand tiles:         {}", island.grid.count(TileKind::Sand));
    println!("│ Grass tiles:        {grass}");
    println!("│ Ponds filled:       {}", island.ponds_filled);
    println!("└────────────────────────────────────────────────────────────────┘");
    println!("Island {world_id} saved to {}", path.display());
    Ok(())
}

fn run_group(
    document: &Path,
    output: &Path,
    layer: LayerKind,
    only: Option<&str>,
    binary: bool,
) -> Result<()> {
    let doc = WorldDocument::load(document)
        .with_context(|| format!("Failed to load {}", document.display()))?;
    let grid = doc.layer_grid(layer).context("Layer does not decode")?;

    let groups = match only {
        Some(name) => {
            let Some(kind) = TileKind::from_name(name) else {
                bail!("Unknown tile kind: {name}");
            };
            group_matching(&grid, |k| k == kind)
        }
        None => group(&grid),
    };
    let stats = GroupingStats::of(&groups);

    if binary {
        let archive = GroupedArchive {
            width: grid.width(),
            height: grid.height(),
            groups,
        };
        let bytes = archive
            .save_compressed(output)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("Archive size:       {bytes} bytes");
    } else {
        save_json(output, &groups)
            .with_context(|| format!("Failed to write {}", output.display()))?;
    }

    println!(
        "Grouped {} cells of {} into {} rectangles ({:.1} cells each)",
        stats.cells,
        layer.field_name(),
        stats.groups,
        stats.ratio()
    );
    println!("Saved to {}", output.display());
    Ok(())
}

fn run_trim(document: &Path, output: &Path, rows: usize, cols: usize) -> Result<()> {
    let doc = WorldDocument::load(document)
        .with_context(|| format!("Failed to load {}", document.display()))?;
    let trimmed = doc
        .trim(rows, cols)
        .with_context(|| format!("Cannot trim world {} to {rows}x{cols}", doc.id))?;
    trimmed
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "Trimmed to {rows} rows x {cols} columns and saved to {}",
        output.display()
    );
    Ok(())
}

fn run_migrate(input: &Path, output: &Path) -> Result<()> {
    let doc = WorldDocument::load(input)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    doc.save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Converted {} and saved to {}", input.display(), output.display());
    Ok(())
}
