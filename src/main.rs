use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use clap::Parser;
use depth_layout::common::{BoxFormat, CompositorConfig, DepthConvention, Layout, RawLayout};
use depth_layout::compositing::{collect_batch, composite_batch, composite_batch_timed, image_ops};
use depth_layout::data::{DepthStore, NpyDepthStore, TimeCalc};

#[derive(Debug, Clone, Parser)]
#[command(about = "Composite per-object depth layouts from cached depth maps.")]
enum Opts {
    /// Composite one or more layouts and write the depth layouts as PNG
    Composite {
        /// compositor configuration (JSON)
        #[arg(long)]
        config: PathBuf,
        /// layout files (JSON)
        #[arg(long = "layout", required = true)]
        layouts: Vec<PathBuf>,
        /// depth map cache directory, overrides the config
        #[arg(long)]
        depth_dir: Option<PathBuf>,
        /// output directory
        #[arg(long, default_value = ".")]
        output: PathBuf,
        /// source image per layout (same order), renders panels instead of bare layouts
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    /// Print shape and value range of a cached depth map
    Inspect {
        #[arg(long)]
        depth_dir: PathBuf,
        filename: String,
    },
    /// Validate and print a configuration
    ShowConfig {
        #[arg(long)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    match Opts::parse() {
        Opts::Composite {
            config,
            layouts,
            depth_dir,
            output,
            images,
        } => composite(config, &layouts, depth_dir, output, images)?,
        Opts::Inspect { depth_dir, filename } => inspect(depth_dir, &filename)?,
        Opts::ShowConfig { config } => show_config(config)?,
    }

    Ok(())
}

fn open_store(config: &CompositorConfig, depth_dir: Option<PathBuf>) -> Result<NpyDepthStore> {
    let store = match (depth_dir, &config.depth_dir) {
        (Some(dir), _) => NpyDepthStore::new(dir),
        (None, Some(dir)) => NpyDepthStore::new(dir),
        (None, None) => NpyDepthStore::default_cache(&[])?,
    };
    Ok(store.with_suffix(&config.depth_suffix))
}

fn composite(
    config_file: impl AsRef<Path>,
    layout_files: &[PathBuf],
    depth_dir: Option<PathBuf>,
    output: PathBuf,
    images: Vec<PathBuf>,
) -> Result<()> {
    let images = pair_images(layout_files, images)?;
    let config = CompositorConfig::from_json_file(config_file)?;
    let compositor = depth_layout::init_compositor(&config)?;
    let store = open_store(&config, depth_dir)?;
    std::fs::create_dir_all(&output)?;

    let layouts = layout_files
        .iter()
        .map(|layout_file| read_layout(layout_file, config.box_format))
        .collect::<Result<Vec<Layout>>>()?;

    let mut timer = TimeCalc::default();
    let results = if config.profile {
        composite_batch_timed(&compositor, &store, &layouts, &mut timer)
    } else {
        composite_batch(&compositor, &store, &layouts)
    };

    for (i, result) in collect_batch(results, config.batch_policy)? {
        let layout = &layouts[i];
        let out_path = output.join(format!("{}_depth_layout.png", layout.filename));
        match &images[i] {
            Some(image_path) => {
                let rgb = image::open(image_path)
                    .with_context(|| format!("unable to open image {}", image_path.display()))?
                    .to_rgb8();
                let depth = store.load(&layout.filename)?;
                let panel = image_ops::layout_panel(&rgb, layout, &depth, &result, config.background_class);
                panel.save(&out_path)?;
            }
            None => result.to_gray().save(&out_path)?,
        }

        println!("{}: paint order {:?} -> {}", layout.filename, result.order, out_path.display());
    }

    if config.profile && timer.runs() > 0 {
        println!(
            "Average over {} layouts: {:?} (preprocess {:?}, aggregate {:?}, composite {:?})",
            timer.runs(),
            timer.avg(),
            timer.avg_stage(0).unwrap_or_default(),
            timer.avg_stage(1).unwrap_or_default(),
            timer.avg_stage(2).unwrap_or_default(),
        );
    }

    Ok(())
}

fn read_layout(layout_file: &Path, format: BoxFormat) -> Result<Layout> {
    let text = std::fs::read_to_string(layout_file)
        .with_context(|| format!("unable to read layout {}", layout_file.display()))?;
    let raw: RawLayout = serde_json::from_str(&text)
        .with_context(|| format!("unable to parse layout {}", layout_file.display()))?;
    raw.into_layout(format)
}

/// One source image per layout, in `--layout` order, or none at all.
fn pair_images(layout_files: &[PathBuf], images: Vec<PathBuf>) -> Result<Vec<Option<PathBuf>>> {
    if images.is_empty() {
        return Ok(vec![None; layout_files.len()]);
    }
    if images.len() != layout_files.len() {
        anyhow::bail!(
            "got {} --image for {} --layout, pass one image per layout",
            images.len(),
            layout_files.len()
        );
    }
    Ok(images.into_iter().map(Some).collect())
}

fn inspect(depth_dir: PathBuf, filename: &str) -> Result<()> {
    let store = NpyDepthStore::new(depth_dir);
    let depth = store.load(filename)?;
    let (height, width) = depth.shape_hw();
    println!("{}: {}x{} (height x width)", store.path_for(filename).display(), height, width);
    match depth.value_range() {
        Some((lo, hi)) => println!("range: [{}, {}]", lo, hi),
        None => println!("range: no finite values"),
    }
    Ok(())
}

fn show_config(config_file: impl AsRef<Path>) -> Result<()> {
    let config = CompositorConfig::from_json_file(config_file)?;
    let convention = config.validate()?;
    println!("{}", config.to_string());
    println!("OK: nearer objects have {} depth values", match convention {
        DepthConvention::NearerHigher => "higher",
        DepthConvention::NearerLower => "lower",
    });
    Ok(())
}
