use anyhow::{Context, Result};
use catalog_common::{LayoutPreset, RecordIndex};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing_subscriber::EnvFilter;
use ys18_catalog::builder::{resolve_stock_col, CatalogBuilder, CatalogRequest};
use ys18_catalog::cli::{Cli, Commands};
use ys18_catalog::config::Config;
use ys18_catalog::export::PdfRenderer;
use ys18_catalog::image_loader::RgbLoader;
use ys18_catalog::matcher::{self, IMAGE_EXTENSIONS};
use ys18_catalog::{reader, CatalogError};

const PROGRESS_STEPS: u64 = 1000;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let mut config = Config::load()?;

    match cli.command {
        Commands::Generate { excel, images, stock_col, headers, layout, category, title, preview, no_open } => {
            println!("📒 ys18-catalog - {}\n", if preview { "preview" } else { "generate" });

            let request = CatalogRequest {
                excel,
                images,
                title: title.unwrap_or_else(|| config.default_title.clone()),
                stock_col,
                selected_headers: if headers.is_empty() { None } else { Some(headers) },
                layout: layout.unwrap_or_else(|| config.default_layout.to_string()),
                category,
                preview,
            };

            println!("[1/2] Matching stock codes to photos...");
            let bar = ProgressBar::new(PROGRESS_STEPS);
            bar.set_style(
                ProgressStyle::with_template("{bar:40.cyan/blue} {percent:>3}%")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );

            let builder = CatalogBuilder::new(&config, RgbLoader::new(config.max_image_px), PdfRenderer);
            let result = builder.run(&request, |fraction| {
                bar.set_position((fraction * PROGRESS_STEPS as f32) as u64);
            });
            bar.finish_and_clear();

            let report = match result {
                Ok(report) => report,
                Err(e) if e.is_user_facing() => {
                    eprintln!("✖ {}", e);
                    std::process::exit(2);
                }
                Err(e) => return Err(e.into()),
            };

            println!("[2/2] Layout: {} ({} pages)", report.preset.preset, report.pages);
            println!(
                "✔ {} rows, {} matched, {} placed",
                report.records, report.matched, report.placed
            );
            if report.duplicates_dropped > 0 {
                println!("  {} duplicate stock codes ignored (first row kept)", report.duplicates_dropped);
            }
            if report.placed == 0 {
                println!("⚠ No photo could be placed; the catalog only carries its title");
            }
            if !report.skipped.is_empty() {
                println!("⚠ {} photos could not be read and were left out", report.skipped.len());
            }
            println!("✔ Output: {}", report.output_path.display());

            if preview && !no_open {
                if let Err(e) = open_file(&report.output_path) {
                    tracing::warn!("could not open preview: {}", e);
                }
            }
        }

        Commands::Columns { excel } => {
            let table = reader::read_table(&excel, config.header_row)
                .with_context(|| format!("reading {}", excel.display()))?;
            let default_col = resolve_stock_col(&table, None);

            println!("Columns (header row {}):", config.header_row + 1);
            for (i, col) in table.usable_columns().iter().enumerate() {
                let marker = if *col == default_col { "  <- default stock code" } else { "" };
                println!("  {:>2}) {}{}", i + 1, col, marker);
            }
        }

        Commands::Check { excel, images, stock_col, category } => {
            let table = reader::read_table(&excel, config.header_row)
                .with_context(|| format!("reading {}", excel.display()))?;
            let stock_col = resolve_stock_col(&table, stock_col.as_deref());
            let index = RecordIndex::build(&table, &stock_col).map_err(CatalogError::from)?;
            let filter = config.category_prefixes.filter(&category);

            let report = matcher::match_report(&index, &images, &filter, IMAGE_EXTENSIONS)?;
            let orphans = matcher::find_orphan_images(&images, &index)?;

            println!("Stock column: {}", stock_col);
            println!("  rows indexed:        {}", index.len());
            println!("  duplicates ignored:  {}", index.duplicates_dropped());
            println!("  filtered by category: {}", report.filtered_out.len());
            println!("  matched:             {}", report.matched.len());
            println!("  without photo:       {}", report.unmatched.len());
            for key in &report.unmatched {
                println!("    - {}", key);
            }
            println!("  photos without row:  {}", orphans.len());
            for path in &orphans {
                println!("    - {}", path.display());
            }
        }

        Commands::Config { set_header_row, set_output_dir_name, set_default_layout, show } => {
            let mut changed = false;

            if let Some(row) = set_header_row {
                config.header_row = row;
                changed = true;
            }
            if let Some(name) = set_output_dir_name {
                config.output_dir_name = name;
                changed = true;
            }
            if let Some(name) = set_default_layout {
                config.default_layout = LayoutPreset::from_name(&name)
                    .ok_or_else(|| CatalogError::Config(format!("unknown layout: {}", name)))?;
                changed = true;
            }
            if changed {
                config.save()?;
                println!("✔ Settings saved");
            }

            if show || !changed {
                println!("Settings:");
                println!("  header row:      {}", config.header_row);
                println!("  output folder:   {}", config.output_dir_name);
                println!("  default layout:  {}", config.default_layout);
                println!("  default title:   {}", config.default_title);
                println!("  max image size:  {}px", config.max_image_px);
                let categories: Vec<&str> = config.category_prefixes.names().collect();
                println!("  categories:      {}", categories.join(", "));
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Hand the file to the desktop's default viewer
fn open_file(path: &Path) -> std::io::Result<()> {
    let mut command = if cfg!(target_os = "windows") {
        let mut c = std::process::Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    } else if cfg!(target_os = "macos") {
        std::process::Command::new("open")
    } else {
        std::process::Command::new("xdg-open")
    };
    command.arg(path).spawn().map(|_| ())
}
