use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ys18-catalog")]
#[command(about = "YS18 jewellery catalog generator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the catalog PDF from a stock workbook and an image folder
    Generate {
        /// Stock workbook (.xlsx)
        #[arg(required = true)]
        excel: PathBuf,

        /// Folder holding <stock code>.jpg/.png photos
        #[arg(required = true)]
        images: PathBuf,

        /// Stock code column (default: first usable column)
        #[arg(short = 'k', long)]
        stock_col: Option<String>,

        /// Columns to show in captions (repeatable; default: all)
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Layout preset (Small/Medium/Large)
        #[arg(short, long)]
        layout: Option<String>,

        /// Category filter (All, Ring, Bracelet, ...)
        #[arg(short, long, default_value = "All")]
        category: String,

        /// Catalog header title
        #[arg(short, long)]
        title: Option<String>,

        /// Write PREVIEW.pdf instead of a timestamped final file
        #[arg(long)]
        preview: bool,

        /// Do not open the preview after writing it
        #[arg(long)]
        no_open: bool,
    },

    /// List the usable columns of a stock workbook
    Columns {
        /// Stock workbook (.xlsx)
        #[arg(required = true)]
        excel: PathBuf,
    },

    /// Report which stock codes have photos and which photos have no row
    Check {
        #[arg(required = true)]
        excel: PathBuf,

        #[arg(required = true)]
        images: PathBuf,

        /// Stock code column (default: first usable column)
        #[arg(short = 'k', long)]
        stock_col: Option<String>,

        #[arg(short, long, default_value = "All")]
        category: String,
    },

    /// Show or edit settings
    Config {
        /// Workbook header row (0-based)
        #[arg(long)]
        set_header_row: Option<usize>,

        /// Output folder name created next to the image folder
        #[arg(long)]
        set_output_dir_name: Option<String>,

        /// Default layout preset
        #[arg(long)]
        set_default_layout: Option<String>,

        /// Show settings
        #[arg(long)]
        show: bool,
    },
}
