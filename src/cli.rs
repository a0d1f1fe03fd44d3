//! Command-line interface definitions using clap

use clap::{Args, Parser, Subcommand};

use crate::media::{Crop, ImageFormat, TransformOptions};

/// linkshelf - product click tracking and image delivery service
#[derive(Parser, Debug)]
#[command(name = "linkshelf")]
#[command(version)]
#[command(about = "Product click tracking and image delivery service", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Print or write a sample configuration file
    ConfigGen {
        /// Output path (default: stdout)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the CDN delivery URL for an image identifier
    ImageUrl {
        /// Provider-assigned identifier, e.g. products/shoe_01
        public_id: String,

        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Delete an image from the provider
    Destroy {
        /// Provider-assigned identifier
        public_id: String,
    },
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct TransformArgs {
    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// 1-100
    #[arg(long, default_value_t = 80, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// fill, scale, fit or thumb
    #[arg(long, default_value = "fill")]
    pub crop: Crop,

    /// auto, webp, jpg or png
    #[arg(long, default_value = "auto")]
    pub format: ImageFormat,
}

impl From<TransformArgs> for TransformOptions {
    fn from(args: TransformArgs) -> Self {
        TransformOptions {
            width: args.width,
            height: args.height,
            quality: args.quality,
            format: args.format,
            crop: args.crop,
        }
    }
}
