use clap::Parser;
use std::path::PathBuf;

use crate::config::{DEFAULT_COMPRESSION_LEVEL, InputPolicy, MergeOptions};
use crate::pack::DEFAULT_PACK_FORMAT;

#[derive(Parser, Debug)]
#[command(name = "packmerge")]
#[command(version)]
#[command(about = "Merge Minecraft resource packs into one pack", long_about = None)]
#[command(after_help = "Packs are applied in the order given: a file in a later pack replaces the\n\
  same file from every earlier pack.\n\n\
Examples:\n  \
  packmerge base.zip tweaks.zip -n \"My Pack\"     write MyPack.zip\n  \
  packmerge -l base.zip tweaks.zip               show which pack supplies each file\n  \
  packmerge a.zip b.zip -i icon.png -o out.zip   custom icon and output path")]
pub struct Cli {
    /// Resource pack archives, lowest priority first
    #[arg(value_name = "PACKS", required = true)]
    pub packs: Vec<PathBuf>,

    /// Name of the merged pack (also used for the output file name)
    #[arg(short = 'n', long, value_name = "NAME", default_value = "")]
    pub name: String,

    /// Description written to pack.mcmeta
    #[arg(short = 'D', long, value_name = "TEXT", default_value = "")]
    pub description: String,

    /// PNG used as pack.png
    #[arg(short = 'i', long, value_name = "PNG")]
    pub icon: Option<PathBuf>,

    /// pack_format written to pack.mcmeta
    #[arg(short = 'F', long, value_name = "N", default_value_t = DEFAULT_PACK_FORMAT)]
    pub pack_format: u32,

    /// DEFLATE compression level
    #[arg(short = 'L', long, value_name = "0-9", default_value_t = DEFAULT_COMPRESSION_LEVEL,
          value_parser = clap::value_parser!(u32).range(0..=9))]
    pub level: u32,

    /// Output file (default: <DIR>/<sanitized name>.zip)
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory for the output file
    #[arg(short = 'd', value_name = "DIR", conflicts_with = "output")]
    pub output_dir: Option<PathBuf>,

    /// Overwrite the output file if it exists
    #[arg(short = 'f')]
    pub force: bool,

    /// List the merged files and the pack each comes from, write nothing
    #[arg(short = 'l')]
    pub list: bool,

    /// List verbosely / debug logging
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Soft size limit per pack, in MiB
    #[arg(long, value_name = "MIB", default_value_t = 75)]
    pub max_size: u64,

    /// Accept packs larger than --max-size
    #[arg(short = 'y', long)]
    pub allow_large: bool,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    /// Log filter used unless RUST_LOG is set
    pub fn log_level(&self) -> log::LevelFilter {
        if self.is_very_quiet() {
            log::LevelFilter::Error
        } else if self.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        }
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions::default().with_level(self.level)
    }

    pub fn input_policy(&self) -> InputPolicy {
        InputPolicy {
            max_input_size: self.max_size.saturating_mul(1024 * 1024),
            allow_large: self.allow_large,
        }
    }
}
