//! Command-line argument surface.

use crate::pager::PagerMode;
use clap::Parser;
use std::path::PathBuf;

/// Terminal text viewer with syntax highlighting, table alignment, and
/// built-in paging.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "rcat",
    version,
    about = "A terminal text viewer with syntax highlighting, table alignment, and built-in paging",
    after_help = "Examples:\n  \
        rcat file.txt\n  \
        rcat --theme --syntax py script.py\n  \
        rcat --align-csv data.csv\n  \
        rcat --rainbowcsv data.csv\n  \
        rcat -n file.txt\n  \
        echo 'code' | rcat -e --syntax cpp"
)]
pub struct Args {
    /// Files to display; "-" or no files reads standard input
    pub files: Vec<PathBuf>,

    /// Enable the vim-like color theme
    #[arg(long)]
    pub theme: bool,

    /// Force syntax highlighting (c, cpp, py, md, json, csv)
    #[arg(short, long)]
    pub syntax: Option<String>,

    /// Align and display CSV as a table (implies --syntax csv)
    #[arg(long, visible_alias = "csv-table")]
    pub align_csv: bool,

    /// Align markdown tables
    #[arg(long, visible_alias = "md-table")]
    pub align_md_table: bool,

    /// Rainbow CSV with colored columns (256-color)
    #[arg(long = "rainbowcsv", visible_alias = "rainbow")]
    pub rainbow_csv: bool,

    /// Use pager for output (less-like mode)
    #[arg(short, long, conflicts_with = "no_pager")]
    pub pager: bool,

    /// Never use pager
    #[arg(long)]
    pub no_pager: bool,

    /// Show line numbers
    #[arg(short = 'n', long = "linenumber")]
    pub line_numbers: bool,

    /// Read from stdin (pipeline mode)
    #[arg(short = 'e')]
    pub echo: bool,
}

impl Args {
    /// Pagination policy from the flag pair; neither flag means auto.
    pub fn pager_mode(&self) -> PagerMode {
        if self.pager {
            PagerMode::Always
        } else if self.no_pager {
            PagerMode::Never
        } else {
            PagerMode::Auto
        }
    }

    /// The sources to process, in order. No files (or `-e`) means stdin.
    pub fn sources(&self) -> Vec<PathBuf> {
        if self.echo || self.files.is_empty() {
            vec![PathBuf::from("-")]
        } else {
            self.files.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pager_mode_from_flags() {
        let mut args = Args::default();
        assert_eq!(args.pager_mode(), PagerMode::Auto);

        args.pager = true;
        assert_eq!(args.pager_mode(), PagerMode::Always);

        args.pager = false;
        args.no_pager = true;
        assert_eq!(args.pager_mode(), PagerMode::Never);
    }

    #[test]
    fn test_no_files_reads_stdin() {
        let args = Args::default();
        assert_eq!(args.sources(), vec![PathBuf::from("-")]);
    }

    #[test]
    fn test_echo_forces_stdin_even_with_files() {
        let args = Args {
            echo: true,
            files: vec![PathBuf::from("ignored.txt")],
            ..Args::default()
        };
        assert_eq!(args.sources(), vec![PathBuf::from("-")]);
    }

    #[test]
    fn test_parses_aliases() {
        let args = Args::parse_from(["rcat", "--csv-table", "--rainbow", "data.csv"]);
        assert!(args.align_csv);
        assert!(args.rainbow_csv);
        assert_eq!(args.files, vec![PathBuf::from("data.csv")]);
    }

    #[test]
    fn test_pager_flags_conflict() {
        let result = Args::try_parse_from(["rcat", "--pager", "--no-pager", "f.txt"]);
        assert!(result.is_err());
    }
}
