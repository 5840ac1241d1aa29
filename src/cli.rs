use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use kk_core::{Measurement, RoundingMode, SortOrder};

#[derive(Debug, Parser)]
#[command(name = "kaikanakku", version)]
#[command(about = "Kol / Viral / cm length converter", long_about = None)]
pub struct Cli {
    /// Config file (TOML). Defaults to kaikanakku.toml in the data directory.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Use this directory instead of the platform data directory
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Keep history in memory only; nothing is written to the database
    #[arg(long, global = true)]
    pub in_memory: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Also print logs to the console
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert between kol/viral/cm and centimeters
    #[command(subcommand)]
    Convert(ConvertCommand),
    /// Add, subtract or scale measurements
    #[command(subcommand)]
    Calc(CalcCommand),
    /// Browse and maintain conversion history
    #[command(subcommand)]
    History(HistoryCommand),
    /// Show or change user settings
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Delete history older than the configured retention once
    Sweep,
    /// Run the retention sweep on its schedule until Ctrl+C
    Daemon,
}

#[derive(Debug, Subcommand)]
pub enum ConvertCommand {
    /// kol + viral + cm → centimeters
    Kol {
        #[arg(allow_hyphen_values = true)]
        kol: String,
        #[arg(default_value = "", allow_hyphen_values = true)]
        viral: String,
        #[arg(default_value = "", allow_hyphen_values = true)]
        cm: String,
    },
    /// centimeters → kol + viral + cm, using the precision and rounding settings
    Cm {
        #[arg(allow_hyphen_values = true)]
        cm: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum CalcCommand {
    /// A + B, operands as KOL:VIRAL:CM
    Add {
        #[arg(value_parser = parse_operand, allow_hyphen_values = true)]
        a: Measurement,
        #[arg(value_parser = parse_operand, allow_hyphen_values = true)]
        b: Measurement,
    },
    /// A − B, operands as KOL:VIRAL:CM. B must not be longer than A.
    Sub {
        #[arg(value_parser = parse_operand, allow_hyphen_values = true)]
        a: Measurement,
        #[arg(value_parser = parse_operand, allow_hyphen_values = true)]
        b: Measurement,
    },
    /// KOL:VIRAL × MULTIPLIER, rounded to whole virals
    Mul {
        #[arg(value_parser = parse_kol_viral, allow_hyphen_values = true)]
        operand: (u32, u32),
        #[arg(allow_hyphen_values = true)]
        multiplier: String,
    },
}

#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Case-insensitive substring of the input or output text
    #[arg(long)]
    pub search: Option<String>,

    /// Only favorites. Ignored when --search is given.
    #[arg(long)]
    pub favorites: bool,

    /// date, size-asc or size-desc
    #[arg(long, default_value = "date")]
    pub sort: SortOrder,
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// List history
    List(FilterArgs),
    /// The most recent conversions
    Recent,
    /// Print the list again every time history changes
    Watch {
        #[command(flatten)]
        filter: FilterArgs,

        /// Stop after N updates
        #[arg(short, long)]
        max_updates: Option<usize>,
    },
    /// Mark a record as favorite
    Favorite {
        id: String,
        /// Remove the mark instead
        #[arg(long)]
        off: bool,
    },
    /// Delete one record
    Delete { id: String },
    /// Delete every record
    Clear,
    /// Run a record's input through its converter again
    Reuse { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    KolToCm,
    CmToKol,
}

#[derive(Debug, Subcommand)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,
    /// Change one or more settings
    Set(SettingsSetArgs),
    /// Restore defaults
    Reset,
}

#[derive(Debug, Clone, Args)]
pub struct SettingsSetArgs {
    /// Keep fractional centimeters in cm → kol output
    #[arg(long)]
    pub precision: Option<bool>,

    /// ROUND or TRUNCATE, used when precision is off
    #[arg(long)]
    pub rounding: Option<RoundingMode>,

    /// Delete history older than this many days. 0 disables.
    #[arg(long, allow_negative_numbers = true)]
    pub auto_delete_days: Option<i32>,

    #[arg(long)]
    pub language: Option<String>,

    /// Converter the app opens on
    #[arg(long, value_enum)]
    pub default_direction: Option<Direction>,
}

impl SettingsSetArgs {
    pub fn is_empty(&self) -> bool {
        self.precision.is_none()
            && self.rounding.is_none()
            && self.auto_delete_days.is_none()
            && self.language.is_none()
            && self.default_direction.is_none()
    }
}

/// Parses `KOL[:VIRAL[:CM]]`. Missing or empty parts count as zero.
pub fn parse_operand(text: &str) -> Result<Measurement, String> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > 3 {
        return Err(format!("expected KOL:VIRAL:CM, got {text:?}"));
    }
    let part = |i: usize| parts.get(i).copied().unwrap_or("");
    Measurement::parse(part(0), part(1), part(2)).map_err(|e| e.to_string())
}

/// Parses `KOL[:VIRAL]` for multiplication, which has no cm component.
pub fn parse_kol_viral(text: &str) -> Result<(u32, u32), String> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() > 2 {
        return Err(format!("expected KOL:VIRAL, got {text:?}"));
    }
    let viral = parts.get(1).copied().unwrap_or("");
    let measurement = Measurement::parse(parts[0], viral, "").map_err(|e| e.to_string())?;
    Ok((measurement.kol, measurement.viral))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn operand_parts_default_to_zero() {
        assert_eq!(parse_operand("1:2:1.5"), Ok(Measurement::new(1, 2, 1.5)));
        assert_eq!(parse_operand("3"), Ok(Measurement::new(3, 0, 0.0)));
        assert_eq!(parse_operand("::2"), Ok(Measurement::new(0, 0, 2.0)));
    }

    #[test]
    fn operand_rejects_out_of_range_components() {
        assert!(parse_operand("0:24:0").unwrap_err().contains("viral"));
        assert!(parse_operand("0:0:3").unwrap_err().contains("cm"));
        assert!(parse_operand("1:2:3:4").is_err());
    }

    #[test]
    fn kol_viral_operand() {
        assert_eq!(parse_kol_viral("2:5"), Ok((2, 5)));
        assert_eq!(parse_kol_viral("2"), Ok((2, 0)));
        assert!(parse_kol_viral("1:2:3").is_err());
    }

    #[test]
    fn parses_history_list_flags() {
        let cli = Cli::try_parse_from([
            "kaikanakku",
            "--in-memory",
            "history",
            "list",
            "--favorites",
            "--sort",
            "size-desc",
        ])
        .unwrap();

        assert!(cli.in_memory);
        match cli.command {
            Commands::History(HistoryCommand::List(filter)) => {
                assert!(filter.favorites);
                assert_eq!(filter.sort, SortOrder::BySizeDesc);
                assert_eq!(filter.search, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn settings_set_accepts_negative_days() {
        let cli = Cli::try_parse_from([
            "kaikanakku",
            "settings",
            "set",
            "--auto-delete-days",
            "-1",
            "--rounding",
            "truncate",
        ])
        .unwrap();

        match cli.command {
            Commands::Settings(SettingsCommand::Set(args)) => {
                assert_eq!(args.auto_delete_days, Some(-1));
                assert_eq!(args.rounding, Some(RoundingMode::Truncate));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
