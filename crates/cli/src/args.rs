//! Command-line arguments.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use pipeline::{CommunicationType, ParseError};

/// Analyzes organizational communication and prints a leadership dashboard.
#[derive(Debug, Parser)]
#[command(name = "org-compass", version, about)]
pub struct Args {
    /// Communication text to analyze; `-` reads standard input.
    #[arg(short, long, default_value = "-")]
    pub input: String,

    /// Communication type: `auto`, `team_meeting`, `leadership_email`,
    /// `all_hands` or `slack_channel`.
    #[arg(short = 't', long = "type", default_value = "auto")]
    pub communication_type: TypeSelection,

    /// Leadership profile (TOML).
    #[arg(short, long, env = "ORG_COMPASS_PROFILE")]
    pub profile: PathBuf,

    /// Configuration file (TOML). Defaults apply when omitted.
    #[arg(short, long, env = "ORG_COMPASS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Print the dashboard as JSON instead of a text report.
    #[arg(long)]
    pub json: bool,
}

/// An explicit communication type, or `None` for detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSelection(pub Option<CommunicationType>);

impl FromStr for TypeSelection {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self(None));
        }
        s.parse().map(|t| Self(Some(t)))
    }
}
