use anyhow::{anyhow, bail, Result};
use log::LevelFilter;

use crate::app::{Shelter, VERSION};

pub const USAGE: &str = "\
usage: shelter [-h] [--version] [-v] [-vv] [--fonts DIR] [--font NAME]

options:
  -h, --help           show this help message and exit
  --version            show program's version number and exit
  -v, --verbose        set loglevel to INFO
  -vv, --very-verbose  set loglevel to DEBUG
  --fonts DIR          directory holding the font sheets (default: res/fonts)
  --font NAME          font sheet to load, without extension (default: topaz8x16)";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Run(Args),
    Version,
    Help,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Args {
    pub log_level: LevelFilter,
    pub fonts_path: Option<String>,
    pub font_name: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Warn,
            fonts_path: None,
            font_name: None,
        }
    }
}

impl Args {
    pub fn into_shelter(self) -> Shelter {
        let mut shelter = Shelter::new();
        if let Some(path) = self.fonts_path {
            shelter = shelter.with_fonts_path(path);
        }
        if let Some(name) = self.font_name {
            shelter = shelter.with_font(&name);
        }
        shelter
    }
}

pub fn version() -> String {
    format!("shelter {}", VERSION)
}

/// Parses the arguments following the program name.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--version" => return Ok(Command::Version),
            "-v" | "--verbose" => parsed.log_level = LevelFilter::Info,
            "-vv" | "--very-verbose" => parsed.log_level = LevelFilter::Debug,
            "--fonts" => {
                let path = args.next().ok_or(anyhow!("--fonts needs a directory"))?;
                parsed.fonts_path = Some(path);
            }
            "--font" => {
                let name = args.next().ok_or(anyhow!("--font needs a name"))?;
                parsed.font_name = Some(name);
            }
            other => bail!("unrecognized argument '{}'\n\n{}", other, USAGE),
        }
    }

    Ok(Command::Run(parsed))
}
