use crate::config;
use clap::{ArgAction, Parser};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

/// Redirect request paths to URLs from a store, a rule file and a static map
#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Options {
    /// Logging verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(
        help = "Socket address to listen on (--help for more)",
        long_help = r"Socket address to listen on:
    - incoming http connections are received on this socket
Examples:
    - 127.0.0.1:3000
    - 0.0.0.0:80
    - [2001:db8::1]:8080",
        default_value = config::DEFAULT_LISTEN
    )]
    pub listen: SocketAddr,

    /// YAML rule file: a list of `path` / `url` records
    #[arg(short, long, default_value = config::DEFAULT_RULES_FILE)]
    pub config: PathBuf,

    /// redb store file, read from the `redirects` table
    #[arg(short, long, default_value = config::DEFAULT_STORE_FILE)]
    pub db: PathBuf,

    #[arg(
        help = "Extra static redirects (--help for more)",
        long_help = r"Extra static redirects:
    - added after the built-in redirects; a repeated path replaces the earlier url
Examples:
    - /docs=https://docs.rs/
    - /src=https://github.com/example/project"
    )]
    #[arg(short, long, value_parser = Mapping::from_str)]
    pub map: Vec<Mapping>,
}

/// One `PATH=URL` pair given on the command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mapping {
    pub path: String,
    pub url: String,
}

impl FromStr for Mapping {
    type Err = &'static str;

    fn from_str(arg: &str) -> Result<Self, Self::Err> {
        let (path, url) = arg.split_once('=').ok_or("expected PATH=URL")?;
        if !path.starts_with('/') {
            return Err("path must start with '/'");
        }
        if url.is_empty() {
            return Err("url must not be empty");
        }
        Ok(Self {
            path: path.to_string(),
            url: url.to_string(),
        })
    }
}
