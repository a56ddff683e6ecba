use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::sync::OnceLock;

/// Single-dash multi-letter flags from older scripts and their long forms.
/// clap only knows single-letter short flags, so these are rewritten before
/// parsing.
const LEGACY_FLAGS: &[(&str, &str)] = &[
    ("-Jc", "--compact-json"),
    ("-rmMl", "--rm-media-links"),
    ("-rmPp", "--rm-primary-photo"),
    ("-rmPd", "--rm-primary-datasheet"),
];

pub fn expand_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            LEGACY_FLAGS
                .iter()
                .find(|(legacy, _)| arg == *legacy)
                .map_or(arg, |(_, long)| OsString::from(*long))
        })
        .collect()
}

/// "0.3.0" for releases, "0.3.0@abc1234 2026-01-15" for development builds.
fn version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("DKAPI_GIT_HASH");
    const COMMIT_DATE: &str = env!("DKAPI_COMMIT_DATE");
    const IS_RELEASE: &str = env!("DKAPI_IS_RELEASE");

    static VERSION_STRING: OnceLock<String> = OnceLock::new();
    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "dkapi", version = version())]
#[command(about = "Command-line client for the Digi-Key part search API", long_about = None)]
pub struct Cli {
    /// Command to run
    #[arg(value_enum)]
    pub command: Command,

    /// Parameter; its meaning depends on the command (part number, or the
    /// authorization code / redirect URL for the step-two commands)
    #[arg(short = 'P', long = "param")]
    pub param: Option<String>,

    /// Part count used when searching
    #[arg(
        short = 'C',
        long = "count",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub count: u32,

    /// Output search results as compact JSON
    #[arg(long = "compact-json")]
    pub compact_json: bool,

    /// Remove the MediaLinks section from search results
    #[arg(long = "rm-media-links")]
    pub rm_media_links: bool,

    /// Remove the PrimaryPhoto section from search results
    #[arg(long = "rm-primary-photo")]
    pub rm_primary_photo: bool,

    /// Remove the PrimaryDatasheet section from search results
    #[arg(long = "rm-primary-datasheet")]
    pub rm_primary_datasheet: bool,

    /// Enable debug output even if disabled in the state file
    #[arg(short = 'D', long = "debug")]
    pub debug: bool,

    /// Disable debug output even if enabled in the state file. Takes precedence over -D
    #[arg(short = 'd', long = "no-debug")]
    pub no_debug: bool,
}

impl Cli {
    /// Debug setting forced from the command line, if any.
    pub fn debug_override(&self) -> Option<bool> {
        if self.no_debug {
            Some(false)
        } else if self.debug {
            Some(true)
        } else {
            None
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the authorization URL
    #[value(name = "NEW_AUTH_STEP1", alias = "STR_M1")]
    NewAuthStep1,
    /// Print the token URL for the code given with -P
    #[value(name = "NEW_AUTH_STEP2", alias = "STR_M2")]
    NewAuthStep2,
    /// Log in and print a new authorization code
    #[value(name = "PERFORM_AUTH_STEP1", alias = "INVOKE_M1")]
    PerformAuthStep1,
    /// Exchange the code given with -P for tokens
    #[value(name = "PERFORM_AUTH_STEP2", alias = "INVOKE_M2")]
    PerformAuthStep2,
    /// Run the full new authorization
    #[value(name = "AUTHENTICATE", alias = "AUTH_NEW")]
    Authenticate,
    /// Refresh the access token
    #[value(name = "REFRESH_AUTH", alias = "AUTH_REFRESH")]
    RefreshAuth,
    /// Search for the part given with -P
    #[value(name = "PART_SEARCH")]
    PartSearch,
    /// Load and save state without doing anything else
    #[value(name = "DEBUG_NOOP", alias = "DBG1")]
    DebugNoop,
}
