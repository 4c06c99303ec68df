use std::ffi::OsString;

pub use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct ClapArgs {
    /// Profile name
    /// Section of the profile file to read. Default is 'default'.
    /// If the profile is not configured, built-in defaults are used.
    #[clap(short = 'p', long, default_value = "default", help = "profile name")]
    profile: String,

    #[clap(
        short = 's',
        long,
        help = "backend base URL, overrides the profile and APIHUB_BASE_URL"
    )]
    server: Option<String>,

    #[clap(short = 'v', long, help = "echo the server in use and each view change")]
    verbose: bool,

    #[clap(long, help = "print backend information and exit")]
    info: bool,
}

#[derive(Debug, Clone)]
pub struct CommandLineArgs {
    profile: String,
    server: Option<String>,
    verbose: bool,
    info: bool,
}

impl From<ClapArgs> for CommandLineArgs {
    fn from(args: ClapArgs) -> Self {
        Self {
            profile: args.profile,
            server: args.server,
            verbose: args.verbose,
            info: args.info,
        }
    }
}

impl CommandLineArgs {
    pub fn parse() -> Self {
        ClapArgs::parse().into()
    }

    pub fn parse_from<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        ClapArgs::parse_from(itr).into()
    }

    pub fn profile(&self) -> &String {
        &self.profile
    }

    pub fn server(&self) -> Option<&str> {
        self.server.as_deref()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn info(&self) -> bool {
        self.info
    }
}
