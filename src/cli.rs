use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "seoscribe")]
#[command(about = "Generate an AI-written SEO report for a URL", long_about = None)]
pub struct Cli {
    /// The URL to analyze
    #[arg(value_name = "URL")]
    pub url: String,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub output: String,

    /// Save report to file
    #[arg(short, long)]
    pub save: Option<String>,

    /// Audit the mobile rendering instead of desktop (default: true)
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub mobile: bool,

    /// Per-request timeout in seconds (default: 120)
    #[arg(short, long, default_value_t = 120)]
    pub timeout: u64,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long)]
    pub config: Option<String>,
}

impl Cli {
    /// Applies config file values under CLI flags; flags left at their
    /// defaults pick up the config value.
    pub fn merged_with(mut self, config: &crate::config::Config) -> Self {
        if self.output == "text" {
            if let Some(output) = &config.output {
                self.output = output.clone();
            }
        }
        if self.save.is_none() {
            self.save = config.save.clone();
        }
        if self.mobile {
            self.mobile = config.mobile.unwrap_or(self.mobile);
        }
        if self.timeout == 120 {
            self.timeout = config.timeout.unwrap_or(self.timeout);
        }
        if !self.verbose {
            self.verbose = config.verbose.unwrap_or(self.verbose);
        }
        self
    }
}
