#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
use anyhow::Result;
#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

/// unkn-landing - landing page controller diagnostics
///
/// Runs the landing page logic outside the browser: classify user agents,
/// resolve the download buttons against the release API, or replay a page
/// load against an in-memory page.
///
/// Examples:
///   unkn-landing classify "Mozilla/5.0 (iPhone; ...)"
///   unkn-landing links --json
///   unkn-landing simulate --press Insert
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(author, version = env!("UNKN_LANDING_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository providing the releases, as "owner/repo"
    #[arg(long, env = "UNKN_REPO", value_name = "OWNER/REPO", global = true)]
    pub repo: Option<String>,

    /// Release API URL (defaults to https://api.github.com)
    #[arg(long = "api-url", env = "UNKN_API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Classify a user agent as mobile or desktop
    Classify(ClassifyArgs),

    /// Resolve both download buttons against the release API
    Links(LinksArgs),

    /// Replay a page load against an in-memory page
    Simulate(SimulateArgs),
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    #[arg(value_name = "USER_AGENT")]
    pub user_agent: String,
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Args, Debug)]
pub struct LinksArgs {
    /// Print the outcome as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Args, Debug)]
pub struct SimulateArgs {
    /// User agent reported by the simulated browser
    #[arg(
        long = "user-agent",
        value_name = "UA",
        default_value = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0"
    )]
    pub user_agent: String,

    /// Key pressed after the warning delay (repeatable)
    #[arg(long = "press", value_name = "KEY")]
    pub press: Vec<String>,

    /// Fire the intro video's "ended" event
    #[arg(long = "video-ended")]
    pub video_ended: bool,

    /// Skip the release lookups
    #[arg(long)]
    pub offline: bool,
}

#[cfg(not(target_arch = "wasm32"))]
mod run {
    use anyhow::{Context, Result};
    use futures_util::future;
    use reqwest::Client;
    use std::rc::Rc;

    use unkn_landing::config::SiteConfig;
    use unkn_landing::device::Device;
    use unkn_landing::github::{GitHub, GitHubRepo};
    use unkn_landing::landing::{Downloads, LandingPage};
    use unkn_landing::page::MemoryPage;
    use unkn_landing::resolver::{self, Channel};
    use unkn_landing::timer::ManualClock;

    use super::{ClassifyArgs, LinksArgs, SimulateArgs};

    pub fn config(repo: Option<String>, api_url: Option<String>) -> Result<SiteConfig> {
        let repo = repo
            .map(|r| r.parse::<GitHubRepo>())
            .transpose()
            .context("Invalid --repo")?;
        Ok(SiteConfig::default().with_overrides(repo, api_url))
    }

    fn github(config: &SiteConfig) -> Result<GitHub> {
        let client = Client::builder()
            .user_agent(concat!("unkn-landing/", env!("UNKN_LANDING_VERSION")))
            .build()?;
        Ok(GitHub::new(client, Some(config.api_url.clone())))
    }

    pub fn classify(args: ClassifyArgs) {
        println!("{}", Device::classify(&args.user_agent));
    }

    pub async fn links(config: &SiteConfig, args: LinksArgs) -> Result<()> {
        let github = github(config)?;
        let (stable, nightly) = future::join(
            resolver::resolve(Channel::Stable, &github, &config.repo),
            resolver::resolve(Channel::Nightly, &github, &config.repo),
        )
        .await;

        let downloads = Downloads { stable, nightly };
        if args.json {
            println!("{}", serde_json::to_string_pretty(&downloads)?);
        } else {
            println!("{}: {}", Channel::Stable, downloads.stable);
            println!("{}: {}", Channel::Nightly, downloads.nightly);
        }
        Ok(())
    }

    pub async fn simulate(config: SiteConfig, args: SimulateArgs) -> Result<()> {
        let page = Rc::new(MemoryPage::new(args.user_agent));
        let clock = ManualClock::new();
        let warning_delay = config.warning_delay;
        let settle = config.panel_expand_delay.max(config.logo_delay);
        let landing = LandingPage::new(
            page.clone(),
            Rc::new(clock.clone()),
            Rc::new(github(&config)?),
            config,
        );

        let startup = landing.start()?;
        println!("device: {}", startup.device);

        if let Some(downloads) = startup.downloads {
            if args.offline {
                log::info!("Skipping release lookups");
            } else {
                let downloads = downloads.await;
                println!("{}: {}", Channel::Stable, downloads.stable);
                println!("{}: {}", Channel::Nightly, downloads.nightly);
            }
        }

        if args.video_ended {
            landing.on_video_ended()?;
        }

        clock.advance(warning_delay);
        for key in &args.press {
            landing.on_key_down(key)?;
        }
        clock.advance(settle);

        print!("{}", page.snapshot());
        landing.teardown();
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Classify(args) => run::classify(args),
        Commands::Links(args) => {
            let config = run::config(cli.repo, cli.api_url)?;
            run::links(&config, args).await?
        }
        Commands::Simulate(args) => {
            let config = run::config(cli.repo, cli.api_url)?;
            run::simulate(config, args).await?
        }
    }
    Ok(())
}
