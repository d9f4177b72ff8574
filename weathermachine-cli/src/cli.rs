use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use inquire::{CustomType, Password, Select};
use weathermachine_core::{Config, Output, Source, Units, WeatherClient};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathermachine", version, about = "Weather Machine forecast CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key and default request options.
    Configure,

    /// Fetch a forecast and print one section of it.
    Show(ShowArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Section {
    Forecast,
    Currently,
    Minutely,
    Hourly,
    Daily,
    Alerts,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Part of the payload to print.
    #[arg(value_enum, default_value_t = Section::Currently)]
    pub section: Section,

    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Weather data provider, e.g. "open_weather".
    #[arg(long)]
    pub source: Option<String>,

    /// One of us, si, uk, ca, m.
    #[arg(long)]
    pub units: Option<String>,

    /// base or full.
    #[arg(long)]
    pub output: Option<String>,

    /// Extra query parameter as key=value; may be repeated.
    #[arg(long = "param", value_parser = parse_key_val)]
    pub params: Vec<(String, String)>,

    #[arg(long, env = "WEATHERMACHINE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Fail instead of falling back when an option value is rejected.
    #[arg(long)]
    pub strict: bool,

    /// Print raw JSON.
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show(args) => show(args).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("Weather Machine API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    cfg.api_key = Some(api_key);

    cfg.source = Some(Select::new("Default source:", Source::all().to_vec()).prompt()?);
    cfg.units = Some(Select::new("Default units:", Units::all().to_vec()).prompt()?);
    cfg.output = Some(Select::new("Default output:", Output::all().to_vec()).prompt()?);

    let lat = CustomType::<f64>::new("Default latitude (Esc to skip):").prompt_skippable()?;
    let lon = match lat {
        Some(_) => CustomType::<f64>::new("Default longitude:").prompt_skippable()?,
        None => None,
    };
    (cfg.latitude, cfg.longitude) = match (lat, lon) {
        (Some(lat), Some(lon)) => (Some(lat), Some(lon)),
        _ => (None, None),
    };

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(args: ShowArgs) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let mut client = build_client(&cfg, &args)?;

    if args.strict {
        let rejected = client.take_warnings();
        if let Some(first) = rejected.first() {
            bail!("{first}");
        }
    }

    if client.location().is_none() {
        bail!(
            "No location given.\n\
             Hint: pass --lat and --lon, or store a default with `weathermachine configure`."
        );
    }

    let rendered = match args.section {
        Section::Forecast => render::json(&client.fetch().await?)?,
        Section::Currently => {
            let current = client.currently().await?;
            if args.json { render::json(&current)? } else { render::entry(&current) }
        }
        Section::Minutely => render::series(&client.minutely().await?, args.json)?,
        Section::Hourly => render::series(&client.hourly().await?, args.json)?,
        Section::Daily => render::series(&client.daily().await?, args.json)?,
        Section::Alerts => render::series(&client.alerts().await?, args.json)?,
    };

    println!("{rendered}");
    Ok(())
}

/// Config values first, command-line flags on top.
fn build_client(cfg: &Config, args: &ShowArgs) -> anyhow::Result<WeatherClient> {
    let mut client = match &args.api_key {
        Some(key) => {
            let mut client = WeatherClient::new(key);
            cfg.apply(&mut client);
            client
        }
        None => cfg.client()?,
    };

    if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        client.set_location(lat, lon);
    }
    if let Some(source) = &args.source {
        client.set_source(source);
    }
    if let Some(units) = &args.units {
        client.set_units(units);
    }
    if let Some(output) = &args.output {
        client.set_output(output);
    }
    for (key, value) in &args.params {
        client.set_param(key, value);
    }

    Ok(client)
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;

    if key.is_empty() {
        return Err(format!("empty parameter name in '{s}'"));
    }

    Ok((key.to_string(), value.to_string()))
}
