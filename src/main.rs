#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]

use crate::configuration::Configuration;
use argh::FromArgs;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

mod artifactory;
mod command;
mod configuration;
mod meta;
mod sink;
mod walker;

fn set_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .try_init();
}

#[derive(FromArgs, PartialEq, Debug)]
/// Mirror an Artifactory Docker storage tree into the registry-v2 link layout
struct GlobalArguments {
    #[argh(option, short = 'c', default = "String::from(\"config.toml\")")]
    /// the path to the configuration file, defaults to `config.toml`
    config: String,
}

fn main() -> Result<(), command::Error> {
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli_args: GlobalArguments = argh::from_env();

    let config = Configuration::load(&cli_args.config)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create Tokio runtime")
        .block_on(run_command(config))
}

async fn run_command(config: Configuration) -> Result<(), command::Error> {
    set_tracing();

    let mirror = command::mirror::Command::new(&config)?;
    mirror.run().await
}
