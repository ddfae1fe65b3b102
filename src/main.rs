//! Dataplane Metadata CLI
//!
//! Prints the packet metadata layout this build was compiled with and
//! validates VIF, VRF and bridge values before they go into configuration.

mod check;
mod layout;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dpmeta")]
#[command(version)]
#[command(about = "Packet metadata layout and index validation", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the metadata record layout of the active profile
    Layout,

    /// Validate index values (decimal or 0x-prefixed hex)
    Check {
        /// VIF index, valid from 1 to 4095
        #[arg(long, value_parser = check::parse_u32)]
        vif: Vec<u32>,

        /// VRF index, valid below 256
        #[arg(long, value_parser = check::parse_u32)]
        vrf: Vec<u32>,

        /// Bridge ID, valid from 1 to 1023
        #[arg(long, value_parser = check::parse_u32)]
        bridge: Vec<u32>,

        /// Wide egress value: a VIF index or the broadcast sentinel 0xfffffffc
        #[arg(long, value_parser = check::parse_u32)]
        out_port: Vec<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Layout => print!("{}", layout::render()?),
        Commands::Check {
            vif,
            vrf,
            bridge,
            out_port,
        } => {
            let report = check::Report::new(&vif, &vrf, &bridge, &out_port);
            print!("{report}");
            let failures = report.failures();
            if failures > 0 {
                bail!("{failures} value(s) out of range");
            }
        }
    }

    Ok(())
}
