use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use usbnet::binding::{Exception, Module, Value, FUNCTIONS, MODULE_NAME};
use usbnet::glue::UsbNetifGlue;
use usbnet::sys::DefaultDriver;
use usbnet::{IfaceConfig, NetifDriver, Transport, UsbNet};

#[derive(Debug, Parser)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Bring the interface up unless it already is
    Up(IfaceArgs),
    /// Bring the interface up, then tear it down again
    Cycle(IfaceArgs),
    /// List the functions of the scripting module
    Describe,
}

#[derive(Debug, Args)]
struct IfaceArgs {
    #[clap(long, default_value_t = defaults().hostname().to_string())]
    hostname: String,
    #[clap(long, default_value_t = defaults().ip_info().ip.to_string())]
    ip: String,
    #[clap(long, default_value_t = defaults().ip_info().netmask.to_string())]
    netmask: String,
    #[clap(long, default_value_t = defaults().ip_info().gateway.to_string())]
    gateway: String,
}

fn defaults() -> IfaceConfig {
    IfaceConfig::default()
}

impl IfaceArgs {
    fn to_values(&self) -> Vec<Value> {
        [&self.hostname, &self.ip, &self.netmask, &self.gateway]
            .into_iter()
            .map(|s| Value::from(s.as_str()))
            .collect()
    }
}

fn bring_up<D: NetifDriver, T: Transport<D::Netif>>(
    module: &mut Module<D, T>,
    args: &IfaceArgs,
) -> Result<(), Exception> {
    if module.call("is_up", &[])? == Value::Bool(true) {
        return Ok(());
    }
    module.call("start", &args.to_values())?;
    Ok(())
}

fn print_status<D: NetifDriver, T: Transport<D::Netif>>(
    module: &mut Module<D, T>,
) -> Result<(), Exception> {
    println!("{MODULE_NAME}.is_up() -> {}", module.call("is_up", &[])?);
    Ok(())
}

fn run(command: Commands) -> Result<(), Exception> {
    let mut module = Module::new(UsbNet::new(DefaultDriver::new(), UsbNetifGlue::new()));

    match command {
        Commands::Describe => {
            println!("module {}", module.attr("__name__")?);
            for function in FUNCTIONS {
                println!("  {} ({} args)", function.name, function.arity);
            }
        }
        Commands::Up(args) => {
            bring_up(&mut module, &args)?;
            print_status(&mut module)?;
        }
        Commands::Cycle(args) => {
            bring_up(&mut module, &args)?;
            print_status(&mut module)?;
            module.call("stop", &[])?;
            print_status(&mut module)?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Cli::parse();

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
