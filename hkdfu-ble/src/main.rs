//! CLI to inspect a paired accessory and send it into DFU mode.
//!
//! Scans for accessories advertising the Nordic buttonless-DFU service,
//! lists services/characteristics with firmware and hardware versions, and
//! triggers the jump-to-bootloader command.

use clap::{Parser, Subcommand};

use hkdfu_controller::{probe, BootloaderJumpCommand, CommandOutcome, JumpError, WaitNotice};

mod ble;
use ble::BleEndpoint;

#[derive(Parser)]
#[command(name = "hkdfu-ble")]
#[command(about = "Inspect accessories and send them into DFU mode")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan for nearby accessories
    Scan {
        /// Scan duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Show an accessory's services, characteristics, and DFU support
    Info {
        /// Accessory name or address to connect to
        #[arg(short, long)]
        device: Option<String>,
        /// Also read every characteristic value
        #[arg(short, long)]
        read: bool,
    },
    /// Restart an accessory into DFU mode
    Jump {
        /// Accessory name or address to connect to
        #[arg(short, long)]
        device: Option<String>,
        /// Skip the restart confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan { duration } => scan_devices(duration).await?,
        Commands::Info { device, read } => show_info(device.as_deref(), read).await?,
        Commands::Jump { device, yes } => jump_to_bootloader(device.as_deref(), yes).await?,
    }

    Ok(())
}

async fn scan_devices(duration: u64) -> Result<(), Box<dyn std::error::Error>> {
    println!("Scanning for accessories ({} seconds)...", duration);

    let devices = ble::scan(duration).await?;

    println!("\nFound {} devices:", devices.len());
    for device in devices {
        let rssi = device
            .rssi
            .map(|r| format!("{} dBm", r))
            .unwrap_or_else(|| "N/A".to_string());
        let marker = if device.advertises_dfu { " [DFU]" } else { "" };
        println!("  {} ({}) RSSI: {}{}", device.name, device.address, rssi, marker);
    }

    Ok(())
}

async fn show_info(device: Option<&str>, read: bool) -> Result<(), Box<dyn std::error::Error>> {
    println!("Connecting...");
    let endpoint = BleEndpoint::connect(device).await?;
    println!("Connected to {} ({})", endpoint.name().await, endpoint.address());

    let mut services = endpoint.services();
    let capability = probe(&endpoint, &services).await;

    println!("\nFirmware version: {}", capability.firmware_version);
    println!("Hardware version: {}", capability.hardware_version);
    println!(
        "DFU support: {}",
        if capability.has_control_point() { "Yes" } else { "No" }
    );

    if read {
        for service in &mut services {
            for characteristic in &mut service.characteristics {
                use hkdfu_controller::CharacteristicEndpoint;
                if let Ok(value) = endpoint.read_value(characteristic.id).await {
                    characteristic.value = Some(value);
                }
            }
        }
    }

    for service in &services {
        println!("\nService: {}", service.description);
        for characteristic in &service.characteristics {
            if read {
                println!(
                    "  {}: {}",
                    characteristic.display_name(),
                    characteristic.display_value()
                );
            } else {
                println!("  {}", characteristic.display_name());
            }
        }
    }

    endpoint.disconnect().await?;
    Ok(())
}

/// Console stand-in for the original "please wait" alert
struct ConsoleNotice;

impl WaitNotice for ConsoleNotice {
    fn show(&mut self) {
        println!("Please wait... sending the DFU command to the accessory.");
        println!("This might take a few seconds if the accessory is unreachable.");
    }

    fn dismiss(&mut self) {}
}

async fn jump_to_bootloader(
    device: Option<&str>,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !yes && !confirm_restart()? {
        println!("Cancelled.");
        return Ok(());
    }

    println!("Connecting...");
    let endpoint = BleEndpoint::connect(device).await?;
    let name = endpoint.name().await;
    println!("Connected to {} ({})", name, endpoint.address());

    let services = endpoint.services();
    let capability = probe(&endpoint, &services).await;

    let mut command = BootloaderJumpCommand::new();
    match command.invoke(&capability, &endpoint, &mut ConsoleNotice).await {
        Ok(CommandOutcome::Success) => {
            println!(
                "\"{}\" should now disconnect and restart in DFU mode.",
                name
            );
            println!("Scan for the new DFU peripheral to continue the flashing process.");
        }
        Ok(CommandOutcome::Failure(reason)) => {
            println!("DFU command failed: {}", reason);
        }
        Ok(CommandOutcome::Timeout) => {
            println!("DFU command timed out at the transport layer.");
        }
        Err(JumpError::MissingFeature) => {
            println!(
                "\"{}\" does not seem to have the DFU control point characteristic.",
                name
            );
            println!("Pair it again or make sure it supports buttonless DFU.");
        }
        Err(JumpError::Busy) => {
            println!("A DFU command is still in flight for this accessory.");
        }
    }

    // The accessory disconnects on its own after a successful jump
    let _ = endpoint.disconnect().await;
    Ok(())
}

fn confirm_restart() -> Result<bool, Box<dyn std::error::Error>> {
    println!("Updating requires restarting this accessory into DFU mode.");
    println!("After restarting, use a DFU tool to continue flashing.");
    print!("Restart in DFU mode? [y/N] ");
    use std::io::Write;
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
