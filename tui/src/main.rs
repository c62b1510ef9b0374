use clap::Parser;
use anyhow::Context;
use log::{info, warn};
use strum::IntoEnumIterator;

use adv7482_core::Adv7482;
use adv7482_core::config::DriverConfig;
use adv7482_core::ctrl::ControlId;
use adv7482_core::format::FormatWhich;
use adv7482_core::link::*;
use adv7482_core::script::tables;
use adv7482_sim::{EmulatedChip, HdmiSignal, SimDelay, Snapshot};

use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
struct Args {
    /// Input served on the source pad (hdmi, composite)
    #[clap(short, long, default_value = "hdmi")]
    input: InputPath,
    /// Pixel encoding on the HDMI receiver (ycbcr422, rgb888)
    #[clap(long, default_value = "ycbcr422")]
    interface: InputInterface,
    /// Leave the HDMI receiver and CSI-TXA down
    #[clap(long)]
    no_hdmi: bool,
    /// Bring up the SDP and CSI-TXB
    #[clap(long)]
    sdp: bool,
    /// Skip the soft reset at probe
    #[clap(long)]
    no_sw_reset: bool,
    /// CSI-2 virtual channel
    #[clap(long, default_value_t = 0)]
    vc: u8,
    /// 7-bit address of the IO bank
    #[clap(long, default_value = "0x70", value_parser = parse_hex)]
    io_addr: u8,
    /// Replace the input with color bars
    #[clap(long)]
    color_bars: bool,

    /// Signal on the emulated HDMI port, e.g. 1280x720p
    #[clap(long)]
    signal: Option<HdmiSignal>,
    /// Raw SDP status register 0x10 of the emulated chip
    #[clap(long, default_value = "0x00", value_parser = parse_hex)]
    sdp_status: u8,

    /// Control assignment, e.g. brightness=-10 (repeatable)
    #[clap(short, long, value_parser = parse_ctrl)]
    ctrl: Vec<(ControlId, i32)>,
    /// Start streaming after probe
    #[clap(short, long)]
    stream: bool,
    /// List the built-in register scripts and exit
    #[clap(long)]
    scripts: bool,
    /// Write the final register state to this file
    #[clap(short, long)]
    dump: Option<PathBuf>,
    /// More output (repeatable)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_hex(s: &str) -> Result<u8, std::num::ParseIntError> {
    u8::from_str_radix(s.trim_start_matches("0x"), 16)
}

fn parse_ctrl(s: &str) -> anyhow::Result<(ControlId, i32)> {
    let (name, val) = s.split_once('=').context("expected NAME=VALUE")?;
    Ok((name.parse()?, val.parse()?))
}

impl Args {
    fn driver_config(&self) -> anyhow::Result<DriverConfig> {
        let link = LinkConfig {
            input: self.input,
            interface: self.interface,
            vc: VirtualChannel::new(self.vc)?,
            hdmi_enabled: !self.no_hdmi,
            sdp_enabled: self.sdp || self.input == InputPath::Composite,
            sw_reset: !self.no_sw_reset,
        };
        Ok(DriverConfig {
            io_addr: self.io_addr,
            link,
            debug: self.verbose,
            color_bars: self.color_bars,
            ..Default::default()
        })
    }
}

fn setup_logger(level: log::LevelFilter) -> anyhow::Result<()> {
    use fern::colors::{Color, ColoredLevelConfig};
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Cyan)
        .trace(Color::BrightBlack);
    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!("[{}][{}] {}", colors.color(record.level()), record.target(), message))
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()?;
    Ok(())
}

fn report(dev: &Adv7482<EmulatedChip, SimDelay>) -> anyhow::Result<()> {
    println!("input:        {} ({:?})", dev.input(), dev.g_input_status()?);
    println!("standard:     {}", dev.querystd()?);
    let fmt = dev.get_pad_format(FormatWhich::Active)?;
    println!("format:       {}x{} {:?} {:?} {:?}", fmt.width, fmt.height, fmt.code, fmt.colorspace, fmt.field);
    if dev.input() == InputPath::Hdmi {
        match dev.query_dv_timings() {
            Ok(Some(t)) => println!("dv timings:   {}x{} @ {} mHz", t.width, t.height, t.refresh_mhz()),
            Ok(None) => println!("dv timings:   no signal"),
            Err(e) => println!("dv timings:   {e}"),
        }
    }
    let crop = dev.cropcap()?;
    println!("crop bounds:  {}x{}", crop.bounds.width, crop.bounds.height);
    let bus = dev.mbus_config();
    println!("csi-2:        {} lane(s), channels {:04b}", bus.lanes, bus.channels);
    for id in ControlId::iter() {
        println!("{:<13} {}", format!("{id}:"), dev.get_ctrl(id)?);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.scripts {
        for (name, script) in tables::all() {
            println!("{name:<24} {:>4} entries", script.len());
        }
        return Ok(());
    }

    let cfg = args.driver_config()?;
    setup_logger(cfg.log_level())?;

    let chip = EmulatedChip::new(cfg.io_addr);
    chip.set_hdmi_signal(args.signal);
    chip.set_sdp_status(args.sdp_status);

    let dev = match Adv7482::probe(chip.clone(), SimDelay::default(), cfg) {
        Ok(dev) => dev,
        Err(reason) => {
            println!("Failed to probe ADV7482: {reason}");
            process::exit(-1);
        }
    };
    if let Some(rev) = dev.revision()? {
        info!(target: "PROBE", "revision {rev}");
    }

    for (id, val) in &args.ctrl {
        if let Err(reason) = dev.set_ctrl(*id, *val) {
            warn!(target: "CTRL", "{reason}");
        }
    }
    if args.stream {
        dev.s_stream(true)?;
    }
    report(&dev)?;

    let snap = Snapshot::of(&chip);
    if let Some(path) = &args.dump {
        snap.to_file(path)?;
        println!("dumped register state to {}", path.display());
    }
    let delay_ms = dev.with_bus(|b| b.delay.total_ms);
    let xfers = chip.lock().xfers;
    println!("{xfers} transfers, {delay_ms} ms of delays, state {:08x}", snap.fingerprint()?);
    Ok(())
}
