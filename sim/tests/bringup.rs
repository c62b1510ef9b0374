use adv7482_core::Adv7482;
use adv7482_core::bus::BankedBus;
use adv7482_core::bus::bank::Bank;
use adv7482_core::config::DriverConfig;
use adv7482_core::error::{BusError, Error};
use adv7482_core::link::{InputPath, LinkConfig, VirtualChannel};
use adv7482_core::script::{run_script, RegisterOp};
use adv7482_core::script::tables::*;
use adv7482_core::sequencer::{InitState, Revision};
use adv7482_sim::{EmulatedChip, SimDelay, Snapshot};

fn both_paths() -> DriverConfig {
    DriverConfig {
        link: LinkConfig { sdp_enabled: true, ..Default::default() },
        ..Default::default()
    }
}

#[test]
fn probe_binds_every_bank() {
    let (dev, chip) = adv7482_sim::probe(DriverConfig::default()).unwrap();
    assert_eq!(dev.init_state(), Ok(InitState::PoweredDown));
    assert_eq!(dev.revision(), Ok(Some(Revision(0x01, 0x20))));

    let st = chip.lock();
    for bank in [Bank::Dpll, Bank::Cp, Bank::Hdmi, Bank::Sdp, Bank::Txa, Bank::Txb] {
        assert_eq!(st.addr[bank as usize], Some(bank.default_addr()), "{bank}");
    }
    // EDID landed in its own bank.
    assert_eq!(st.peek(Bank::Edid, 0x00), 0x00);
    assert_eq!(st.peek(Bank::Edid, 0x01), 0xFF);
    // HDMI only: TXA stays powered down.
    assert_eq!(st.peek(Bank::Txa, 0x1E), 0x00);
}

#[test]
fn probe_without_soft_reset_skips_revision() {
    let link = LinkConfig { sw_reset: false, ..Default::default() };
    let (dev, chip) = adv7482_sim::probe(DriverConfig { link, ..Default::default() }).unwrap();
    assert_eq!(dev.revision(), Ok(None));
    assert_ne!(chip.lock().writes()[0], (0x70, 0xFF, 0xFF));
}

#[test]
fn both_paths_enable_both_transmitters() {
    let (_dev, chip) = adv7482_sim::probe(both_paths()).unwrap();
    let st = chip.lock();
    assert_eq!(st.peek(Bank::Io, 0x10), 0xE0);
    assert_eq!(st.peek(Bank::Io, 0x00), 0x40);
}

#[test]
fn virtual_channel_on_both_transmitters() {
    let link = LinkConfig { vc: VirtualChannel::new(2).unwrap(), ..Default::default() };
    let (_dev, chip) = adv7482_sim::probe(DriverConfig { link, ..Default::default() }).unwrap();
    let st = chip.lock();
    assert_eq!(st.peek(Bank::Txa, 0x0D), 0x80);
    assert_eq!(st.peek(Bank::Txb, 0x0D), 0x80);
}

#[test]
fn color_bars_when_configured() {
    let cfg = DriverConfig { color_bars: true, ..both_paths() };
    let (_dev, chip) = adv7482_sim::probe(cfg).unwrap();
    let st = chip.lock();
    assert_eq!(st.peek(Bank::Cp, 0x37), 0x81);
    assert_eq!((st.peek(Bank::Sdp, 0x0C), st.peek(Bank::Sdp, 0x14)), (0x01, 0x01));
}

#[test]
fn failed_transfer_stops_the_script() {
    let chip = EmulatedChip::new(0x70);
    // Soft reset (3 writes), revision (2 reads), then 20 transfers into remapping and init.
    chip.fail_in(25);
    let res = Adv7482::probe(chip.clone(), SimDelay::default(), DriverConfig::default());
    match res {
        Err(Error::Script { source: BusError::Nack { .. }, .. }) => {},
        Err(e) => panic!("unexpected error {e}"),
        Ok(_) => panic!("probe succeeded"),
    }
    let st = chip.lock();
    assert_eq!(st.xfers, 26);
    assert_eq!(st.log.len(), 25);
}

#[test]
fn byte_data_is_required() {
    let chip = EmulatedChip::new(0x70).without_byte_data();
    let res = Adv7482::probe(chip.clone(), SimDelay::default(), DriverConfig::default());
    assert!(matches!(res, Err(Error::Bus(BusError::Unsupported))));
    assert!(chip.lock().log.is_empty());
}

#[test]
fn wrong_io_address_fails_probe() {
    let chip = EmulatedChip::new(0x72);
    let res = Adv7482::probe(chip, SimDelay::default(), DriverConfig::default());
    assert!(matches!(res, Err(Error::Script { offset: 0, .. })));
}

#[test]
fn replay_is_idempotent() {
    let scripts: [(&str, &[RegisterOp]); 3] = [
        ("sw_reset", &SW_RESET[..]),
        ("set_slave_address", &SET_SLAVE_ADDRESS[..]),
        ("init", InputPath::Hdmi.init_script()),
    ];
    let once = EmulatedChip::new(0x70);
    let mut bus = BankedBus::new(once.clone(), SimDelay::default(), 0x70);
    for (name, s) in scripts {
        run_script(&mut bus, name, s).unwrap();
    }

    let twice = EmulatedChip::new(0x70);
    let mut bus = BankedBus::new(twice.clone(), SimDelay::default(), 0x70);
    for (name, s) in scripts {
        run_script(&mut bus, name, s).unwrap();
    }
    run_script(&mut bus, "init", InputPath::Hdmi.init_script()).unwrap();

    assert_eq!(
        Snapshot::of(&once).fingerprint().unwrap(),
        Snapshot::of(&twice).fingerprint().unwrap(),
    );
}

#[test]
fn probe_is_deterministic() {
    let (_a, chip_a) = adv7482_sim::probe(both_paths()).unwrap();
    let (_b, chip_b) = adv7482_sim::probe(both_paths()).unwrap();
    assert_eq!(Snapshot::of(&chip_a), Snapshot::of(&chip_b));
    assert_eq!(chip_a.lock().log.len(), chip_b.lock().log.len());
}

#[test]
fn probe_waits_for_reset_and_pll() {
    let (dev, _chip) = adv7482_sim::probe(DriverConfig::default()).unwrap();
    // 5 ms after reset; 2+1+1 ms in the transmitter bring-up.
    assert_eq!(dev.with_bus(|b| b.delay.total_ms), 9);
}
