//! End-to-end encoding against the bundled DBC layouts

use hkg_can_encoder::builders::create_lkas11;
use hkg_can_encoder::checksum::{lkas_crc8, LKAS11_CHECKSUM_BYTE};
use hkg_can_encoder::{
    AccCommand, CanFrame, DbcPacker, Encoder, EncoderConfig, EncoderError, HdaCommand,
    LkasCommand, MessagePacker, SignalFrame, VehicleId, HYUNDAI_KIA_GENERIC_DBC,
};

fn packer() -> DbcPacker {
    let _ = env_logger::builder().is_test(true).try_init();
    DbcPacker::from_dbc_str(HYUNDAI_KIA_GENERIC_DBC).unwrap()
}

fn encoder(config: EncoderConfig) -> Encoder<DbcPacker> {
    Encoder::new(packer(), config)
}

/// A stock frame with every signal at zero
fn stock_frame(message: &str) -> SignalFrame {
    let packer = packer();
    let layout = packer.message(message).unwrap();
    layout.signals.iter().map(|s| (s.name.as_str(), 0.into())).collect()
}

fn stock_lkas11() -> SignalFrame {
    stock_frame("LKAS11")
}

fn steer_50() -> LkasCommand {
    LkasCommand {
        apply_steer: 50,
        steer_req: true,
        ..Default::default()
    }
}

fn nibble_total(frame: &CanFrame) -> u32 {
    frame
        .data
        .iter()
        .map(|&b| u32::from(b >> 4) + u32::from(b & 0x0F))
        .sum()
}

#[test]
fn lkas11_crc8_end_to_end() {
    let encoder = encoder(EncoderConfig::new(VehicleId::SantaFe));
    let frame = encoder.lkas11(17, &steer_50(), &stock_lkas11()).unwrap();

    assert_eq!(frame.can_id, 832);
    assert_eq!(frame.bus, 0);
    // CF_Lkas_MsgCount lives in the high nibble of byte 4
    assert_eq!(frame.data[4] >> 4, 1);

    let mut zeroed = frame.data.clone();
    zeroed[LKAS11_CHECKSUM_BYTE] = 0;
    assert_eq!(frame.data[LKAS11_CHECKSUM_BYTE], lkas_crc8(&zeroed));

    assert_eq!(frame.data, vec![0x00, 0x00, 0x32, 0x0C, 0x10, 0x00, 0x3B, 0x00]);
}

#[test]
fn lkas11_sum_checksums() {
    let sorento = encoder(EncoderConfig::new(VehicleId::KiaSorento).with_ldws_opt(true));
    let frame = sorento.lkas11(17, &steer_50(), &stock_lkas11()).unwrap();
    // LdwsOpt_USM = 3 sets byte 7; the 6-byte sum ignores it
    assert_eq!(frame.data[7], 0x18);
    assert_eq!(frame.data[6], 0x32 + 0x0C + 0x10);

    let stinger = encoder(EncoderConfig::new(VehicleId::KiaStinger).with_ldws_opt(true));
    let frame = stinger.lkas11(17, &steer_50(), &stock_lkas11()).unwrap();
    assert_eq!(frame.data[6], 0x32 + 0x0C + 0x10 + 0x18);
}

#[test]
fn lkas11_routes_to_configured_bus() {
    let encoder = encoder(EncoderConfig::new(VehicleId::Sonata).with_lkas_bus(1));
    let frame = encoder.lkas11(0, &steer_50(), &stock_lkas11()).unwrap();
    assert_eq!(frame.bus, 1);
}

#[test]
fn lkas11_negative_torque() {
    let encoder = encoder(EncoderConfig::new(VehicleId::SantaFe));
    let cmd = LkasCommand {
        apply_steer: -384,
        ..steer_50()
    };
    let frame = encoder.lkas11(0, &cmd, &stock_lkas11()).unwrap();
    // raw = -384 + 1024 = 640 = 0x280
    assert_eq!(frame.data[2], 0x80);
    assert_eq!(frame.data[3] & 0x07, 0x02);
}

#[test]
fn lkas11_genesis_requires_stock_warning() {
    let encoder = encoder(EncoderConfig::new(VehicleId::Genesis));
    let previous = stock_lkas11().with("CF_Lkas_SysWarning", 5);
    let frame = encoder.lkas11(3, &steer_50(), &previous).unwrap();

    // SysWarning (bits 6..10) passes through, LdwsActivemode (bits 0..2) = 2
    let sys_warning = ((frame.data[0] >> 6) | ((frame.data[1] & 0x03) << 2)) & 0x0F;
    assert_eq!(sys_warning, 5);
    assert_eq!(frame.data[0] & 0x03, 2);
}

#[test]
fn lkas11_incomplete_snapshot_is_rejected() {
    let encoder = encoder(EncoderConfig::new(VehicleId::SantaFe));
    let err = encoder.lkas11(0, &steer_50(), &SignalFrame::new()).unwrap_err();
    assert!(matches!(err, EncoderError::MissingSignal { .. }));
}

#[test]
fn clu11_increments_stock_counter() {
    let encoder = encoder(EncoderConfig::new(VehicleId::Kona));
    let previous = stock_frame("CLU11").with("CF_Clu_AliveCnt1", 15);

    let frame = encoder.clu11(&previous, 1, 50.0).unwrap();

    assert_eq!(frame.can_id, 1265);
    assert_eq!(frame.data[0] & 0x07, 1);
    assert_eq!(frame.data[1], 100);
    assert_eq!(frame.data[3] >> 4, 0);
}

#[test]
fn lfahda_mfc_variants_pack() {
    let encoder = encoder(EncoderConfig::new(VehicleId::Palisade));

    let frame = encoder.lfahda_mfc(true, 1, 0).unwrap();
    assert_eq!(frame.can_id, 1157);
    assert_eq!(frame.data[3] & 0x03, 2);

    let cmd = HdaCommand {
        active: 2,
        acc_enabled: true,
        left_lane: true,
        right_lane: false,
    };
    let frame = encoder.hda_mfc(&cmd, &stock_frame("LFAHDA_MFC")).unwrap();
    // HDA_USM=2, HDA_Icon_State=2 at bit 3, chime bit 5, wheel bit 6, LdwSysState=1 at bit 7
    assert_eq!(frame.data[0], 0x02 | (2 << 3) | (1 << 5) | (1 << 6) | (1 << 7));
}

#[test]
fn mdps12_sum_covers_whole_frame() {
    let encoder = encoder(EncoderConfig::new(VehicleId::Kona));
    let previous = stock_frame("MDPS12").with("CF_Mdps_ToiActive", 1);

    let frame = encoder.mdps12(1000, &previous).unwrap();

    assert_eq!(frame.bus, 2);
    assert_eq!(frame.data[2], (1000 % 256) as u8);
    let mut zeroed = frame.data.clone();
    zeroed[3] = 0;
    let sum = zeroed.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    assert_eq!(frame.data[3], sum);
}

#[test]
fn acc_commands_without_radar_disable() {
    let encoder = encoder(EncoderConfig::new(VehicleId::Sonata));
    let cmd = AccCommand {
        enabled: true,
        accel: 0.5,
        set_speed: 90.0,
        gap_setting: 3,
        ..Default::default()
    };

    let frames = encoder.acc_commands(7, &cmd, None).unwrap();

    let ids: Vec<u32> = frames.iter().map(|f| f.can_id).collect();
    assert_eq!(ids, vec![1056, 1057]);
    assert_eq!(nibble_total(&frames[1]) % 16, 0);
}

#[test]
fn acc_commands_with_radar_disable() {
    let encoder = encoder(EncoderConfig::new(VehicleId::Sonata).with_radar_disable(true));
    let cmd = AccCommand {
        lead_visible: true,
        lead_dist: 45.0,
        ..Default::default()
    };

    let frames = encoder.acc_commands(5, &cmd, None).unwrap();

    let ids: Vec<u32> = frames.iter().map(|f| f.can_id).collect();
    assert_eq!(ids, vec![1056, 1057, 905, 909]);

    // SCC12 ACCMode (bits 13..16) reports 4 while disengaged
    assert_eq!((frames[1].data[1] >> 5) & 0x07, 4);
    assert_eq!(nibble_total(&frames[1]) % 16, 0);

    // SCC14 ObjGap bucket 3, ACCMode 4
    assert_eq!(frames[2].data[7], 3);
    assert_eq!(frames[2].data[4] & 0x07, 4);

    // FCA11: CR_FCA_Alive = (1 << 2) | 1, Supplemental_Counter = 5
    assert_eq!(frames[3].data[6], 0x55);
    assert_eq!(nibble_total(&frames[3]) % 16, 0);
}

#[test]
fn acc_commands_fill_full_layouts() {
    let packer = packer();
    for message in ["SCC11", "SCC12", "SCC13", "FCA11"] {
        // the bundled layouts carry the idle VSM/AEB fields as well
        assert!(packer.message(message).unwrap().signals.len() > 3, "{}", message);
    }
    assert!(packer.message("SCC11").unwrap().signal("SCCInfoDisplay").is_some());

    let encoder = Encoder::new(packer, EncoderConfig::new(VehicleId::Sonata).with_radar_disable(true));
    let frames = encoder.acc_commands(0, &AccCommand::default(), None).unwrap();
    assert_eq!(frames.len(), 4);
    // SCCInfoDisplay (bits 1..4) idles at 0, MainMode_ACC is on
    assert_eq!(frames[0].data[0] & 0x0F, 0x01);
    // SCC12 VSM requests stay off
    assert_eq!(frames[1].data[0], 0);

    let frames = encoder.acc_opt().unwrap();
    assert_eq!(frames[0].data, vec![0x0A, 0x40, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn acc_commands_scc14_when_equipped() {
    let encoder = encoder(EncoderConfig::new(VehicleId::Sonata).with_scc14(true));
    let frames = encoder.acc_commands(0, &AccCommand::default(), None).unwrap();
    let ids: Vec<u32> = frames.iter().map(|f| f.can_id).collect();
    assert_eq!(ids, vec![1056, 1057, 905]);
}

#[test]
fn acc_commands_reuse_previous_scc12() {
    let encoder = encoder(EncoderConfig::new(VehicleId::Sonata));
    let previous = stock_frame("SCC12").with("CR_VSM_ChkSum", 9);

    let frames = encoder.acc_commands(1, &AccCommand::default(), Some(&previous)).unwrap();
    assert_eq!(nibble_total(&frames[1]) % 16, 0);

    // Stock VSM state in the previous frame passes through
    let warned = previous.clone().with("CF_VSM_Warn", 2);
    let frames = encoder.acc_commands(1, &AccCommand::default(), Some(&warned)).unwrap();
    assert_eq!((frames[1].data[0] >> 4) & 0x03, 2);

    // A snapshot carrying an LKAS11 signal does not describe SCC12
    let previous = previous.with("CF_Lkas_Chksum", 1);
    let err = encoder
        .acc_commands(1, &AccCommand::default(), Some(&previous))
        .unwrap_err();
    assert!(matches!(err, EncoderError::SignalNotFound { .. }));
}

#[test]
fn acc_option_frames() {
    let plain = encoder(EncoderConfig::new(VehicleId::Sonata));
    let frames = plain.acc_opt().unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].can_id, 1290);
    assert_eq!(frames[0].data, vec![0x0A, 0x40, 0, 0, 0, 0, 0, 0]);

    let radar_off = encoder(EncoderConfig::new(VehicleId::Sonata).with_radar_disable(true));
    let frames = radar_off.acc_opt().unwrap();
    let ids: Vec<u32> = frames.iter().map(|f| f.can_id).collect();
    assert_eq!(ids, vec![1290, 1155]);
    assert_eq!(frames[1].data[0], 0x11);
}

#[test]
fn front_radar_presence() {
    let frame = encoder(EncoderConfig::new(VehicleId::Sonata)).frt_radar_opt().unwrap();
    assert_eq!(frame.can_id, 1186);
    assert_eq!(frame.data, vec![0x01, 0x00]);
}

#[test]
fn packer_is_shared_across_threads() {
    let packer = packer();
    let config = EncoderConfig::new(VehicleId::SantaFe);
    let lkas = stock_lkas11();

    let frames: Vec<CanFrame> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4u64)
            .map(|i| {
                let (packer, config, lkas) = (&packer, &config, &lkas);
                scope.spawn(move || create_lkas11(packer, config, i, &steer_50(), lkas).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, frame) in frames.iter().enumerate() {
        assert_eq!(u64::from(frame.data[4] >> 4), i as u64);
    }
    // The packer is untouched by concurrent use
    let radar = SignalFrame::new().with("CF_FCA_Equip_Front_Radar", 1);
    assert!(packer.pack("FRT_RADAR11", 0, &radar).is_ok());
}
