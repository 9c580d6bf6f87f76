//! Flight configuration values and their parameter table.
//!
//! Every tunable lives in a `Cell` inside [`FlightConfig`]; the parameter
//! table borrows those cells, so the console, the MAVLink link and the flash
//! store all read and write the same memory. Table order is the listing
//! order seen by ground stations.
//!
//! Names are at most 16 characters so they fit a PARAM_VALUE id.

use core::cell::Cell;

use param_core::{ParamDescriptor, IDENTITY_RC_MAP, MAX_BOXES, RC_CHANNEL_COUNT};

/// Optional features, bit `i` of the feature mask is entry `i`.
pub const FEATURE_NAMES: &[&str] = &[
    "PPM",
    "VBAT",
    "INFLIGHT_ACC_CAL",
    "SPEKTRUM",
    "GRAUPNERSUMH",
    "MOTOR_STOP",
    "SERVO_TILT",
    "LED",
    "GPS",
    "FAILSAFE",
    "SONAR",
    "PASS",
    "LCD",
];

/// Selectable mixer geometries.
pub const MIXER_NAMES: &[&str] = &[
    "TRI",
    "QUADP",
    "QUADX",
    "BI",
    "GIMBAL",
    "Y6",
    "HEX6",
    "FLYING_WING",
    "Y4",
    "HEX6X",
    "OCTOX8",
    "OCTOFLATP",
    "OCTOFLATX",
    "AIRPLANE",
    "HELI_120_CCPM",
    "HELI_90_DEG",
    "VTAIL4",
    "CUSTOM",
];

/// Flight mode boxes that aux switches can activate, in `auxset` id order.
pub const BOX_NAMES: &[&str] = &[
    "ANGLE",
    "HORIZON",
    "BARO",
    "MAG",
    "CAMSTAB",
    "CAMTRIG",
    "ARM",
    "GPS HOME",
    "GPS HOLD",
    "PASSTHRU",
    "HEADFREE",
    "BEEPER",
    "LEDMAX",
    "LLIGHTS",
    "HEADADJ",
];

/// Number of entries in [`BOX_NAMES`].
pub const BOX_COUNT: usize = BOX_NAMES.len();

const _: () = assert!(BOX_COUNT <= MAX_BOXES, "more boxes than a record holds");

/// Feature mask after a reset to defaults: `VBAT`.
pub const DEFAULT_FEATURES: u32 = 1 << 1;

/// Mixer after a reset to defaults: `QUADX`.
pub const DEFAULT_MIXER: u8 = 2;

/// Declares the configuration struct, its defaults and the parameter table
/// from one list. Each entry is
/// `name: constructor(type) = default, min, max [, displayable];`.
macro_rules! flight_config {
    ($( $name:ident: $ctor:ident($ty:ty) = $default:expr, $min:expr, $max:expr $(, $flag:ident)?; )+) => {
        /// Every configurable value of the flight controller.
        #[allow(non_snake_case)]
        pub struct FlightConfig {
            $( pub $name: Cell<$ty>, )+
            pub features: Cell<u32>,
            pub mixer: Cell<u8>,
            pub rc_map: Cell<[u8; RC_CHANNEL_COUNT]>,
            pub activate: [Cell<u32>; BOX_COUNT],
        }

        /// Number of entries in [`FlightConfig::params`].
        pub const PARAM_COUNT: usize = [$( stringify!($name) ),+].len();

        $(
            const _: () = assert!(
                stringify!($name).len() <= param_core::PARAM_ID_LEN,
                "parameter name longer than a PARAM_VALUE id"
            );
        )+

        impl FlightConfig {
            /// Configuration holding the built-in defaults.
            #[must_use]
            pub const fn new() -> Self {
                Self {
                    $( $name: Cell::new($default), )+
                    features: Cell::new(DEFAULT_FEATURES),
                    mixer: Cell::new(DEFAULT_MIXER),
                    rc_map: Cell::new(IDENTITY_RC_MAP),
                    activate: [const { Cell::new(0) }; BOX_COUNT],
                }
            }

            /// Restore every value and the settings outside the table to
            /// defaults.
            pub fn load_defaults(&self) {
                $( self.$name.set($default); )+
                self.features.set(DEFAULT_FEATURES);
                self.mixer.set(DEFAULT_MIXER);
                self.rc_map.set(IDENTITY_RC_MAP);
                for cell in &self.activate {
                    cell.set(0);
                }
            }

            /// Parameter table over this configuration, in listing order.
            #[must_use]
            pub fn params(&self) -> [ParamDescriptor<'_>; PARAM_COUNT] {
                [
                    $( ParamDescriptor::$ctor(stringify!($name), &self.$name, $min, $max) $( .$flag() )?, )+
                ]
            }
        }
    };
}

flight_config! {
    rc_db: uint8(u8) = 0, 0, 32, displayable;
    rc_dbyw: uint8(u8) = 0, 0, 100, displayable;
    rc_dbah: uint8(u8) = 20, 1, 100, displayable;
    rc_dbgps: uint8(u8) = 5, 0, 100, displayable;
    devorssi: uint8(u8) = 0, 0, 1;
    rssicut: uint8(u8) = 0, 0, 80;
    rc_mid: uint16(u16) = 1500, 1200, 1700, displayable;
    rc_auxch: uint8(u8) = 4, 4, 10;
    rc_rate: uint8(u8) = 90, 0, 250, displayable;
    rc_expo: uint8(u8) = 65, 0, 100, displayable;
    thr_mid: uint8(u8) = 50, 0, 100, displayable;
    thr_expo: uint8(u8) = 0, 0, 250, displayable;
    roll_pitch_rate: uint8(u8) = 0, 0, 100, displayable;
    yawrate: uint8(u8) = 0, 0, 100, displayable;
    esc_min: uint16(u16) = 1150, 0, 2000;
    esc_max: uint16(u16) = 1950, 0, 2000;
    esc_nfly: uint16(u16) = 1300, 0, 2000, displayable;
    esc_moff: uint16(u16) = 1000, 0, 2000;
    esc_pwm: uint16(u16) = 400, 50, 498;
    srv_pwm: uint16(u16) = 50, 50, 498;
    pass_mot: uint8(u8) = 0, 0, 10;
    rc_min: uint16(u16) = 1020, 0, 2000;
    rc_max: uint16(u16) = 2000, 0, 2000;
    rc_rllrm: uint8(u8) = 0, 0, 1;
    rc_killt: uint16(u16) = 0, 0, 10000, displayable;
    fs_delay: uint8(u8) = 10, 0, 40, displayable;
    fs_ofdel: uint8(u8) = 200, 0, 200, displayable;
    fs_rcthr: uint16(u16) = 1200, 1000, 2000, displayable;
    fs_ddplt: uint8(u8) = 0, 0, 250, displayable;
    fs_jstph: uint8(u8) = 0, 0, 1, displayable;
    fs_nosnr: uint8(u8) = 0, 0, 1, displayable;
    serial_baudrate: uint32(u32) = 115_200, 1200, 115_200;
    tele_prot: uint8(u8) = 0, 0, 3, displayable;
    spektrum_hires: uint8(u8) = 0, 0, 1;
    vbatscale: uint8(u8) = 110, 10, 200;
    vbatmaxcellvolt: uint8(u8) = 43, 10, 50;
    vbatmincellvolt: uint8(u8) = 33, 10, 50;
    power_adc_chan: uint8(u8) = 0, 0, 9;
    tri_ydir: int8(i8) = 1, -1, 1;
    tri_ymid: uint16(u16) = 1500, 0, 2000, displayable;
    tri_ymin: uint16(u16) = 1020, 0, 2000, displayable;
    tri_ymax: uint16(u16) = 2000, 0, 2000, displayable;
    tri_ydel: uint16(u16) = 0, 0, 1000, displayable;
    wing_left_min: uint16(u16) = 1020, 0, 2000;
    wing_left_mid: uint16(u16) = 1500, 0, 2000;
    wing_left_max: uint16(u16) = 2000, 0, 2000;
    wing_right_min: uint16(u16) = 1020, 0, 2000;
    wing_right_mid: uint16(u16) = 1500, 0, 2000;
    wing_right_max: uint16(u16) = 2000, 0, 2000;
    pitch_dir_l: int8(i8) = 1, -1, 1;
    pitch_dir_r: int8(i8) = -1, -1, 1;
    roll_direction_l: int8(i8) = 1, -1, 1;
    roll_direction_r: int8(i8) = 1, -1, 1;
    gbl_flg: uint8(u8) = 0, 0, 255;
    gbl_pgn: int8(i8) = 10, -100, 100;
    gbl_rgn: int8(i8) = 10, -100, 100;
    gbl_pmn: uint16(u16) = 1020, 100, 3000;
    gbl_pmx: uint16(u16) = 2000, 100, 3000;
    gbl_pmd: uint16(u16) = 1500, 100, 3000;
    gbl_rmn: uint16(u16) = 1020, 100, 3000;
    gbl_rmx: uint16(u16) = 2000, 100, 3000;
    gbl_rmd: uint16(u16) = 1500, 100, 3000;
    al_barolr: uint8(u8) = 50, 10, 200, displayable;
    al_snrlr: uint8(u8) = 50, 10, 200, displayable;
    al_debounce: uint8(u8) = 5, 0, 20, displayable;
    al_tobaro: uint16(u16) = 2000, 100, 5000, displayable;
    al_tosnr: uint16(u16) = 1000, 100, 5000, displayable;
    as_lnchr: uint8(u8) = 200, 50, 250, displayable;
    as_clmbr: uint8(u8) = 100, 50, 250, displayable;
    as_trgt: uint8(u8) = 10, 0, 15, displayable;
    as_stdev: uint8(u8) = 10, 5, 20, displayable;
    align_gyro_x: int8(i8) = 0, -3, 3;
    align_gyro_y: int8(i8) = 0, -3, 3;
    align_gyro_z: int8(i8) = 0, -3, 3;
    align_acc_x: int8(i8) = 0, -3, 3;
    align_acc_y: int8(i8) = 0, -3, 3;
    align_acc_z: int8(i8) = 0, -3, 3;
    align_mag_x: int8(i8) = 0, -3, 3;
    align_mag_y: int8(i8) = 0, -3, 3;
    align_mag_z: int8(i8) = 0, -3, 3;
    acc_hdw: uint8(u8) = 0, 0, 3;
    acc_lpf: uint8(u8) = 100, 1, 250, displayable;
    acc_ilpf: uint8(u8) = 8, 1, 250, displayable;
    acc_trim_pitch: int16(i16) = 0, -300, 300, displayable;
    acc_trim_roll: int16(i16) = 0, -300, 300, displayable;
    gy_lpf: uint16(u16) = 42, 0, 256;
    gy_cmpf: uint16(u16) = 400, 10, 2000, displayable;
    gy_cmpfm: uint16(u16) = 200, 10, 2000, displayable;
    gy_smrll: uint8(u8) = 0, 0, 200, displayable;
    gy_smptc: uint8(u8) = 0, 0, 200, displayable;
    gy_smyw: uint8(u8) = 0, 0, 200, displayable;
    gy_stdev: uint8(u8) = 5, 5, 100;
    accz_vcf: float32(f32) = 0.985, 0.0, 1.0, displayable;
    accz_acf: float32(f32) = 0.96, 0.0, 1.0, displayable;
    bar_lag: float32(f32) = 0.3, 0.0, 10.0, displayable;
    bar_dscl: float32(f32) = 0.7, 0.0, 1.0, displayable;
    bar_dbg: uint8(u8) = 0, 0, 1;
    mag_dec: int16(i16) = 0, -18000, 18000, displayable;
    mag_time: uint8(u8) = 1, 1, 6, displayable;
    mag_gain: uint8(u8) = 0, 0, 1, displayable;
    gps_baudrate: uint32(u32) = 115_200, 1200, 115_200;
    gps_type: uint8(u8) = 1, 0, 9;
    gps_ins_vel: float32(f32) = 0.6, 0.0, 1.0, displayable;
    gps_ins_mdl: uint8(u8) = 2, 1, 2, displayable;
    gps_lag: uint16(u16) = 2000, 0, 10000, displayable;
    gps_phase: int8(i8) = 0, -30, 30, displayable;
    gps_ph_minsat: uint8(u8) = 6, 5, 10, displayable;
    gps_ph_settlespd: uint8(u8) = 10, 1, 200, displayable;
    gps_maxangle: uint8(u8) = 25, 10, 45, displayable;
    gps_ph_brkmaxang: uint8(u8) = 15, 1, 45, displayable;
    gps_ph_minbrkpct: uint8(u8) = 50, 1, 99, displayable;
    gps_ph_brkacc: uint16(u16) = 40, 1, 500, displayable;
    gps_ph_abstub: uint16(u16) = 150, 0, 1000, displayable;
    gps_wp_radius: uint16(u16) = 200, 0, 2000, displayable;
    rtl_mnh: uint8(u8) = 20, 0, 200, displayable;
    rtl_cr: uint8(u8) = 80, 10, 200, displayable;
    rtl_mnd: uint8(u8) = 10, 0, 50, displayable;
    gps_rtl_flyaway: uint8(u8) = 0, 0, 100, displayable;
    gps_yaw: uint8(u8) = 30, 20, 150, displayable;
    nav_rtl_lastturn: uint8(u8) = 0, 0, 1, displayable;
    nav_speed_min: uint8(u8) = 100, 10, 200, displayable;
    nav_speed_max: uint16(u16) = 300, 50, 2000, displayable;
    nav_approachdiv: uint8(u8) = 3, 2, 10, displayable;
    nav_tiltcomp: uint8(u8) = 20, 0, 100, displayable;
    nav_ctrkgain: float32(f32) = 0.5, 0.0, 10.0, displayable;
    nav_slew_rate: uint8(u8) = 30, 0, 200, displayable;
    nav_ctrl_heading: uint8(u8) = 1, 0, 1, displayable;
    nav_tail_first: uint8(u8) = 0, 0, 1, displayable;
    floppy_mode: uint8(u8) = 0, 0, 1, displayable;
    stat_clear: uint8(u8) = 0, 0, 1, displayable;
    gps_pos_p: uint8(u8) = 11, 0, 200, displayable;
    gps_pos_i: uint8(u8) = 0, 0, 200;
    gps_pos_d: uint8(u8) = 0, 0, 200;
    gps_posr_p: uint8(u8) = 20, 0, 200, displayable;
    gps_posr_i: uint8(u8) = 8, 0, 200, displayable;
    gps_posr_d: uint8(u8) = 45, 0, 200, displayable;
    gps_nav_p: uint8(u8) = 14, 0, 200, displayable;
    gps_nav_i: uint8(u8) = 20, 0, 200, displayable;
    gps_nav_d: uint8(u8) = 80, 0, 200, displayable;
    looptime: uint16(u16) = 3000, 0, 9000, displayable;
    mainpidctrl: uint8(u8) = 0, 0, 1, displayable;
    mainpt1cut: uint8(u8) = 12, 0, 50, displayable;
    newpidimax: uint16(u16) = 10000, 10, 65000, displayable;
    gpspt1cut: uint8(u8) = 10, 1, 50, displayable;
    p_pitch: uint8(u8) = 40, 0, 200, displayable;
    i_pitch: uint8(u8) = 30, 0, 200, displayable;
    d_pitch: uint8(u8) = 23, 0, 200, displayable;
    p_roll: uint8(u8) = 40, 0, 200, displayable;
    i_roll: uint8(u8) = 30, 0, 200, displayable;
    d_roll: uint8(u8) = 23, 0, 200, displayable;
    p_yaw: uint8(u8) = 85, 0, 200, displayable;
    i_yaw: uint8(u8) = 45, 0, 200, displayable;
    d_yaw: uint8(u8) = 0, 0, 200, displayable;
    p_alt: uint8(u8) = 50, 0, 200, displayable;
    i_alt: uint8(u8) = 20, 0, 200, displayable;
    d_alt: uint8(u8) = 30, 0, 200, displayable;
    p_level: uint8(u8) = 90, 0, 200, displayable;
    i_level: uint8(u8) = 10, 0, 200, displayable;
    d_level: uint8(u8) = 100, 0, 200, displayable;
    snr_type: uint8(u8) = 0, 0, 4;
    snr_min: uint8(u8) = 25, 10, 200, displayable;
    snr_max: uint16(u16) = 400, 50, 700, displayable;
    snr_dbg: uint8(u8) = 0, 0, 1;
    snr_tilt: uint8(u8) = 25, 10, 50, displayable;
    snr_cf: float32(f32) = 0.6, 0.0, 1.0, displayable;
    snr_diff: uint8(u8) = 50, 0, 200, displayable;
    snr_land: uint8(u8) = 0, 0, 1, displayable;
    LED_invert: uint8(u8) = 0, 0, 1;
    LED_Type: uint8(u8) = 0, 0, 3;
    LED_pinout: uint8(u8) = 0, 0, 1;
    LED_CtrlChannel: uint8(u8) = 6, 1, 12;
    LED_ARMED: uint8(u8) = 0, 0, 1, displayable;
    LED_Toggle_Dly1: uint8(u8) = 8, 0, 255;
    LED_Toggle_Dly2: uint8(u8) = 4, 0, 255;
    LED_Toggle_Dly3: uint8(u8) = 2, 0, 255;
    LED_Pattern1: uint32(u32) = 1, 0, 0x7FFF_FFFF;
    LED_Pattern2: uint32(u32) = 0x5555_5555, 0, 0x7FFF_FFFF;
    LED_Pattern3: uint32(u32) = 0x0F0F_0F0F, 0, 0x7FFF_FFFF;
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self::new()
    }
}
