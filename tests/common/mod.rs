use std::fs;
use std::path::{Path, PathBuf};

/// Short text DataFlash log: two GPS fixes 0.001 deg apart, an AHR2
/// altitude trace and two mode changes
pub const SAMPLE_LOG: &str = "\
FMT, 128, 89, FMT, BBnNZ, Type,Length,Name,Format,Columns
FMT, 172, 23, FMTU, QBNN, TimeUS,FmtType,UnitIds,MultIds
FMT, 130, 45, GPS, QBffff, TimeUS,Status,Lat,Lng,Alt,Spd
FMT, 163, 40, AHR2, Qccfff, TimeUS,Roll,Pitch,Yaw,Alt,Lat
FMT, 144, 17, MODE, QMBB, TimeUS,Mode,ModeNum,Rsn
FMT, 147, 21, BAT, QBff, TimeUS,Inst,Volt,Curr
FMT, 91, 64, MSG, QZ, TimeUS,Message
MSG, 900000, ArduPlane V4.5.1 (5fb45b8f)
FMTU, 1000000, 130, -----, -----
GPS, 2000000, 3, 0.0, 0.0, 10.0, 3.0
AHR2, 2100000, 1, 2, 90, 15.5, 0.0
MODE, 2200000, 17, 17, 1
BAT, 2300000, 0, 12.6, 4.2
GPS, 3000000, 3, 0.0, 0.001, 12.0, 5.0
AHR2, 3100000, 1, 2, 90, 22.25, 0.0
MODE, 3200000, 10, 10, 1
BAT, 3500000, 0, 12.4, 4.5
";

pub fn write_sample_log(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, SAMPLE_LOG).expect("Failed to write sample log");
    path
}
