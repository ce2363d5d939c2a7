use bytes::{Buf, BufMut};
use serde::Serialize;

use crate::error::{ProtoError, Result};

const SET_ZOOM_LEVEL: u32 = 1;
const SET_COLOR_SCHEME: u32 = 2;
const SET_AIR_TEMP: u32 = 3;
const SET_DISTANCE: u32 = 4;
const SET_AGC_MODE: u32 = 5;
const SET_AIR_PRESSURE: u32 = 6;
const SET_AIR_HUMIDITY: u32 = 7;
const SET_POWDER_TEMP: u32 = 8;
const SET_WIND: u32 = 9;
const SET_ZEROING: u32 = 10;
const SET_COMPASS_OFFSET: u32 = 11;
const BUTTON_PRESS: u32 = 12;
const TRIGGER_CMD: u32 = 13;
const GET_DEV_STATUS: u32 = 14;
const GET_PROFILE: u32 = 15;

/// A decoded host command.
///
/// The set is closed: discriminants outside the schema decode to
/// [`Command::Unknown`], carrying the raw id, so downstream classification
/// is total without a catch-all branch in the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Command {
    SetZoomLevel { level: i32 },
    SetColorScheme { scheme: i32 },
    SetAirTemp { temperature: i32 },
    SetDistance { distance: i32 },
    SetAgcMode { mode: i32 },
    SetAirPressure { pressure: i32 },
    SetAirHumidity { humidity: i32 },
    SetPowderTemp { temperature: i32 },
    SetWind { direction: i32, speed: i32 },
    SetZeroing { x: i32, y: i32 },
    SetCompassOffset { offset: i32 },
    ButtonPress { button: i32 },
    TriggerCmd { cmd: i32 },
    GetDevStatus,
    GetProfile,
    Unknown { id: u32 },
}

impl Command {
    /// Wire discriminant for this command.
    pub fn id(&self) -> u32 {
        match self {
            Command::SetZoomLevel { .. } => SET_ZOOM_LEVEL,
            Command::SetColorScheme { .. } => SET_COLOR_SCHEME,
            Command::SetAirTemp { .. } => SET_AIR_TEMP,
            Command::SetDistance { .. } => SET_DISTANCE,
            Command::SetAgcMode { .. } => SET_AGC_MODE,
            Command::SetAirPressure { .. } => SET_AIR_PRESSURE,
            Command::SetAirHumidity { .. } => SET_AIR_HUMIDITY,
            Command::SetPowderTemp { .. } => SET_POWDER_TEMP,
            Command::SetWind { .. } => SET_WIND,
            Command::SetZeroing { .. } => SET_ZEROING,
            Command::SetCompassOffset { .. } => SET_COMPASS_OFFSET,
            Command::ButtonPress { .. } => BUTTON_PRESS,
            Command::TriggerCmd { .. } => TRIGGER_CMD,
            Command::GetDevStatus => GET_DEV_STATUS,
            Command::GetProfile => GET_PROFILE,
            Command::Unknown { id } => *id,
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::SetZoomLevel { .. } => "set-zoom-level",
            Command::SetColorScheme { .. } => "set-color-scheme",
            Command::SetAirTemp { .. } => "set-air-temp",
            Command::SetDistance { .. } => "set-distance",
            Command::SetAgcMode { .. } => "set-agc-mode",
            Command::SetAirPressure { .. } => "set-air-pressure",
            Command::SetAirHumidity { .. } => "set-air-humidity",
            Command::SetPowderTemp { .. } => "set-powder-temp",
            Command::SetWind { .. } => "set-wind",
            Command::SetZeroing { .. } => "set-zeroing",
            Command::SetCompassOffset { .. } => "set-compass-offset",
            Command::ButtonPress { .. } => "button-press",
            Command::TriggerCmd { .. } => "trigger-cmd",
            Command::GetDevStatus => "get-dev-status",
            Command::GetProfile => "get-profile",
            Command::Unknown { .. } => "unknown",
        }
    }

    /// Encode this command as a flat little-endian record.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(16);
        buf.put_u32_le(self.id());
        match self {
            Command::SetZoomLevel { level } => buf.put_i32_le(*level),
            Command::SetColorScheme { scheme } => buf.put_i32_le(*scheme),
            Command::SetAirTemp { temperature } => buf.put_i32_le(*temperature),
            Command::SetDistance { distance } => buf.put_i32_le(*distance),
            Command::SetAgcMode { mode } => buf.put_i32_le(*mode),
            Command::SetAirPressure { pressure } => buf.put_i32_le(*pressure),
            Command::SetAirHumidity { humidity } => buf.put_i32_le(*humidity),
            Command::SetPowderTemp { temperature } => buf.put_i32_le(*temperature),
            Command::SetWind { direction, speed } => {
                buf.put_i32_le(*direction);
                buf.put_i32_le(*speed);
            }
            Command::SetZeroing { x, y } => {
                buf.put_i32_le(*x);
                buf.put_i32_le(*y);
            }
            Command::SetCompassOffset { offset } => buf.put_i32_le(*offset),
            Command::ButtonPress { button } => buf.put_i32_le(*button),
            Command::TriggerCmd { cmd } => buf.put_i32_le(*cmd),
            Command::GetDevStatus | Command::GetProfile | Command::Unknown { .. } => {}
        }
        buf
    }

    /// Decode a command record.
    ///
    /// Total over the discriminant: unrecognized ids yield
    /// [`Command::Unknown`]. Truncated field data is an error and the
    /// record must be dropped.
    pub fn decode(mut buf: &[u8]) -> Result<Command> {
        let id = get_u32(&mut buf)?;
        let command = match id {
            SET_ZOOM_LEVEL => Command::SetZoomLevel {
                level: get_i32(&mut buf)?,
            },
            SET_COLOR_SCHEME => Command::SetColorScheme {
                scheme: get_i32(&mut buf)?,
            },
            SET_AIR_TEMP => Command::SetAirTemp {
                temperature: get_i32(&mut buf)?,
            },
            SET_DISTANCE => Command::SetDistance {
                distance: get_i32(&mut buf)?,
            },
            SET_AGC_MODE => Command::SetAgcMode {
                mode: get_i32(&mut buf)?,
            },
            SET_AIR_PRESSURE => Command::SetAirPressure {
                pressure: get_i32(&mut buf)?,
            },
            SET_AIR_HUMIDITY => Command::SetAirHumidity {
                humidity: get_i32(&mut buf)?,
            },
            SET_POWDER_TEMP => Command::SetPowderTemp {
                temperature: get_i32(&mut buf)?,
            },
            SET_WIND => Command::SetWind {
                direction: get_i32(&mut buf)?,
                speed: get_i32(&mut buf)?,
            },
            SET_ZEROING => Command::SetZeroing {
                x: get_i32(&mut buf)?,
                y: get_i32(&mut buf)?,
            },
            SET_COMPASS_OFFSET => Command::SetCompassOffset {
                offset: get_i32(&mut buf)?,
            },
            BUTTON_PRESS => Command::ButtonPress {
                button: get_i32(&mut buf)?,
            },
            TRIGGER_CMD => Command::TriggerCmd {
                cmd: get_i32(&mut buf)?,
            },
            GET_DEV_STATUS => Command::GetDevStatus,
            GET_PROFILE => Command::GetProfile,
            other => Command::Unknown { id: other },
        };
        Ok(command)
    }
}

fn get_u32(buf: &mut &[u8]) -> Result<u32> {
    if buf.remaining() < 4 {
        return Err(ProtoError::Truncated {
            needed: 4 - buf.remaining(),
            remaining: buf.remaining(),
        });
    }
    Ok(buf.get_u32_le())
}

fn get_i32(buf: &mut &[u8]) -> Result<i32> {
    if buf.remaining() < 4 {
        return Err(ProtoError::Truncated {
            needed: 4 - buf.remaining(),
            remaining: buf.remaining(),
        });
    }
    Ok(buf.get_i32_le())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_single_field_commands() {
        let commands = [
            Command::SetZoomLevel { level: 5 },
            Command::SetColorScheme { scheme: 2 },
            Command::SetAirTemp { temperature: -40 },
            Command::SetDistance { distance: 1200 },
            Command::SetAgcMode { mode: 1 },
            Command::SetAirPressure { pressure: 10132 },
            Command::SetAirHumidity { humidity: 55 },
            Command::SetPowderTemp { temperature: 21 },
            Command::SetCompassOffset { offset: -180 },
            Command::ButtonPress { button: 3 },
            Command::TriggerCmd { cmd: 1 },
        ];
        for command in commands {
            let decoded = Command::decode(&command.encode()).unwrap();
            assert_eq!(decoded, command);
        }
    }

    #[test]
    fn roundtrip_two_field_commands() {
        let wind = Command::SetWind {
            direction: 270,
            speed: 12,
        };
        assert_eq!(Command::decode(&wind.encode()).unwrap(), wind);

        let zeroing = Command::SetZeroing { x: -125, y: 600 };
        assert_eq!(Command::decode(&zeroing.encode()).unwrap(), zeroing);
    }

    #[test]
    fn roundtrip_trigger_style_commands() {
        for command in [Command::GetDevStatus, Command::GetProfile] {
            let encoded = command.encode();
            assert_eq!(encoded.len(), 4); // discriminant only
            assert_eq!(Command::decode(&encoded).unwrap(), command);
        }
    }

    #[test]
    fn unknown_id_decodes_to_unknown() {
        for id in [0u32, 16, 255, u32::MAX] {
            let decoded = Command::decode(&id.to_le_bytes()).unwrap();
            assert_eq!(decoded, Command::Unknown { id });
            assert_eq!(decoded.id(), id);
        }
    }

    #[test]
    fn truncated_discriminant_is_error() {
        let err = Command::decode(&[0x01, 0x00]).unwrap_err();
        assert!(matches!(err, ProtoError::Truncated { .. }));
    }

    #[test]
    fn truncated_field_is_error() {
        let mut buf = 1u32.to_le_bytes().to_vec(); // SetZoomLevel
        buf.extend_from_slice(&[0x05, 0x00]); // half a level field
        let err = Command::decode(&buf).unwrap_err();
        assert!(matches!(
            err,
            ProtoError::Truncated {
                needed: 2,
                remaining: 2,
            }
        ));
    }

    #[test]
    fn wire_layout_is_little_endian() {
        let encoded = Command::SetZoomLevel { level: 5 }.encode();
        assert_eq!(encoded, vec![1, 0, 0, 0, 5, 0, 0, 0]);
    }
}
