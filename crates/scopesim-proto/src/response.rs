use bytes::{Buf, BufMut};
use serde::Serialize;

use crate::error::{ProtoError, Result};

const TAG_STATUS_OK: u32 = 1;
const TAG_STATUS_ERR: u32 = 2;
const TAG_DEV_STATUS: u32 = 3;
const TAG_PROFILE: u32 = 4;

/// Status code carried by a success response.
pub const CODE_SUCCESS: u32 = 0;
/// Status code carried by an error response (unknown command).
pub const CODE_FAILURE: u32 = 1;

/// Schema cap on string fields, in bytes.
pub const MAX_STRING_LEN: usize = 32;
/// Schema cap on the profile distance table.
pub const MAX_DISTANCES: usize = 200;
/// Schema cap on the profile coefficient table.
pub const MAX_COEF_ROWS: usize = 5;

/// Environment and sensor snapshot of the emulated device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceStatus {
    pub charge: u32,
    pub zoom: i32,
    pub air_temp: i32,
    pub air_hum: u32,
    pub air_press: u32,
    pub powder_temp: i32,
    pub wind_direction: u32,
    pub wind_speed: u32,
    pub pitch: i32,
    pub cant: i32,
    pub distance: u32,
}

/// One row of the ballistic coefficient table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CoefRow {
    pub bc_cd: u32,
    pub mv_temp: i32,
}

/// Ballistic/calibration configuration snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub profile_name: String,
    pub cartridge_name: String,
    pub bullet_name: String,
    pub zero_x: i32,
    pub zero_y: i32,
    pub muzzle_velocity: u32,
    pub zero_distance_index: u32,
    pub distances: Vec<u32>,
    pub coef_rows: Vec<CoefRow>,
}

/// A device response: exactly one of a success status, an error status, a
/// status snapshot, or a profile snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Response {
    StatusOk { code: u32 },
    StatusErr { code: u32 },
    DevStatus(DeviceStatus),
    Profile(Profile),
}

impl Response {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Response::StatusOk { .. } => "status-ok",
            Response::StatusErr { .. } => "status-err",
            Response::DevStatus(_) => "dev-status",
            Response::Profile(_) => "profile",
        }
    }

    /// Encode this response as a flat little-endian record.
    ///
    /// Fails when a table or string field exceeds its schema cap; the
    /// caller abandons the send (no partial record is produced).
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(64);
        match self {
            Response::StatusOk { code } => {
                buf.put_u32_le(TAG_STATUS_OK);
                buf.put_u32_le(*code);
            }
            Response::StatusErr { code } => {
                buf.put_u32_le(TAG_STATUS_ERR);
                buf.put_u32_le(*code);
            }
            Response::DevStatus(status) => {
                buf.put_u32_le(TAG_DEV_STATUS);
                buf.put_u32_le(status.charge);
                buf.put_i32_le(status.zoom);
                buf.put_i32_le(status.air_temp);
                buf.put_u32_le(status.air_hum);
                buf.put_u32_le(status.air_press);
                buf.put_i32_le(status.powder_temp);
                buf.put_u32_le(status.wind_direction);
                buf.put_u32_le(status.wind_speed);
                buf.put_i32_le(status.pitch);
                buf.put_i32_le(status.cant);
                buf.put_u32_le(status.distance);
            }
            Response::Profile(profile) => {
                buf.put_u32_le(TAG_PROFILE);
                put_string(&mut buf, &profile.profile_name)?;
                put_string(&mut buf, &profile.cartridge_name)?;
                put_string(&mut buf, &profile.bullet_name)?;
                buf.put_i32_le(profile.zero_x);
                buf.put_i32_le(profile.zero_y);
                buf.put_u32_le(profile.muzzle_velocity);
                buf.put_u32_le(profile.zero_distance_index);

                if profile.distances.len() > MAX_DISTANCES {
                    return Err(ProtoError::TableTooLarge {
                        len: profile.distances.len(),
                        max: MAX_DISTANCES,
                    });
                }
                buf.put_u16_le(profile.distances.len() as u16);
                for distance in &profile.distances {
                    buf.put_u32_le(*distance);
                }

                if profile.coef_rows.len() > MAX_COEF_ROWS {
                    return Err(ProtoError::TableTooLarge {
                        len: profile.coef_rows.len(),
                        max: MAX_COEF_ROWS,
                    });
                }
                buf.put_u16_le(profile.coef_rows.len() as u16);
                for row in &profile.coef_rows {
                    buf.put_u32_le(row.bc_cd);
                    buf.put_i32_le(row.mv_temp);
                }
            }
        }
        Ok(buf)
    }

    /// Decode a response record. Unlike commands, responses have no
    /// "unknown" variant: a tag outside the schema is a decode error.
    pub fn decode(mut buf: &[u8]) -> Result<Response> {
        let tag = get_u32(&mut buf)?;
        match tag {
            TAG_STATUS_OK => Ok(Response::StatusOk {
                code: get_u32(&mut buf)?,
            }),
            TAG_STATUS_ERR => Ok(Response::StatusErr {
                code: get_u32(&mut buf)?,
            }),
            TAG_DEV_STATUS => Ok(Response::DevStatus(DeviceStatus {
                charge: get_u32(&mut buf)?,
                zoom: get_i32(&mut buf)?,
                air_temp: get_i32(&mut buf)?,
                air_hum: get_u32(&mut buf)?,
                air_press: get_u32(&mut buf)?,
                powder_temp: get_i32(&mut buf)?,
                wind_direction: get_u32(&mut buf)?,
                wind_speed: get_u32(&mut buf)?,
                pitch: get_i32(&mut buf)?,
                cant: get_i32(&mut buf)?,
                distance: get_u32(&mut buf)?,
            })),
            TAG_PROFILE => {
                let profile_name = get_string(&mut buf)?;
                let cartridge_name = get_string(&mut buf)?;
                let bullet_name = get_string(&mut buf)?;
                let zero_x = get_i32(&mut buf)?;
                let zero_y = get_i32(&mut buf)?;
                let muzzle_velocity = get_u32(&mut buf)?;
                let zero_distance_index = get_u32(&mut buf)?;

                let count = get_u16(&mut buf)? as usize;
                if count > MAX_DISTANCES {
                    return Err(ProtoError::TableTooLarge {
                        len: count,
                        max: MAX_DISTANCES,
                    });
                }
                let mut distances = Vec::with_capacity(count);
                for _ in 0..count {
                    distances.push(get_u32(&mut buf)?);
                }

                let count = get_u16(&mut buf)? as usize;
                if count > MAX_COEF_ROWS {
                    return Err(ProtoError::TableTooLarge {
                        len: count,
                        max: MAX_COEF_ROWS,
                    });
                }
                let mut coef_rows = Vec::with_capacity(count);
                for _ in 0..count {
                    coef_rows.push(CoefRow {
                        bc_cd: get_u32(&mut buf)?,
                        mv_temp: get_i32(&mut buf)?,
                    });
                }

                Ok(Response::Profile(Profile {
                    profile_name,
                    cartridge_name,
                    bullet_name,
                    zero_x,
                    zero_y,
                    muzzle_velocity,
                    zero_distance_index,
                    distances,
                    coef_rows,
                }))
            }
            other => Err(ProtoError::UnknownResponseTag { tag: other }),
        }
    }
}

fn put_string(buf: &mut Vec<u8>, value: &str) -> Result<()> {
    if value.len() > MAX_STRING_LEN {
        return Err(ProtoError::InvalidString {
            reason: format!("{} bytes exceeds cap of {MAX_STRING_LEN}", value.len()),
        });
    }
    buf.put_u16_le(value.len() as u16);
    buf.put_slice(value.as_bytes());
    Ok(())
}

fn get_string(buf: &mut &[u8]) -> Result<String> {
    let len = get_u16(buf)? as usize;
    if len > MAX_STRING_LEN {
        return Err(ProtoError::InvalidString {
            reason: format!("{len} bytes exceeds cap of {MAX_STRING_LEN}"),
        });
    }
    if buf.remaining() < len {
        return Err(ProtoError::Truncated {
            needed: len - buf.remaining(),
            remaining: buf.remaining(),
        });
    }
    let bytes = buf[..len].to_vec();
    buf.advance(len);
    String::from_utf8(bytes).map_err(|err| ProtoError::InvalidString {
        reason: err.to_string(),
    })
}

fn get_u16(buf: &mut &[u8]) -> Result<u16> {
    if buf.remaining() < 2 {
        return Err(ProtoError::Truncated {
            needed: 2 - buf.remaining(),
            remaining: buf.remaining(),
        });
    }
    Ok(buf.get_u16_le())
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
