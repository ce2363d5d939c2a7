//! Consistent Overhead Byte Stuffing.
//!
//! Removes every zero byte from a payload so that `0x00` can serve as an
//! unambiguous frame delimiter on the wire. The encoded form replaces each
//! run of non-zero bytes with a leading code byte (run length + 1, capped
//! at 0xFF for runs of 254).
//!
//! The delimiter itself is not part of the encoding; framing appends it.
//!
//! Reference: <http://conferences.sigcomm.org/sigcomm/1997/papers/p062.pdf>

use crate::error::{FrameError, Result};

/// Maximum run of non-zero bytes covered by a single code byte.
const MAX_RUN: u8 = 0xFF;

/// Worst-case encoded size for a payload of `len` bytes.
pub fn max_encoded_len(len: usize) -> usize {
    len + len / 254 + 1
}

/// Encode a payload so the result contains no zero bytes.
pub fn encode(src: &[u8]) -> Vec<u8> {
    let mut dst = Vec::with_capacity(max_encoded_len(src.len()));
    dst.push(0); // code byte, patched below
    let mut code_idx = 0usize;
    let mut code = 1u8;

    for &b in src {
        if b == 0 {
            dst[code_idx] = code;
            code_idx = dst.len();
            dst.push(0);
            code = 1;
            continue;
        }

        dst.push(b);
        code += 1;
        if code == MAX_RUN {
            dst[code_idx] = code;
            code_idx = dst.len();
            dst.push(0);
            code = 1;
        }
    }

    dst[code_idx] = code;
    dst
}

/// Decode a stuffed payload back to its original bytes.
///
/// `src` must not include the frame delimiter. Fails with
/// [`FrameError::Corrupt`] when a code byte is zero or points past the end
/// of the input.
pub fn decode(src: &[u8]) -> Result<Vec<u8>> {
    let mut dst = Vec::with_capacity(src.len());
    let mut ptr = 0usize;

    while ptr < src.len() {
        let code = src[ptr] as usize;
        if code == 0 || ptr + code > src.len() {
            return Err(FrameError::Corrupt { offset: ptr });
        }
        ptr += 1;

        dst.extend_from_slice(&src[ptr..ptr + code - 1]);
        ptr += code - 1;

        // A zero was elided at each block boundary except after a full
        // 254-byte run and at the end of input.
        if code < MAX_RUN as usize && ptr < src.len() {
            dst.push(0);
        }
    }

    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(payload: &[u8]) {
        let stuffed = encode(payload);
        assert!(
            !stuffed.contains(&0),
            "encoded form must be delimiter-free: {stuffed:02x?}"
        );
        let restored = decode(&stuffed).unwrap();
        assert_eq!(restored, payload);
    }

    #[test]
    fn roundtrip_empty() {
        roundtrip(b"");
        assert_eq!(encode(b""), vec![0x01]);
    }

    #[test]
    fn roundtrip_plain_bytes() {
        roundtrip(b"hello");
        roundtrip(&[0x11, 0x22, 0x33, 0x44]);
    }

    #[test]
    fn roundtrip_zeros() {
        roundtrip(&[0x00]);
        roundtrip(&[0x00, 0x00]);
        roundtrip(&[0x11, 0x00, 0x22]);
        roundtrip(&[0x00, 0x11, 0x00]);
    }

    #[test]
    fn roundtrip_long_runs() {
        // Runs crossing the 254-byte code-block boundary.
        for len in [253usize, 254, 255, 508, 509, 1024] {
            let payload: Vec<u8> = (0..len).map(|i| (i % 255) as u8 + 1).collect();
            roundtrip(&payload);
        }
    }

    #[test]
    fn roundtrip_zeros_around_block_boundary() {
        let mut payload = vec![0xAAu8; 254];
        payload.push(0);
        payload.extend_from_slice(&[0xBB; 10]);
        roundtrip(&payload);
    }

    #[test]
    fn known_encodings() {
        assert_eq!(encode(&[0x00]), vec![0x01, 0x01]);
        assert_eq!(encode(&[0x11, 0x22]), vec![0x03, 0x11, 0x22]);
        assert_eq!(encode(&[0x11, 0x00, 0x22]), vec![0x02, 0x11, 0x02, 0x22]);
    }

    #[test]
    fn decode_rejects_overrunning_code() {
        // Code byte claims 5 data bytes; only 2 present.
        let err = decode(&[0x06, 0x11, 0x22]).unwrap_err();
        assert!(matches!(err, FrameError::Corrupt { offset: 0 }));
    }

    #[test]
    fn decode_rejects_embedded_zero() {
        let err = decode(&[0x02, 0x11, 0x00, 0x22]).unwrap_err();
        assert!(matches!(err, FrameError::Corrupt { offset: 2 }));
    }

    #[test]
    fn decode_empty_is_empty() {
        assert_eq!(decode(&[]).unwrap(), Vec::<u8>::new());
    }
}
