//! Byte-level key decoding for the read loop.
//!
//! Only `ESC [ A|B|C|D` are recognized. Everything else after ESC is handed
//! back as [`Key::UnknownEscape`] and the caller applies its policy.

use std::io;

pub const ESC: u8 = 0x1b;
pub const DEL: u8 = 0x7f;
pub const ENTER: u8 = b'\n';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrow {
    Up,
    Down,
    Right,
    Left,
}

impl Arrow {
    /// Final byte of the `ESC [` sequence.
    pub fn final_byte(self) -> u8 {
        match self {
            Self::Up => b'A',
            Self::Down => b'B',
            Self::Right => b'C',
            Self::Left => b'D',
        }
    }

    fn from_final_byte(byte: u8) -> Option<Self> {
        match byte {
            b'A' => Some(Self::Up),
            b'B' => Some(Self::Down),
            b'C' => Some(Self::Right),
            b'D' => Some(Self::Left),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Ordinary byte to append (may be part of a multi-byte character).
    Byte(u8),
    Backspace,
    Enter,
    Arrow(Arrow),
    /// ESC not followed by `[`; carries the second byte if one arrived.
    UnknownEscape(Option<u8>),
    /// `ESC [` followed by an unrecognized final byte (or nothing).
    UnknownCsi(Option<u8>),
}

/// Decodes the key starting with `first`, pulling follow-up bytes from `next`
/// when `first` is ESC. `next` yields `None` on read timeout.
pub fn decode_key<F>(first: u8, mut next: F) -> io::Result<Key>
where
    F: FnMut() -> io::Result<Option<u8>>,
{
    let key = match first {
        DEL => Key::Backspace,
        ENTER => Key::Enter,
        ESC => match next()? {
            Some(b'[') => {
                let last = next()?;
                match last.and_then(Arrow::from_final_byte) {
                    Some(arrow) => Key::Arrow(arrow),
                    None => Key::UnknownCsi(last),
                }
            }
            other => Key::UnknownEscape(other),
        },
        byte => Key::Byte(byte),
    };
    Ok(key)
}
