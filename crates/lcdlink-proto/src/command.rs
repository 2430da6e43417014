/// Command codes understood by the display firmware.
///
/// `SetGpo` and `SetFan` are Matrix Orbital extensions; `DeInit` is part
/// of the firmware protocol but never sent by this driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// Initialise the display: payload `{width, height}`.
    Init = 0x01,
    /// Switch the backlight: payload `{on}`.
    SetBacklight = 0x02,
    /// Set the contrast level: payload `{level}`.
    SetContrast = 0x03,
    /// Set the brightness level: payload `{level}`.
    SetBrightness = 0x04,
    /// Write one line of text: payload `{char_count, chars...}`.
    WriteData = 0x05,
    /// Move the cursor: payload `{x, y}`, zero-based on the wire.
    SetCursor = 0x06,
    /// Program a custom glyph: payload `{glyph_index, 8 row bytes}`.
    CustomChar = 0x07,
    /// Shut the display down.
    DeInit = 0x0B,
    /// Switch a general-purpose output: payload `{index, on}`.
    SetGpo = 0x0C,
    /// Set fan throttles: payload `{t1, t2}`.
    SetFan = 0x0D,
}

impl Command {
    /// The wire code of this command.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decode a wire command code.
    pub fn from_code(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(Self::Init),
            0x02 => Some(Self::SetBacklight),
            0x03 => Some(Self::SetContrast),
            0x04 => Some(Self::SetBrightness),
            0x05 => Some(Self::WriteData),
            0x06 => Some(Self::SetCursor),
            0x07 => Some(Self::CustomChar),
            0x0B => Some(Self::DeInit),
            0x0C => Some(Self::SetGpo),
            0x0D => Some(Self::SetFan),
            _ => None,
        }
    }
}
