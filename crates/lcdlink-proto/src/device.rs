/// Number of programmable custom-character glyphs.
pub const GLYPH_COUNT: usize = 8;

/// Rows per glyph (one byte per pixel row).
pub const GLYPH_ROWS: usize = 8;

/// Map a caller-facing glyph slot (1..=8) to the firmware font position.
///
/// The display exposes the programmable glyphs at font positions 8..=15.
pub fn custom_char_slot(index: u8) -> u8 {
    index + 7
}

/// The latest known device configuration.
///
/// Owned by the session and mutated only while holding the command gate.
/// Survives reconnection so the supervisor can replay it: after every
/// successful connect the device receives one `Init` frame and the eight
/// glyph definitions, in that order. Cursor position, backlight, contrast,
/// brightness, GPO and fan state are deliberately not replayed (known
/// limitation inherited from the firmware driver this replaces).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Display width in characters.
    pub width: u8,
    /// Display height in lines.
    pub height: u8,
    /// Cursor column, 1-based.
    pub cursor_x: u8,
    /// Cursor line, 1-based.
    pub cursor_y: u8,
    /// Whether the backlight is on.
    pub backlight_on: bool,
    /// Contrast level.
    pub contrast: u8,
    /// Brightness level.
    pub brightness: u8,
    /// The eight programmable glyphs, 8 row bytes each.
    pub glyphs: [[u8; GLYPH_ROWS]; GLYPH_COUNT],
}

impl DeviceConfig {
    /// Fresh configuration for a display of the given dimensions.
    /// The cursor starts at (1,1).
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cursor_x: 1,
            cursor_y: 1,
            backlight_on: false,
            contrast: 0,
            brightness: 0,
            glyphs: [[0; GLYPH_ROWS]; GLYPH_COUNT],
        }
    }

    /// Payload of the `Init` frame.
    pub fn init_payload(&self) -> [u8; 2] {
        [self.width, self.height]
    }

    /// Payload of the `CustomChar` frame for glyph `index` (0-based).
    pub fn glyph_payload(&self, index: usize) -> [u8; 1 + GLYPH_ROWS] {
        let mut payload = [0u8; 1 + GLYPH_ROWS];
        payload[0] = index as u8;
        payload[1..].copy_from_slice(&self.glyphs[index]);
        payload
    }

    /// Store a cursor position (1-based, clamped to at least 1) and
    /// return the zero-based wire payload for the `SetCursor` frame.
    pub fn set_cursor(&mut self, x: u8, y: u8) -> [u8; 2] {
        self.cursor_x = x.max(1);
        self.cursor_y = y.max(1);
        [self.cursor_x - 1, self.cursor_y - 1]
    }

    /// Truncate or space-pad `text` to exactly `width` characters and
    /// return the `WriteData` payload `{char_count, chars...}`.
    pub fn line_payload(&self, text: &str) -> Vec<u8> {
        let width = self.width as usize;
        let mut payload = Vec::with_capacity(1 + width);
        payload.push(self.width);
        let mut bytes = text.bytes();
        for _ in 0..width {
            payload.push(bytes.next().unwrap_or(b' '));
        }
        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_defaults() {
        let config = DeviceConfig::new(20, 4);
        assert_eq!(config.init_payload(), [20, 4]);
        assert_eq!((config.cursor_x, config.cursor_y), (1, 1));
        assert!(!config.backlight_on);
        assert_eq!(config.glyphs, [[0; GLYPH_ROWS]; GLYPH_COUNT]);
    }

    #[test]
    fn glyph_payload_carries_index_and_rows() {
        let mut config = DeviceConfig::new(16, 2);
        config.glyphs[3] = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(config.glyph_payload(3), [3, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(config.glyph_payload(0), [0; 9]);
    }

    #[test]
    fn cursor_is_clamped_and_zero_based_on_the_wire() {
        let mut config = DeviceConfig::new(20, 4);
        assert_eq!(config.set_cursor(0, 0), [0, 0]);
        assert_eq!((config.cursor_x, config.cursor_y), (1, 1));

        assert_eq!(config.set_cursor(5, 2), [4, 1]);
        assert_eq!((config.cursor_x, config.cursor_y), (5, 2));
    }

    #[test]
    fn line_payload_pads_to_width() {
        let config = DeviceConfig::new(5, 4);
        assert_eq!(config.line_payload("AB"), b"\x05AB   ");
        assert_eq!(config.line_payload(""), b"\x05     ");
    }

    #[test]
    fn line_payload_truncates_to_width() {
        let config = DeviceConfig::new(5, 4);
        assert_eq!(config.line_payload("ABCDEFGH"), b"\x05ABCDE");
    }

    #[test]
    fn custom_char_slots_map_to_font_positions() {
        assert_eq!(custom_char_slot(1), 8);
        assert_eq!(custom_char_slot(8), 15);
    }
}
