pub const MAX_DIGITS: u8 = 8;
pub const MAX_INTENSITY: u8 = 15; // 4 bits
pub const DEFAULT_INTENSITY: u8 = 0x03;
pub const DOT_MASK: u8 = 0x80;
pub const WRITE_DELAY_US: u32 = 1; // idle time between transactions

/// Code-B font understood by the chip's built-in decoder.
pub const FONT: [(char, u8); 16] = [
    ('0', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('4', 0x04),
    ('5', 0x05),
    ('6', 0x06),
    ('7', 0x07),
    ('8', 0x08),
    ('9', 0x09),
    ('-', 0x0A),
    ('E', 0x0B),
    ('H', 0x0C),
    ('L', 0x0D),
    ('P', 0x0E),
    (' ', 0x0F),
];

pub const BLANK: char = ' ';
pub const BLANK_CODE: u8 = 0x0F;
pub const MINUS_CODE: u8 = 0x0A;

#[allow(dead_code)]
pub mod register {
    pub const NO_OP: u8 = 0x00;
    pub const DIGIT_OFFSET: u8 = 0x01; // Digit0 - Digit7
    pub const DECODE_MODE: u8 = 0x09;
    pub const INTENSITY: u8 = 0x0A;
    pub const SCAN_LIMIT: u8 = 0x0B;
    pub const SHUTDOWN_MODE: u8 = 0x0C;
    pub const DISPLAY_TEST_MODE: u8 = 0x0F;

    pub mod decode_mode {
        pub const NO_DECODE: u8 = 0x00; // no decode for digits 7:0
        pub const DECODE_DIGIT_0: u8 = 0x01; // Code-B for digit 0 only
        pub const DECODE_DIGITS_3_0: u8 = 0x0F; // Code-B for digits 3:0
        pub const DECODE_ALL: u8 = 0xFF; // Code-B for digits 7:0
    }

    pub mod display_test_mode {
        pub const NORMAL_OPERATION: u8 = 0x00;
        pub const DISP_TEST: u8 = 0x01; // all segments on, full intensity
    }

    pub mod shutdown_mode {
        pub const SHUTDOWN_MODE: u8 = 0x00; // bit 0 clear: shutdown mode
        pub const NORMAL_OPERATION: u8 = 0x01; // bit 0 set: normal operation
    }
}
