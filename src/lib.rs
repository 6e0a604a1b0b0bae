//! Driver for MAX7219-class nixie tube displays.
//!
//! The chip is programmed over a bit-banged 3-wire bus (clock, chip-select,
//! data) built from any three `embedded-hal` output pins. Every write is one
//! 16-bit transaction: register address, then data, MSB first, framed by
//! chip-select low and latched on its rising edge.
#![no_std]

mod constants;

pub use constants::*;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use num_traits::ToPrimitive;

/// Look up the Code-B value for `c`, if the chip can show it.
pub fn font_code(c: char) -> Option<u8> {
    FONT.iter()
        .find(|(glyph, _)| *glyph == c)
        .map(|(_, code)| *code)
}

/// Decode-mode register value used by `reset` for a given digit count.
///
/// Only 1 and 4 digits get a narrowed mask, every other count decodes all
/// eight digits.
pub const fn decode_mode(digit_count: u8) -> u8 {
    match digit_count {
        1 => register::decode_mode::DECODE_DIGIT_0,
        4 => register::decode_mode::DECODE_DIGITS_3_0,
        _ => register::decode_mode::DECODE_ALL,
    }
}

/// What `display_char` does with an index past the last digit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IndexPolicy {
    /// Write nothing and report success.
    #[default]
    Ignore,
    /// Write nothing and return `InvalidLocation`.
    Strict,
}

pub struct NixieTube<CLK, CS, DIN, DELAY> {
    clk: CLK,
    cs: CS,
    din: DIN,
    delay: DELAY,
    digit_count: u8,
    index_policy: IndexPolicy,
}

impl<CLK, CS, DIN, DELAY, E> NixieTube<CLK, CS, DIN, DELAY>
where
    CLK: OutputPin<Error = E>,
    CS: OutputPin<Error = E>,
    DIN: OutputPin<Error = E>,
    DELAY: DelayNs,
{
    /// Take ownership of the bus pins and bring the chip into a blank,
    /// operating state.
    ///
    /// `digit_count` must be in `1..=MAX_DIGITS`. Out-of-range indices passed
    /// to `display_char` are ignored, see `with_policy` for the strict variant.
    pub fn new(
        clk: CLK,
        cs: CS,
        din: DIN,
        delay: DELAY,
        digit_count: u8,
    ) -> Result<Self, NixieTubeError<E>> {
        Self::with_policy(clk, cs, din, delay, digit_count, IndexPolicy::Ignore)
    }

    pub fn with_policy(
        clk: CLK,
        cs: CS,
        din: DIN,
        delay: DELAY,
        digit_count: u8,
        index_policy: IndexPolicy,
    ) -> Result<Self, NixieTubeError<E>> {
        if digit_count == 0 || digit_count > MAX_DIGITS {
            return Err(NixieTubeError::InvalidDigitCount(digit_count));
        }

        let mut tube = Self {
            clk,
            cs,
            din,
            delay,
            digit_count,
            index_policy,
        };
        tube.cs.set_high()?;
        tube.reset()?;
        Ok(tube)
    }

    pub fn destroy(self) -> (CLK, CS, DIN, DELAY) {
        (self.clk, self.cs, self.din, self.delay)
    }

    pub fn digit_count(&self) -> u8 {
        self.digit_count
    }

    pub fn index_policy(&self) -> IndexPolicy {
        self.index_policy
    }

    pub fn set_index_policy(&mut self, index_policy: IndexPolicy) {
        self.index_policy = index_policy;
    }

    /// Run the full init sequence: decode mode, intensity, scan limit,
    /// normal operation, test mode off, then blank every digit.
    ///
    /// This is also the way out of `test` mode that restores every register.
    pub fn reset(&mut self) -> Result<(), NixieTubeError<E>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("nixie tube reset ({} digits)", self.digit_count);

        self.write_register(register::DECODE_MODE, decode_mode(self.digit_count))?;
        self.write_register(register::INTENSITY, DEFAULT_INTENSITY)?;
        self.write_register(register::SCAN_LIMIT, self.digit_count - 1)?;
        self.write_register(
            register::SHUTDOWN_MODE,
            register::shutdown_mode::NORMAL_OPERATION,
        )?;
        self.write_register(
            register::DISPLAY_TEST_MODE,
            register::display_test_mode::NORMAL_OPERATION,
        )?;
        self.clear()
    }

    pub fn clear(&mut self) -> Result<(), NixieTubeError<E>> {
        for i in 0..self.digit_count {
            self.display_char(i, BLANK, false)?;
        }
        Ok(())
    }

    /// Show `c` at digit `index`, with the decimal point lit if `show_dp`.
    ///
    /// Index is checked before the character. Neither failure touches the bus.
    pub fn display_char(
        &mut self,
        index: u8,
        c: char,
        show_dp: bool,
    ) -> Result<(), NixieTubeError<E>> {
        if index >= self.digit_count {
            return match self.index_policy {
                IndexPolicy::Ignore => Ok(()),
                IndexPolicy::Strict => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("digit index {} out of range", index);
                    Err(NixieTubeError::InvalidLocation(index))
                }
            };
        }

        let Some(code) = font_code(c) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("no font code for {}", c);
            return Err(NixieTubeError::UnsupportedChar(c));
        };

        let value = if show_dp { code | DOT_MASK } else { code };
        self.write_register(register::DIGIT_OFFSET + index, value)
    }

    /// Write `string` from the leftmost digit, blanking the digits after it.
    ///
    /// A `'.'` lights the decimal point of the glyph before it. The string is
    /// checked in full before anything is sent.
    pub fn display_str(&mut self, string: &str) -> Result<(), NixieTubeError<E>> {
        let mut buffer = [BLANK_CODE; MAX_DIGITS as usize];
        let mut len = 0;
        let mut dot_open = false; // last glyph can still take a '.'

        for c in string.chars() {
            if c == '.' && dot_open {
                buffer[len - 1] |= DOT_MASK;
                dot_open = false;
                continue;
            }

            let value = if c == '.' {
                BLANK_CODE | DOT_MASK
            } else {
                font_code(c).ok_or(NixieTubeError::UnsupportedChar(c))?
            };
            if len >= self.digit_count as usize {
                return Err(NixieTubeError::InvalidValue);
            }
            buffer[len] = value;
            len += 1;
            dot_open = c != '.';
        }

        self.write_digits(&buffer)
    }

    /// Show a decimal number right-aligned, with blank leading digits and a
    /// `'-'` in front of negative values.
    pub fn display_number<T>(&mut self, number: T) -> Result<(), NixieTubeError<E>>
    where
        T: ToPrimitive,
    {
        let value = number.to_i64().ok_or(NixieTubeError::InvalidValue)?;
        let mut buffer = [BLANK_CODE; MAX_DIGITS as usize];
        let mut magnitude = value.unsigned_abs();
        let mut position = self.digit_count as usize;

        loop {
            if position == 0 {
                return Err(NixieTubeError::InvalidValue);
            }
            position -= 1;
            buffer[position] = FONT[(magnitude % 10) as usize].1;
            magnitude /= 10;
            if magnitude == 0 {
                break;
            }
        }

        if value < 0 {
            if position == 0 {
                return Err(NixieTubeError::InvalidValue);
            }
            buffer[position - 1] = MINUS_CODE;
        }

        self.write_digits(&buffer)
    }

    pub fn set_intensity(&mut self, intensity: u8) -> Result<(), NixieTubeError<E>> {
        if intensity > MAX_INTENSITY {
            return Err(NixieTubeError::InvalidValue);
        }
        self.write_register(register::INTENSITY, intensity)
    }

    pub fn power_on(&mut self) -> Result<(), NixieTubeError<E>> {
        self.write_register(
            register::SHUTDOWN_MODE,
            register::shutdown_mode::NORMAL_OPERATION,
        )
    }

    /// Enter shutdown mode. Register contents are kept by the chip.
    pub fn off(&mut self) -> Result<(), NixieTubeError<E>> {
        self.write_register(
            register::SHUTDOWN_MODE,
            register::shutdown_mode::SHUTDOWN_MODE,
        )
    }

    /// Light every segment at full intensity.
    pub fn test(&mut self) -> Result<(), NixieTubeError<E>> {
        self.write_register(
            register::DISPLAY_TEST_MODE,
            register::display_test_mode::DISP_TEST,
        )
    }

    pub fn end_test(&mut self) -> Result<(), NixieTubeError<E>> {
        self.write_register(
            register::DISPLAY_TEST_MODE,
            register::display_test_mode::NORMAL_OPERATION,
        )
    }

    /// Send one unchecked register write.
    pub fn write_raw(&mut self, register: u8, value: u8) -> Result<(), NixieTubeError<E>> {
        self.write_register(register, value)
    }

    fn write_digits(
        &mut self,
        buffer: &[u8; MAX_DIGITS as usize],
    ) -> Result<(), NixieTubeError<E>> {
        for (i, value) in buffer.iter().take(self.digit_count as usize).enumerate() {
            self.write_register(register::DIGIT_OFFSET + i as u8, *value)?;
        }
        Ok(())
    }

    fn write_register(&mut self, register: u8, value: u8) -> Result<(), NixieTubeError<E>> {
        self.cs.set_low()?;
        self.shift_out(register)?;
        self.shift_out(value)?;
        self.cs.set_high()?;
        self.delay.delay_us(WRITE_DELAY_US);
        Ok(())
    }

    fn shift_out(&mut self, mut byte: u8) -> Result<(), NixieTubeError<E>> {
        for _ in 0..8 {
            self.clk.set_low()?;
            self.din.set_state(PinState::from(byte & 0x80 != 0))?;
            byte <<= 1;
            self.clk.set_high()?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NixieTubeError<E> {
    PinError(E),
    UnsupportedChar(char),
    InvalidLocation(u8),
    InvalidDigitCount(u8),
    InvalidValue,
}

impl<E> From<E> for NixieTubeError<E> {
    fn from(error: E) -> Self {
        NixieTubeError::PinError(error)
    }
}
