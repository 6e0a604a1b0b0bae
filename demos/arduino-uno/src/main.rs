#![no_std]
#![no_main]

use arduino_hal::prelude::*;
use nixie_tube::NixieTube;
use panic_halt as _;

const NUM_DIGITS: u8 = 4; // 1 or 4 get an exact decode mask

#[arduino_hal::entry]
fn main() -> ! {
    let dp = arduino_hal::Peripherals::take().unwrap();
    let pins = arduino_hal::pins!(dp);
    let mut serial = arduino_hal::default_serial!(dp, pins, 57600);

    let clk = pins.d2.into_output();
    let cs = pins.d3.into_output();
    let din = pins.d4.into_output();

    let mut display = NixieTube::new(clk, cs, din, arduino_hal::Delay::new(), NUM_DIGITS).unwrap();

    ufmt::uwriteln!(&mut serial, "Display test...").unwrap_infallible();
    display.test().unwrap();
    arduino_hal::delay_ms(1000);
    display.end_test().unwrap();

    ufmt::uwriteln!(&mut serial, "Setting intensity...").unwrap_infallible();
    for intensity in 0..=nixie_tube::MAX_INTENSITY {
        display.set_intensity(intensity).unwrap();
        display.display_number(intensity).unwrap();
        arduino_hal::delay_ms(200);
    }
    display.reset().unwrap();

    ufmt::uwriteln!(&mut serial, "Walking glyphs...").unwrap_infallible();
    for (c, _) in nixie_tube::FONT {
        for i in 0..NUM_DIGITS {
            display.display_char(i, c, i == NUM_DIGITS - 1).unwrap();
        }
        arduino_hal::delay_ms(200);
    }

    display.display_str("HELP").unwrap();
    arduino_hal::delay_ms(1000);

    ufmt::uwriteln!(&mut serial, "Counting up...").unwrap_infallible();
    let mut i: i32 = -999;
    loop {
        display.display_number(i).unwrap();
        i = if i >= 9999 { -999 } else { i + 1 };

        arduino_hal::delay_ms(300);
    }
}
