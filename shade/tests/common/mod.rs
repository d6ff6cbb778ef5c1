#![allow(dead_code)]

use shade::Cartridge;
use shade::Engine;

/// Builds a cartridge image with the given header bytes and `program` placed at the entry point.
/// The image is only as long as the header requires; the loader pads it out.
pub fn image(cartridge_type: u8, rom_code: u8, ram_code: u8, program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0; 0x150];
    rom[0x100..0x100 + program.len()].copy_from_slice(program);
    rom[0x134..0x139].copy_from_slice(b"SHADE");
    rom[0x147] = cartridge_type;
    rom[0x148] = rom_code;
    rom[0x149] = ram_code;
    rom[0x14D] = rom[0x134..0x14D]
        .iter()
        .fold(0u8, |acc, b| acc.wrapping_sub(*b).wrapping_sub(1));
    rom
}

pub fn cart(program: &[u8]) -> Cartridge {
    shade::load(image(0x00, 0x00, 0x00, program)).unwrap()
}

pub fn engine(program: &[u8]) -> Engine {
    shade::new_engine(cart(program))
}
