//! Cartridge images and their headers.

use derive_more::Display;
use derive_more::Error;
use serde::Deserialize;
use serde::Serialize;
use serde_with::serde_as;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// The size of a ROM banks, 16 KiB.
pub const ROM_BANK_SIZE: usize = 16 * 1024;

/// The size of a RAM banks, 8 KiB.
pub const RAM_BANK_SIZE: usize = 8 * 1024;

/// Why a cartridge image could not be turned into a [`Cartridge`].
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum LoadError {
    #[display("cartridge image is {len} bytes but must be at least 0x150 bytes")]
    TooSmall { len: usize },
    #[display("unsupported cartridge type 0x{code:0>2X}")]
    UnsupportedController { code: u8 },
    #[display("unknown ROM size code 0x{code:0>2X}")]
    UnknownRomSize { code: u8 },
    #[display("unknown RAM size code 0x{code:0>2X}")]
    UnknownRamSize { code: u8 },
    #[display("save data is {found} bytes but the cartridge has {expected} bytes of RAM")]
    RamSizeMismatch { expected: usize, found: usize },
}

/// The families of bank controller this crate emulates. The variant decides how control writes to
/// 0x0000..0x8000 are interpreted.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum ControllerKind {
    /// There is no external MBC. The game ROM is mapped into the 32 KiB that starts at 0x0000 and
    /// extends to 0x7FFF. Control writes are ignored.
    #[display("ROM only")]
    RomOnly,
    /// ROM bank numbers are five bits wide, and bank 0 can not be selected into the switchable
    /// window.
    #[display("MBC1")]
    Mbc1,
    /// ROM bank numbers are seven bits wide. Some carts carry a real-time clock.
    #[display("MBC3")]
    Mbc3,
    /// ROM bank numbers are a full byte, and bank 0 is a legal selection.
    #[display("MBC5")]
    Mbc5,
}

impl ControllerKind {
    /// Applies this controller's masking policy to a value written to 0x2000..0x4000.
    pub const fn rom_bank(self, value: u8) -> u8 {
        match self {
            ControllerKind::RomOnly => 1,
            ControllerKind::Mbc1 => match value & 0x1F {
                0 => 1,
                n => n,
            },
            ControllerKind::Mbc3 => value & 0x7F,
            ControllerKind::Mbc5 => value,
        }
    }
}

/// This struct represents the parts of a ROM header that the emulator acts on. Per the Pan Docs,
/// the header of the ROM occupies the region between `0x100` and `0x14F`.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[display("\"{title}\" ({controller}, {rom_size} bytes of ROM, {ram_size} bytes of RAM)")]
pub struct CartridgeHeader {
    /// The memory region between `0x134` and `0x143`. Trailing padding is dropped.
    pub title: heapless::String<16>,
    /// The raw cartridge type at `0x147`.
    pub cartridge_type: u8,
    pub controller: ControllerKind,
    /// Decoded from the byte at `0x148`. Always `32 KiB << code`.
    pub rom_size: usize,
    /// Decoded from the byte at `0x149`.
    pub ram_size: usize,
    /// The external RAM is kept alive by a battery, so it is worth saving.
    pub has_battery: bool,
    /// The controller is wired to a real-time clock.
    pub has_rtc: bool,
    /// The unsigned byte at `0x14D`. On start, the header is checksummed. The check spans all
    /// of the bytes from `0x134` to `0x14C`.
    pub header_checksum: u8,
}

impl CartridgeHeader {
    pub const START_ADDR: usize = 0x100;
    pub const END_ADDR: usize = 0x14F;
    pub const LENGTH: usize = Self::END_ADDR - Self::START_ADDR + 1;

    pub fn extract_from_rom(rom: &[u8]) -> Result<Self, LoadError> {
        if rom.len() <= Self::END_ADDR {
            return Err(LoadError::TooSmall { len: rom.len() });
        }
        let title = parse_title(&rom[0x134..=0x143]);
        let cartridge_type = rom[0x147];
        let (controller, has_battery, has_rtc) = match cartridge_type {
            0x00 => (ControllerKind::RomOnly, false, false),
            0x08 => (ControllerKind::RomOnly, false, false),
            0x09 => (ControllerKind::RomOnly, true, false),
            0x01 | 0x02 => (ControllerKind::Mbc1, false, false),
            0x03 => (ControllerKind::Mbc1, true, false),
            0x0F | 0x10 => (ControllerKind::Mbc3, true, true),
            0x11 | 0x12 => (ControllerKind::Mbc3, false, false),
            0x13 => (ControllerKind::Mbc3, true, false),
            0x19 | 0x1A | 0x1C | 0x1D => (ControllerKind::Mbc5, false, false),
            0x1B | 0x1E => (ControllerKind::Mbc5, true, false),
            code => return Err(LoadError::UnsupportedController { code }),
        };
        let rom_size = match rom[0x148] {
            code @ 0x00..=0x08 => (32 * 1024) << code,
            code => return Err(LoadError::UnknownRomSize { code }),
        };
        let ram_size = match rom[0x149] {
            0x00 => 0,
            0x01 => 2 * 1024,
            0x02 => 8 * 1024,
            0x03 => 32 * 1024,
            0x04 => 128 * 1024,
            0x05 => 64 * 1024,
            code => return Err(LoadError::UnknownRamSize { code }),
        };
        let header_checksum = rom[0x14D];
        let computed = checksum(&rom[0x134..0x14D]);
        if computed != header_checksum {
            warn!(
                "Header checksum mismatch: header says 0x{header_checksum:0>2X}, computed 0x{computed:0>2X}"
            );
        }
        Ok(Self {
            title,
            cartridge_type,
            controller,
            rom_size,
            ram_size,
            has_battery,
            has_rtc,
            header_checksum,
        })
    }

    /// The number of 16 KiB banks the header declares.
    pub fn rom_banks(&self) -> usize {
        self.rom_size / ROM_BANK_SIZE
    }
}

/// The title is ASCII padded with zeros. Anything after the first zero is dropped, as is any byte
/// that is not printable.
fn parse_title(bytes: &[u8]) -> heapless::String<16> {
    let printable: Vec<u8> = bytes
        .iter()
        .take_while(|b| **b != 0)
        .filter(|b| b.is_ascii_graphic() || **b == b' ')
        .copied()
        .collect();
    heapless::Vec::from_slice(&printable)
        .ok()
        .and_then(|title| heapless::String::from_utf8(title).ok())
        .unwrap_or_default()
}

pub(crate) fn checksum(slice: &[u8]) -> u8 {
    slice
        .iter()
        .fold(0u8, |acc, b| acc.wrapping_sub(*b).wrapping_sub(1))
}

/// A loaded game. The ROM is never written to after loading. The external RAM lives here too since,
/// for battery-backed carts, it belongs to the cartridge rather than the console.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cartridge {
    header: CartridgeHeader,
    #[serde_as(as = "serde_with::Bytes")]
    rom: Vec<u8>,
    #[serde_as(as = "serde_with::Bytes")]
    ram: Vec<u8>,
}

impl Cartridge {
    /// Parses the header of the given image and allocates the external RAM that it asks for.
    pub fn load(bytes: impl Into<Vec<u8>>) -> Result<Self, LoadError> {
        let mut rom = bytes.into();
        let header = CartridgeHeader::extract_from_rom(&rom)?;
        if rom.len() < header.rom_size {
            debug!(
                "Padding ROM from {} bytes to the {} bytes declared in its header",
                rom.len(),
                header.rom_size
            );
            rom.resize(header.rom_size, 0);
        }
        let ram = vec![0; header.ram_size];
        info!("Loaded cartridge {header}");
        Ok(Self { header, rom, ram })
    }

    pub fn header(&self) -> &CartridgeHeader {
        &self.header
    }

    pub fn title(&self) -> &str {
        &self.header.title
    }

    pub fn controller(&self) -> ControllerKind {
        self.header.controller
    }

    pub fn rom(&self) -> &[u8] {
        &self.rom
    }

    pub fn rom_size(&self) -> usize {
        self.header.rom_size
    }

    pub fn ram_size(&self) -> usize {
        self.header.ram_size
    }

    pub fn has_battery(&self) -> bool {
        self.header.has_battery
    }

    /// The current contents of the external RAM. For battery-backed carts, this is the save data.
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    pub(crate) fn ram_mut(&mut self) -> &mut [u8] {
        &mut self.ram
    }

    /// Replaces the external RAM with previously saved data.
    pub fn restore_ram(&mut self, save: &[u8]) -> Result<(), LoadError> {
        if save.len() != self.ram.len() {
            return Err(LoadError::RamSizeMismatch {
                expected: self.ram.len(),
                found: save.len(),
            });
        }
        self.ram.copy_from_slice(save);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(cart_type: u8, rom_code: u8, ram_code: u8) -> Vec<u8> {
        let mut rom = vec![0; 0x150];
        rom[0x134..0x134 + 5].copy_from_slice(b"SHADE");
        rom[0x147] = cart_type;
        rom[0x148] = rom_code;
        rom[0x149] = ram_code;
        rom[0x14D] = checksum(&rom[0x134..0x14D]);
        rom
    }

    #[test]
    fn rejects_short_images() {
        assert_eq!(
            Cartridge::load(vec![0; 0x14F]),
            Err(LoadError::TooSmall { len: 0x14F })
        );
        assert!(Cartridge::load(vec![0; 0x150]).is_ok());
    }

    #[test]
    fn header_fields() {
        let cart = Cartridge::load(image(0x13, 0x05, 0x03)).unwrap();
        let header = cart.header();
        assert_eq!(cart.title(), "SHADE");
        assert_eq!(header.controller, ControllerKind::Mbc3);
        assert_eq!(header.rom_size, 1024 * 1024);
        assert_eq!(header.rom_banks(), 64);
        assert_eq!(cart.ram_size(), 32 * 1024);
        assert_eq!(cart.ram().len(), 32 * 1024);
        assert!(cart.has_battery());
        assert!(!header.has_rtc);
    }

    #[test]
    fn rom_size_table() {
        let expected = [
            32 * 1024,
            64 * 1024,
            128 * 1024,
            256 * 1024,
            512 * 1024,
            1024 * 1024,
            2 * 1024 * 1024,
            4 * 1024 * 1024,
            8 * 1024 * 1024,
        ];
        for (code, size) in expected.into_iter().enumerate() {
            let rom = image(0x19, code as u8, 0);
            let header = CartridgeHeader::extract_from_rom(&rom).unwrap();
            assert_eq!(header.rom_size, size);
        }
        assert_eq!(
            CartridgeHeader::extract_from_rom(&image(0x19, 0x09, 0)),
            Err(LoadError::UnknownRomSize { code: 0x09 })
        );
    }

    #[test]
    fn ram_size_table() {
        let expected = [0, 2 * 1024, 8 * 1024, 32 * 1024, 128 * 1024, 64 * 1024];
        for (code, size) in expected.into_iter().enumerate() {
            let rom = image(0x03, 0, code as u8);
            let header = CartridgeHeader::extract_from_rom(&rom).unwrap();
            assert_eq!(header.ram_size, size);
        }
        assert_eq!(
            CartridgeHeader::extract_from_rom(&image(0x03, 0, 0x06)),
            Err(LoadError::UnknownRamSize { code: 0x06 })
        );
    }

    #[test]
    fn unsupported_controllers_are_rejected() {
        for code in [0x05, 0x06, 0x0B, 0x20, 0xFC, 0xFF] {
            assert_eq!(
                Cartridge::load(image(code, 0, 0)),
                Err(LoadError::UnsupportedController { code })
            );
        }
    }

    #[test]
    fn short_roms_are_padded_to_declared_size() {
        let cart = Cartridge::load(image(0x01, 0x01, 0)).unwrap();
        assert_eq!(cart.rom().len(), 64 * 1024);
    }

    #[test]
    fn title_stops_at_padding() {
        let mut rom = image(0x00, 0, 0);
        rom[0x134..=0x143].copy_from_slice(b"POCKET\0\0\0\0\0\0\0\0\0\x80");
        let cart = Cartridge::load(rom).unwrap();
        assert_eq!(cart.title(), "POCKET");

        let mut rom = image(0x00, 0, 0);
        rom[0x134..=0x143].copy_from_slice(b"SIXTEEN CHARS!!!");
        assert_eq!(Cartridge::load(rom).unwrap().title(), "SIXTEEN CHARS!!!");
    }

    #[test]
    fn title_drops_unprintable_bytes() {
        let mut rom = image(0x00, 0, 0);
        rom[0x134..=0x143].copy_from_slice(b"AB\x01CD\x7F\xC3\xA9EF\nGH\0\0\0");
        let cart = Cartridge::load(rom).unwrap();
        assert_eq!(cart.title(), "ABCDEFGH");
    }

    #[test]
    fn save_data_must_match_ram_size() {
        let mut cart = Cartridge::load(image(0x03, 0, 0x02)).unwrap();
        assert_eq!(
            cart.restore_ram(&[1, 2, 3]),
            Err(LoadError::RamSizeMismatch {
                expected: 8 * 1024,
                found: 3,
            })
        );
        let save = vec![0xAB; 8 * 1024];
        cart.restore_ram(&save).unwrap();
        assert_eq!(cart.ram(), save.as_slice());
    }

    #[test]
    fn rom_bank_masking_policies() {
        assert_eq!(ControllerKind::Mbc1.rom_bank(0), 1);
        assert_eq!(ControllerKind::Mbc1.rom_bank(0x20), 1);
        assert_eq!(ControllerKind::Mbc1.rom_bank(0x3F), 0x1F);
        assert_eq!(ControllerKind::Mbc3.rom_bank(0xFF), 0x7F);
        assert_eq!(ControllerKind::Mbc3.rom_bank(0), 0);
        assert_eq!(ControllerKind::Mbc5.rom_bank(0), 0);
        assert_eq!(ControllerKind::Mbc5.rom_bank(0xFF), 0xFF);
    }
}
