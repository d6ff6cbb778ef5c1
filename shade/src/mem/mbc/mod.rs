//! The bank controller sits between the bus and the cartridge. It owns the banking registers and
//! decides which cartridge byte (or RTC register) an address in 0x0000..0x8000 or
//! 0xA000..0xC000 refers to.

use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

pub mod rtc;

use rtc::Rtc;
use rtc::RtcRegister;

use crate::rom::Cartridge;
use crate::rom::ControllerKind;
use crate::rom::RAM_BANK_SIZE;
use crate::rom::ROM_BANK_SIZE;

/// What the external RAM window reads as while it is disabled.
pub const DISABLED_RAM: u8 = 0xFF;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBankController {
    kind: ControllerKind,
    cart: Cartridge,
    /// The bank mapped into 0x4000..0x8000, already masked.
    rom_bank: u8,
    /// Either a RAM bank or, on MBC3, an RTC register select (0x08..=0x0C).
    ram_bank: u8,
    ram_enabled: bool,
    /// MBC1's banking mode. Recorded but does not change the mapping.
    mode: bool,
    rtc: Option<Rtc>,
}

impl MemoryBankController {
    pub fn new(cart: Cartridge) -> Self {
        let kind = cart.controller();
        let rtc = cart.header().has_rtc.then(Rtc::new);
        Self {
            kind,
            cart,
            rom_bank: 1,
            ram_bank: 0,
            // Without a controller there is nothing to gate the RAM
            ram_enabled: kind == ControllerKind::RomOnly,
            mode: false,
            rtc,
        }
    }

    pub fn kind(&self) -> ControllerKind {
        self.kind
    }

    pub fn cartridge(&self) -> &Cartridge {
        &self.cart
    }

    pub fn cartridge_mut(&mut self) -> &mut Cartridge {
        &mut self.cart
    }

    pub fn rom_bank(&self) -> u8 {
        self.rom_bank
    }

    pub fn ram_bank(&self) -> u8 {
        self.ram_bank
    }

    pub fn ram_enabled(&self) -> bool {
        self.ram_enabled
    }

    pub fn mode(&self) -> bool {
        self.mode
    }

    pub fn rtc(&self) -> Option<&Rtc> {
        self.rtc.as_ref()
    }

    pub fn rtc_mut(&mut self) -> Option<&mut Rtc> {
        self.rtc.as_mut()
    }

    /// The RTC register currently mapped into the external RAM window, if any.
    fn rtc_select(&self) -> Option<RtcRegister> {
        match self.kind {
            ControllerKind::Mbc3 => RtcRegister::from_select(self.ram_bank),
            _ => None,
        }
    }

    /// Reads from ROM or the external RAM window. `None` means the address has no backing storage
    /// under the current banking.
    pub fn read_byte(&mut self, addr: u16) -> Option<u8> {
        match addr {
            n @ 0x0000..=0x3FFF => self.cart.rom().get(n as usize).copied(),
            n @ 0x4000..=0x7FFF => {
                let index = self.rom_bank as usize * ROM_BANK_SIZE + (n as usize - 0x4000);
                self.cart.rom().get(index).copied()
            }
            n @ 0xA000..=0xBFFF => self.read_external(n),
            _ => None,
        }
    }

    /// Writes to the control registers or the external RAM window. Returns `false` if the write
    /// landed nowhere.
    pub fn write_byte(&mut self, addr: u16, value: u8) -> bool {
        match addr {
            n @ 0x0000..=0x7FFF => {
                self.control(n, value);
                true
            }
            n @ 0xA000..=0xBFFF => self.write_external(n, value),
            _ => false,
        }
    }

    fn control(&mut self, addr: u16, value: u8) {
        match (self.kind, addr) {
            (ControllerKind::RomOnly, _) => {}
            (_, 0x0000..=0x1FFF) => self.ram_enabled = (value & 0x0F) == 0x0A,
            (kind, 0x2000..=0x3FFF) => {
                self.rom_bank = kind.rom_bank(value);
                debug!("Switched to ROM bank {}", self.rom_bank);
            }
            (ControllerKind::Mbc3, 0x4000..=0x5FFF)
                if RtcRegister::from_select(value).is_some() =>
            {
                self.ram_bank = value;
                debug!("Selected RTC register 0x{value:0>2X}");
            }
            (_, 0x4000..=0x5FFF) => {
                self.ram_bank = value & 0x03;
                debug!("Switched to RAM bank {}", self.ram_bank);
            }
            (ControllerKind::Mbc1, _) => self.mode = value & 0x01 == 0x01,
            (ControllerKind::Mbc3, _) => match (value, self.rtc.as_mut()) {
                (0x00, Some(rtc)) => rtc.unlatch(),
                (0x01, Some(rtc)) => rtc.latch(),
                _ => {}
            },
            (ControllerKind::Mbc5, _) => {}
        }
    }

    fn read_external(&mut self, addr: u16) -> Option<u8> {
        if !self.ram_enabled {
            return Some(DISABLED_RAM);
        }
        if let Some(reg) = self.rtc_select() {
            return self.rtc.as_mut().map(|rtc| rtc.read_register(reg));
        }
        let index = self.ram_index(addr);
        self.cart.ram_mut().get(index).copied()
    }

    fn write_external(&mut self, addr: u16, value: u8) -> bool {
        if !self.ram_enabled {
            return true;
        }
        if let Some(reg) = self.rtc_select() {
            return match self.rtc.as_mut() {
                Some(rtc) => {
                    rtc.write_register(reg, value);
                    true
                }
                None => false,
            };
        }
        let index = self.ram_index(addr);
        match self.cart.ram_mut().get_mut(index) {
            Some(byte) => {
                *byte = value;
                true
            }
            None => false,
        }
    }

    fn ram_index(&self, addr: u16) -> usize {
        (addr as usize - 0xA000) + self.ram_bank as usize * RAM_BANK_SIZE
    }
}
