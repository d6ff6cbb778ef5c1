use serde::Deserialize;
use serde::Serialize;
use serde_with::serde_as;
use tracing::trace;
use tracing::warn;

pub mod mbc;

pub use mbc::MemoryBankController;

use crate::config::AccessPolicy;
use crate::rom::Cartridge;

/// What a read with no backing storage returns.
pub const OPEN_BUS: u8 = 0xFF;

/// This trait is used to abstract over the memory map. This is used during testing.
///
/// Reads take `&mut self` since some of them have side effects. Reading an RTC register brings the
/// clock up to date, and an unhandled read may be recorded as a fault.
pub trait MemoryLike {
    fn read_byte(&mut self, addr: u16) -> u8;

    fn write_byte(&mut self, addr: u16, val: u8);
}

/// The `impl FnOnce` in `update_byte` would make `MemoryLike` non-object safe.
pub trait MemoryLikeExt: MemoryLike {
    fn update_byte(&mut self, addr: u16, op: impl FnOnce(&mut u8)) -> u8 {
        let mut val = self.read_byte(addr);
        op(&mut val);
        self.write_byte(addr, val);
        val
    }
}

impl<M: MemoryLike + ?Sized> MemoryLikeExt for M {}

/// The register values left behind by the DMG boot ROM. Anything not listed starts at zero.
const IO_DEFAULTS: &[(u16, u8)] = &[
    (0xFF00, 0xCF),
    (0xFF10, 0x80),
    (0xFF11, 0xBF),
    (0xFF12, 0xF3),
    (0xFF14, 0xBF),
    (0xFF16, 0x3F),
    (0xFF19, 0xBF),
    (0xFF1A, 0x7F),
    (0xFF1B, 0xFF),
    (0xFF1C, 0x9F),
    (0xFF1E, 0xBF),
    (0xFF20, 0xFF),
    (0xFF23, 0xBF),
    (0xFF24, 0x77),
    (0xFF25, 0xF3),
    (0xFF26, 0xF1),
    (0xFF40, 0x91),
    (0xFF41, 0x85),
    (0xFF47, 0xFC),
    (0xFF48, 0xFF),
    (0xFF49, 0xFF),
];

/// The memory bus. Every address the CPU can name is routed from here.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryMap {
    // The MBC, which also owns the cartridge
    mbc: MemoryBankController,
    // The video RAM
    #[serde_as(as = "serde_with::Bytes")]
    vram: [u8; 0x2000],
    // The working RAM
    #[serde_as(as = "serde_with::Bytes")]
    wram: [u8; 0x2000],
    // The object attribute map
    #[serde_as(as = "serde_with::Bytes")]
    oam: [u8; 0xA0],
    #[serde_as(as = "serde_with::Bytes")]
    io: [u8; 0x80],
    // High RAM
    #[serde_as(as = "serde_with::Bytes")]
    hr: [u8; 0x7F],
    /// The interrupt enable register. When indexed, this register is at 0xFFFF.
    pub ie: u8,
    policy: AccessPolicy,
    /// The first unhandled access since the last call to `take_fault`. Only tracked under
    /// [`AccessPolicy::Strict`].
    fault: Option<u16>,
}

impl MemoryMap {
    pub fn new(cart: Cartridge) -> Self {
        Self::with_policy(cart, AccessPolicy::default())
    }

    pub fn with_policy(cart: Cartridge, policy: AccessPolicy) -> Self {
        let mut io = [0; 0x80];
        for (addr, val) in IO_DEFAULTS {
            io[(*addr - 0xFF00) as usize] = *val;
        }
        Self {
            mbc: MemoryBankController::new(cart),
            vram: [0; 0x2000],
            wram: [0; 0x2000],
            oam: [0; 0xA0],
            io,
            hr: [0; 0x7F],
            ie: 0,
            policy,
            fault: None,
        }
    }

    pub fn mbc(&self) -> &MemoryBankController {
        &self.mbc
    }

    pub fn mbc_mut(&mut self) -> &mut MemoryBankController {
        &mut self.mbc
    }

    pub fn cartridge(&self) -> &Cartridge {
        self.mbc.cartridge()
    }

    pub fn policy(&self) -> AccessPolicy {
        self.policy
    }

    /// Returns and clears the address of the first unhandled access, if there was one.
    pub fn take_fault(&mut self) -> Option<u16> {
        self.fault.take()
    }

    /// Runs `f` against the bus without letting it record a fault. A fault that was already
    /// pending stays pending.
    pub fn without_faults<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        let pending = self.fault.take();
        let digest = f(self);
        self.fault = pending;
        digest
    }

    fn unhandled(&mut self, addr: u16, kind: &str) {
        warn!("Unhandled {kind} @ 0x{addr:0>4X}");
        if self.policy == AccessPolicy::Strict && self.fault.is_none() {
            self.fault = Some(addr);
        }
    }
}

impl MemoryLike for MemoryMap {
    fn read_byte(&mut self, addr: u16) -> u8 {
        match addr {
            n @ (0x0000..=0x7FFF | 0xA000..=0xBFFF) => match self.mbc.read_byte(n) {
                Some(byte) => byte,
                None => {
                    self.unhandled(n, "read");
                    OPEN_BUS
                }
            },
            n @ 0x8000..=0x9FFF => self.vram[(n - 0x8000) as usize],
            n @ 0xC000..=0xDFFF => self.wram[(n - 0xC000) as usize],
            // Echo RAM
            n @ 0xE000..=0xFDFF => self.wram[(n - 0xE000) as usize],
            n @ 0xFE00..=0xFE9F => self.oam[(n - 0xFE00) as usize],
            // NOTE: This region *should not* actually be accessed
            n @ 0xFEA0..=0xFEFF => {
                self.unhandled(n, "read");
                OPEN_BUS
            }
            n @ 0xFF00..=0xFF7F => self.io[(n - 0xFF00) as usize],
            n @ 0xFF80..=0xFFFE => self.hr[(n - 0xFF80) as usize],
            0xFFFF => self.ie,
        }
    }

    fn write_byte(&mut self, addr: u16, val: u8) {
        trace!("Write 0x{val:0>2X} to 0x{addr:0>4X}");
        match addr {
            n @ (0x0000..=0x7FFF | 0xA000..=0xBFFF) => {
                if !self.mbc.write_byte(n, val) {
                    self.unhandled(n, "write");
                }
            }
            n @ 0x8000..=0x9FFF => self.vram[(n - 0x8000) as usize] = val,
            n @ 0xC000..=0xDFFF => self.wram[(n - 0xC000) as usize] = val,
            // Echo RAM
            n @ 0xE000..=0xFDFF => self.wram[(n - 0xE000) as usize] = val,
            n @ 0xFE00..=0xFE9F => self.oam[(n - 0xFE00) as usize] = val,
            n @ 0xFEA0..=0xFEFF => self.unhandled(n, "write"),
            n @ 0xFF00..=0xFF7F => self.io[(n - 0xFF00) as usize] = val,
            n @ 0xFF80..=0xFFFE => self.hr[(n - 0xFF80) as usize] = val,
            0xFFFF => self.ie = val,
        }
    }
}

#[cfg(test)]
impl MemoryLike for Vec<u8> {
    fn read_byte(&mut self, addr: u16) -> u8 {
        self[addr as usize]
    }

    fn write_byte(&mut self, addr: u16, val: u8) {
        self[addr as usize] = val;
    }
}

#[cfg(test)]
impl MemoryMap {
    /// A bus over a 32 KiB ROM-only cart with no external RAM.
    pub(crate) fn construct() -> Self {
        let mut rom = vec![0; 0x8000];
        rom[0x14D] = crate::rom::checksum(&rom[0x134..0x14D]);
        match Cartridge::load(rom) {
            Ok(cart) => Self::new(cart),
            Err(e) => panic!("{e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_ram_mirrors_work_ram() {
        let mut mem = MemoryMap::construct();
        mem.write_byte(0xC123, 0x42);
        assert_eq!(mem.read_byte(0xE123), 0x42);
        mem.write_byte(0xFDFF, 0x24);
        assert_eq!(mem.read_byte(0xDDFF), 0x24);
    }

    #[test]
    fn io_starts_at_post_boot_values() {
        let mut mem = MemoryMap::construct();
        assert_eq!(mem.read_byte(0xFF00), 0xCF);
        assert_eq!(mem.read_byte(0xFF40), 0x91);
        assert_eq!(mem.read_byte(0xFF47), 0xFC);
        assert_eq!(mem.read_byte(0xFF05), 0x00);
    }

    #[test]
    fn every_region_round_trips() {
        let mut mem = MemoryMap::construct();
        for addr in [0x8000, 0x9FFF, 0xC000, 0xDFFF, 0xFE00, 0xFE9F, 0xFF80, 0xFFFE, 0xFFFF] {
            mem.write_byte(addr, 0x5A);
            assert_eq!(mem.read_byte(addr), 0x5A, "0x{addr:0>4X}");
        }
        assert_eq!(mem.ie, 0x5A);
    }

    #[test]
    fn rom_is_not_writable() {
        let mut mem = MemoryMap::construct();
        mem.write_byte(0x0150, 0x99);
        assert_eq!(mem.read_byte(0x0150), 0x00);
    }

    #[test]
    fn unusable_region_reads_sentinel() {
        let mut mem = MemoryMap::construct();
        mem.write_byte(0xFEA0, 0x12);
        assert_eq!(mem.read_byte(0xFEA0), OPEN_BUS);
        assert_eq!(mem.take_fault(), None);
    }

    #[test]
    fn strict_policy_records_the_first_fault() {
        let mut mem = MemoryMap::construct();
        mem.policy = AccessPolicy::Strict;
        assert_eq!(mem.read_byte(0xFEFF), OPEN_BUS);
        // The cart has no external RAM. The second fault does not replace the first
        mem.write_byte(0xA000, 0x01);
        assert_eq!(mem.take_fault(), Some(0xFEFF));
        assert_eq!(mem.take_fault(), None);
    }

    #[test]
    fn faults_inside_without_faults_are_forgotten() {
        let mut mem = MemoryMap::construct();
        mem.policy = AccessPolicy::Strict;
        assert_eq!(mem.without_faults(|mem| mem.read_byte(0xFEA0)), OPEN_BUS);
        assert_eq!(mem.take_fault(), None);

        mem.write_byte(0xFEB0, 0x00);
        mem.without_faults(|mem| mem.read_byte(0xFEA0));
        assert_eq!(mem.take_fault(), Some(0xFEB0));
    }
}
