//! The real-time clock found on some MBC3 carts.

use serde::Deserialize;
use serde::Serialize;
use time::Duration;
use time::OffsetDateTime;
use tracing::debug;

/// Bit 0 of the day-high register: bit 8 of the day counter.
const DAY_HIGH_BIT: u8 = 0x01;
/// Bit 6 of the day-high register: the clock is stopped.
const HALT_BIT: u8 = 0x40;
/// Bit 7 of the day-high register: the day counter has wrapped past 511.
const OVERFLOW_BIT: u8 = 0x80;

/// The RTC registers, as selected by writing 0x08..=0x0C to 0x4000..0x6000.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
#[repr(u8)]
pub enum RtcRegister {
    Seconds = 0x08,
    Minutes = 0x09,
    Hours = 0x0A,
    DaysLow = 0x0B,
    DaysHigh = 0x0C,
}

impl RtcRegister {
    pub const fn from_select(value: u8) -> Option<Self> {
        match value {
            0x08 => Some(Self::Seconds),
            0x09 => Some(Self::Minutes),
            0x0A => Some(Self::Hours),
            0x0B => Some(Self::DaysLow),
            0x0C => Some(Self::DaysHigh),
            _ => None,
        }
    }
}

/// One copy of the clock's registers.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct RtcRegisters {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    /// The lower eight bits of the day counter.
    pub days_low: u8,
    /// Bit 0 is bit 8 of the day counter, bit 6 is the halt flag, and bit 7 is the overflow flag.
    pub days_high: u8,
}

impl RtcRegisters {
    /// The 9-bit day counter.
    pub const fn total_days(&self) -> u16 {
        (((self.days_high & DAY_HIGH_BIT) as u16) << 8) | self.days_low as u16
    }

    pub const fn is_halted(&self) -> bool {
        self.days_high & HALT_BIT != 0
    }

    pub const fn has_overflowed(&self) -> bool {
        self.days_high & OVERFLOW_BIT != 0
    }

    pub const fn get(&self, reg: RtcRegister) -> u8 {
        match reg {
            RtcRegister::Seconds => self.seconds,
            RtcRegister::Minutes => self.minutes,
            RtcRegister::Hours => self.hours,
            RtcRegister::DaysLow => self.days_low,
            RtcRegister::DaysHigh => self.days_high,
        }
    }

    /// Ripples the elapsed seconds through the registers.
    fn advance(&mut self, elapsed: u64) {
        let total = self.seconds as u64 + elapsed;
        self.seconds = (total % 60) as u8;
        let total = self.minutes as u64 + total / 60;
        self.minutes = (total % 60) as u8;
        let total = self.hours as u64 + total / 60;
        self.hours = (total % 24) as u8;
        let days = self.total_days() as u64 + total / 24;
        if days > 0x1FF {
            self.days_high |= OVERFLOW_BIT;
        }
        let [high, low] = ((days & 0x1FF) as u16).to_be_bytes();
        self.days_low = low;
        self.days_high = (self.days_high & !DAY_HIGH_BIT) | high;
    }
}

/// The clock itself. Time is tracked against the wall clock: rather than ticking, the registers
/// are brought up to date whenever they are observed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rtc {
    live: RtcRegisters,
    /// The snapshot taken when the clock was latched. Reads see this instead of the live
    /// registers until the latch is cleared.
    latched: Option<RtcRegisters>,
    last_sync: OffsetDateTime,
}

impl Default for Rtc {
    fn default() -> Self {
        Self::new()
    }
}

impl Rtc {
    pub fn new() -> Self {
        Self::with_registers(RtcRegisters::default(), OffsetDateTime::now_utc())
    }

    pub fn with_registers(live: RtcRegisters, last_sync: OffsetDateTime) -> Self {
        Self {
            live,
            latched: None,
            last_sync,
        }
    }

    /// The live registers as of the last refresh.
    pub fn registers(&self) -> RtcRegisters {
        self.live
    }

    pub fn last_sync(&self) -> OffsetDateTime {
        self.last_sync
    }

    pub fn is_halted(&self) -> bool {
        self.live.is_halted()
    }

    pub fn is_latched(&self) -> bool {
        self.latched.is_some()
    }

    pub fn total_days(&self) -> u16 {
        self.live.total_days()
    }

    pub fn has_overflowed(&self) -> bool {
        self.live.has_overflowed()
    }

    pub fn refresh(&mut self) {
        self.refresh_at(OffsetDateTime::now_utc())
    }

    /// Brings the live registers up to `now`. Only whole seconds are consumed; the remainder is
    /// kept for the next refresh. A halted clock does not move.
    pub fn refresh_at(&mut self, now: OffsetDateTime) {
        if self.is_halted() {
            return;
        }
        let elapsed = (now - self.last_sync).whole_seconds();
        if elapsed <= 0 {
            return;
        }
        self.live.advance(elapsed as u64);
        self.last_sync += Duration::seconds(elapsed);
    }

    pub fn latch(&mut self) {
        self.latch_at(OffsetDateTime::now_utc())
    }

    /// Refreshes the clock and freezes a copy of it for reading.
    pub fn latch_at(&mut self, now: OffsetDateTime) {
        self.refresh_at(now);
        debug!("Latching RTC: {:?}", self.live);
        self.latched = Some(self.live);
    }

    pub fn unlatch(&mut self) {
        self.latched = None;
    }

    pub fn read_register(&mut self, reg: RtcRegister) -> u8 {
        self.read_register_at(reg, OffsetDateTime::now_utc())
    }

    /// Reads from the latched snapshot if there is one, otherwise refreshes and reads the live
    /// registers.
    pub fn read_register_at(&mut self, reg: RtcRegister, now: OffsetDateTime) -> u8 {
        if let Some(snapshot) = self.latched {
            return snapshot.get(reg);
        }
        self.refresh_at(now);
        self.live.get(reg)
    }

    pub fn write_register(&mut self, reg: RtcRegister, value: u8) {
        self.write_register_at(reg, value, OffsetDateTime::now_utc())
    }

    /// Writes go to the live registers, even while latched. Time elapsed before the write is
    /// applied first so that it is not counted against the new value.
    pub fn write_register_at(&mut self, reg: RtcRegister, value: u8, now: OffsetDateTime) {
        let was_halted = self.is_halted();
        self.refresh_at(now);
        match reg {
            RtcRegister::Seconds => self.live.seconds = value % 60,
            RtcRegister::Minutes => self.live.minutes = value % 60,
            RtcRegister::Hours => self.live.hours = value % 24,
            RtcRegister::DaysLow => self.live.days_low = value,
            RtcRegister::DaysHigh => {
                self.live.days_high = value & (DAY_HIGH_BIT | HALT_BIT | OVERFLOW_BIT)
            }
        }
        // Resuming must not count the time spent halted
        if was_halted && !self.is_halted() {
            self.last_sync = now;
        }
    }

    pub fn set_halt(&mut self, halt: bool) {
        let days_high = if halt {
            self.live.days_high | HALT_BIT
        } else {
            self.live.days_high & !HALT_BIT
        };
        self.write_register(RtcRegister::DaysHigh, days_high);
    }

    #[cfg(test)]
    pub(crate) fn rewind(&mut self, secs: i64) {
        self.last_sync -= Duration::seconds(secs);
    }
}
