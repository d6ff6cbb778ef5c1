//! Shade is the core of an LR35902 (Game Boy) emulator: the CPU, the memory bus, and the
//! cartridge bank controllers, including the MBC3 real-time clock. It does not draw, play sound,
//! or dispatch interrupts. A driver loads a cartridge, builds an [`Engine`], and steps it.
//!
//! ```no_run
//! let rom = std::fs::read("game.gb").unwrap();
//! let cart = shade::load(rom).unwrap();
//! let mut engine = shade::new_engine(cart);
//! let (steps, last) = engine.run(1_000_000);
//! println!("{last} after {steps} steps");
//! ```

use derive_more::Display;
use derive_more::IsVariant;
use serde::Deserialize;
use serde::Serialize;
use tracing::trace;
use tracing::warn;

pub mod config;
pub mod cpu;
pub mod instruction;
pub mod lookup;
pub mod mem;
pub mod rom;

pub use config::AccessPolicy;
pub use config::Config;
pub use config::ConfigError;
pub use cpu::Cpu;
pub use cpu::CpuState;
pub use instruction::ControlOp;
pub use instruction::Instruction;
pub use lookup::OpTable;
pub use lookup::UnmappedOpcode;
pub use mem::MemoryLike;
pub use mem::MemoryMap;
pub use rom::Cartridge;
pub use rom::LoadError;

/// Parses a cartridge image.
pub fn load(bytes: impl Into<Vec<u8>>) -> Result<Cartridge, LoadError> {
    Cartridge::load(bytes)
}

/// Builds an engine with the default [`Config`].
pub fn new_engine(cart: Cartridge) -> Engine {
    Engine::new(cart)
}

/// Executes one instruction. See [`Engine::step`].
pub fn step(engine: &mut Engine) -> Step {
    engine.step()
}

/// The outcome of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant, Display)]
pub enum Step {
    #[display("continue")]
    Continue,
    #[display("halted: {_0}")]
    Halted(HaltReason),
}

/// Why the engine stopped making progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum HaltReason {
    /// The decoder has no instruction for the bytes at PC. PC is left pointing at them.
    #[display("{_0}")]
    UnmappedOpcode(UnmappedOpcode),
    /// The instruction at `pc` touched `addr`, which has no backing storage. Only reported under
    /// [`AccessPolicy::Strict`].
    #[display("unhandled access to 0x{addr:0>4X} by the instruction @ 0x{pc:0>4X}")]
    BusFault { addr: u16, pc: u16 },
}

/// This is the core emulation primative. It contains the entire state machine of the emulated
/// handheld and is agnostic to usecase and how it is rendered (if at all). It must be stepped
/// forward by a driver, which is also responsible for pacing.
///
/// The engine can be serialized to snapshot a session. The decode table is not part of the
/// snapshot; it is rebuilt on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Engine {
    cpu: Cpu,
    mem: MemoryMap,
    #[serde(skip)]
    ops: OpTable,
}

impl Engine {
    pub fn new(cart: Cartridge) -> Self {
        Self::with_config(cart, Config::default())
    }

    pub fn with_config(cart: Cartridge, config: Config) -> Self {
        Self {
            cpu: Cpu::at_entry_point(config.entry_point),
            mem: MemoryMap::with_policy(cart, config.unhandled_access),
            ops: OpTable::new(),
        }
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn bus(&self) -> &MemoryMap {
        &self.mem
    }

    pub fn bus_mut(&mut self) -> &mut MemoryMap {
        &mut self.mem
    }

    pub fn cartridge(&self) -> &Cartridge {
        self.mem.cartridge()
    }

    /// Decodes the instruction at PC without executing it. Any unhandled access made while
    /// decoding is not held against the next step.
    pub fn peek(&mut self) -> Result<Instruction, UnmappedOpcode> {
        let pc = self.cpu.pc;
        let ops = &self.ops;
        self.mem.without_faults(|mem| ops.decode(mem, pc))
    }

    /// Fetches, decodes, and executes the instruction at PC.
    ///
    /// Once a step halts for an unmapped op code it keeps doing so, since PC does not move. HALT
    /// and STOP are ordinary instructions: the step that runs one continues, and every step after
    /// it idles without fetching until [`Engine::resume`] is called.
    pub fn step(&mut self) -> Step {
        if self.is_suspended() {
            return Step::Continue;
        }
        let pc = self.cpu.pc;
        let instr = match self.ops.decode(&mut self.mem, pc) {
            Ok(instr) => instr,
            Err(err) => {
                warn!("Halting: {err}");
                self.mem.take_fault();
                return Step::Halted(HaltReason::UnmappedOpcode(err));
            }
        };
        trace!("0x{pc:0>4X}: {instr}");
        self.cpu.execute(instr, &mut self.mem);
        match self.mem.take_fault() {
            Some(addr) => Step::Halted(HaltReason::BusFault { addr, pc }),
            None => Step::Continue,
        }
    }

    /// Steps until the engine halts, the CPU suspends itself, or `max_steps` steps have been
    /// taken. Returns the number of steps taken and the last result.
    pub fn run(&mut self, max_steps: usize) -> (usize, Step) {
        let mut last = Step::Continue;
        for taken in 1..=max_steps {
            last = self.step();
            if last.is_halted() || self.is_suspended() {
                return (taken, last);
            }
        }
        (max_steps, last)
    }

    /// Whether the CPU executed HALT or STOP and has not been resumed.
    pub fn is_suspended(&self) -> bool {
        !self.cpu.is_running()
    }

    /// The instruction that suspended the CPU, if it is suspended.
    pub fn suspension(&self) -> Option<ControlOp> {
        match self.cpu.state {
            CpuState::Running => None,
            CpuState::Halted => Some(ControlOp::Halt),
            CpuState::Stopped => Some(ControlOp::Stop),
        }
    }

    /// Wakes a CPU that executed HALT or STOP.
    pub fn resume(&mut self) {
        self.cpu.state = CpuState::Running;
    }
}
