use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use typed_builder::TypedBuilder;
use z80dbg_core::{CpuState, Emulator, RunSummary, StatePatch, StopReason};

/// Host-side bound on a `run` when `--max-steps` is not given.
pub const DEFAULT_MAX_STEPS: u64 = 1_000_000;

/// File extensions that are assembled instead of loaded raw.
const SOURCE_EXTENSIONS: [&str; 3] = ["asm", "z80", "s"];

pub const USAGE: &str = "usage: z80dbg <program.bin|program.asm> [--org ADDR] [--break ADDR]... \
                         [--max-steps N] [--step N] [--trace]";

#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct RunConfig {
    pub program: PathBuf,
    /// Load address. Defaults to the source's `ORG`, or 0x0000 for binaries.
    #[builder(default)]
    pub origin: Option<u16>,
    #[builder(default)]
    pub breakpoints: Vec<u16>,
    #[builder(default = DEFAULT_MAX_STEPS)]
    pub max_steps: u64,
    /// Single-step this many instructions instead of running.
    #[builder(default)]
    pub step: Option<u64>,
    /// Log every executed instruction.
    #[builder(default = false)]
    pub trace: bool,
}

/// Parse a number given as decimal, `0x`/`$` hex or `h`-suffixed hex.
pub fn parse_number(text: &str) -> Result<u64> {
    let lower = text.trim().to_ascii_lowercase();
    let parsed = if let Some(hex) = lower.strip_prefix("0x").or_else(|| lower.strip_prefix('$')) {
        u64::from_str_radix(hex, 16)
    } else if let Some(hex) = lower.strip_suffix('h') {
        u64::from_str_radix(hex, 16)
    } else {
        lower.parse()
    };
    parsed.with_context(|| format!("invalid number '{text}'"))
}

fn parse_address(text: &str) -> Result<u16> {
    let value = parse_number(text)?;
    u16::try_from(value).map_err(|_| anyhow!("address '{text}' is outside 0x0000..=0xFFFF"))
}

/// Parse the command line (without the program name).
pub fn parse_args<I>(args: I) -> Result<RunConfig>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut program = None;
    let mut origin = None;
    let mut breakpoints = Vec::new();
    let mut max_steps = DEFAULT_MAX_STEPS;
    let mut step = None;
    let mut trace = false;

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| anyhow!("{flag} needs a value\n{USAGE}"))
        };
        match arg.as_str() {
            "--org" => origin = Some(parse_address(&value("--org")?)?),
            "--break" => breakpoints.push(parse_address(&value("--break")?)?),
            "--max-steps" => max_steps = parse_number(&value("--max-steps")?)?,
            "--step" => step = Some(parse_number(&value("--step")?)?),
            "--trace" => trace = true,
            flag if flag.starts_with("--") => bail!("unknown option '{flag}'\n{USAGE}"),
            path if program.is_none() => program = Some(PathBuf::from(path)),
            extra => bail!("unexpected argument '{extra}'\n{USAGE}"),
        }
    }

    let Some(program) = program else {
        bail!("no program given\n{USAGE}");
    };
    Ok(RunConfig::builder()
        .program(program)
        .origin(origin)
        .breakpoints(breakpoints)
        .max_steps(max_steps)
        .step(step)
        .trace(trace)
        .build())
}

/// Bytes to load and where they go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub bytes: Vec<u8>,
    pub origin: u16,
}

pub fn is_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Read a raw binary, or assemble a source file.
pub fn read_program(path: &Path, origin: Option<u16>) -> Result<Program> {
    if is_source(path) {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read source '{}'", path.display()))?;
        let assembly = z80dbg_asm::assemble(&source)
            .with_context(|| format!("failed to assemble '{}'", path.display()))?;
        log::info!(
            "assembled '{}': {} bytes, {} labels",
            path.display(),
            assembly.bytes.len(),
            assembly.labels.len()
        );
        Ok(Program {
            bytes: assembly.bytes,
            origin: origin.unwrap_or(assembly.origin),
        })
    } else {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read binary '{}'", path.display()))?;
        if bytes.len() > 0x10000 {
            bail!("'{}' is larger than 64K", path.display());
        }
        Ok(Program {
            bytes,
            origin: origin.unwrap_or(0),
        })
    }
}

/// Reset, load, set breakpoints and run `program` as `config` asks.
pub fn execute(emu: &mut Emulator, config: &RunConfig, program: &Program) -> RunSummary {
    emu.reset();
    emu.load_program(&program.bytes, program.origin);
    emu.set_state(&StatePatch::builder().pc(program.origin).build());
    for &addr in &config.breakpoints {
        emu.set_breakpoint(addr);
    }

    match config.step {
        Some(count) => {
            let mut instructions = 0;
            let mut reason = StopReason::StepLimit;
            while instructions < count {
                if !emu.step() {
                    reason = StopReason::Halted;
                    break;
                }
                instructions += 1;
            }
            RunSummary {
                reason,
                pc: emu.pc(),
                instructions,
            }
        }
        None => emu.run_for(config.max_steps),
    }
}

pub fn describe(summary: &RunSummary) -> String {
    let reason = match summary.reason {
        StopReason::Halted => "halted".to_string(),
        StopReason::Breakpoint(addr) => format!("breakpoint at 0x{addr:04X}"),
        StopReason::StepLimit => "step limit reached".to_string(),
    };
    format!(
        "{reason} (PC=0x{:04X}, {} instructions)",
        summary.pc, summary.instructions
    )
}

/// Multi-line register dump.
pub fn format_registers(state: &CpuState) -> String {
    let regs = &state.registers;
    let alt = &regs.alt;
    let pair = |high: u8, low: u8| u16::from_be_bytes([high, low]);
    let flags = regs.flags;
    let set: Vec<&str> = [
        (flags.s, "S"),
        (flags.z, "Z"),
        (flags.h, "H"),
        (flags.pv, "PV"),
        (flags.n, "N"),
        (flags.c, "C"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();

    format!(
        "AF ={:04X} BC ={:04X} DE ={:04X} HL ={:04X}\n\
         AF'={:04X} BC'={:04X} DE'={:04X} HL'={:04X}\n\
         IX ={:04X} IY ={:04X} SP ={:04X} PC ={:04X}\n\
         I={:02X} R={:02X} IM={} IFF={} halted={}\n\
         flags: {}",
        regs.af(),
        regs.bc(),
        regs.de(),
        regs.hl(),
        pair(alt.a, alt.f()),
        pair(alt.b, alt.c),
        pair(alt.d, alt.e),
        pair(alt.h, alt.l),
        regs.ix,
        regs.iy,
        regs.sp,
        regs.pc,
        regs.i,
        regs.r,
        state.interrupt_mode,
        state.interrupts_enabled as u8,
        state.halted,
        if set.is_empty() { "-".to_string() } else { set.join(" ") },
    )
}

/// Load and run the configured program, printing the outcome.
pub fn run(config: &RunConfig) -> Result<()> {
    let program = read_program(&config.program, config.origin)?;
    log::info!(
        "loading {} bytes at 0x{:04X}",
        program.bytes.len(),
        program.origin
    );

    let mut emu = Emulator::new();
    let summary = execute(&mut emu, config, &program);

    println!("{}", describe(&summary));
    let faults = emu.faults().count();
    if let Some(fault) = emu.last_fault() {
        println!("{faults} decode fault(s), last: {fault}");
    }
    println!("{}", format_registers(&emu.state()));
    println!("next: {}", emu.disassemble(emu.pc()));
    Ok(())
}
