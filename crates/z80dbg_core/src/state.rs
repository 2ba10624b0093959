use typed_builder::TypedBuilder;

use crate::cpu::{Cpu, Flags, Registers};

/// A deep copy of the whole processor state.
///
/// Returned by [`Emulator::state`](crate::Emulator::state); it owns its
/// data, so changing it never touches the live machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuState {
    pub registers: Registers,
    pub halted: bool,
    pub interrupts_enabled: bool,
    pub interrupt_mode: u8,
}

impl From<&Cpu> for CpuState {
    fn from(cpu: &Cpu) -> Self {
        Self {
            registers: cpu.regs,
            halted: cpu.halted,
            interrupts_enabled: cpu.interrupts_enabled,
            interrupt_mode: cpu.interrupt_mode,
        }
    }
}

/// A partial state update: one optional slot per register and flag.
///
/// Only the slots that are `Some` are written; everything else keeps its
/// live value. When both a whole F value and individual flags are given,
/// F is applied first and the individual flags win.
///
/// ```
/// use z80dbg_core::StatePatch;
///
/// let patch = StatePatch::builder().a(0x42).pc(0x0100).flag_c(true).build();
/// assert_eq!(patch.a, Some(0x42));
/// assert_eq!(patch.b, None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, TypedBuilder)]
#[builder(field_defaults(default, setter(strip_option)))]
pub struct StatePatch {
    pub a: Option<u8>,
    pub f: Option<u8>,
    pub b: Option<u8>,
    pub c: Option<u8>,
    pub d: Option<u8>,
    pub e: Option<u8>,
    pub h: Option<u8>,
    pub l: Option<u8>,

    pub flag_s: Option<bool>,
    pub flag_z: Option<bool>,
    pub flag_h: Option<bool>,
    pub flag_pv: Option<bool>,
    pub flag_n: Option<bool>,
    pub flag_c: Option<bool>,

    pub alt_a: Option<u8>,
    pub alt_f: Option<u8>,
    pub alt_b: Option<u8>,
    pub alt_c: Option<u8>,
    pub alt_d: Option<u8>,
    pub alt_e: Option<u8>,
    pub alt_h: Option<u8>,
    pub alt_l: Option<u8>,

    pub alt_flag_s: Option<bool>,
    pub alt_flag_z: Option<bool>,
    pub alt_flag_h: Option<bool>,
    pub alt_flag_pv: Option<bool>,
    pub alt_flag_n: Option<bool>,
    pub alt_flag_c: Option<bool>,

    pub i: Option<u8>,
    pub r: Option<u8>,
    pub ix: Option<u16>,
    pub iy: Option<u16>,
    pub sp: Option<u16>,
    pub pc: Option<u16>,

    pub halted: Option<bool>,
    pub interrupts_enabled: Option<bool>,
    /// Clamped to 2.
    pub interrupt_mode: Option<u8>,
}

fn assign<T: Copy>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

#[allow(clippy::too_many_arguments)]
fn patch_flags(
    flags: &mut Flags,
    s: Option<bool>,
    z: Option<bool>,
    h: Option<bool>,
    pv: Option<bool>,
    n: Option<bool>,
    c: Option<bool>,
) {
    assign(&mut flags.s, s);
    assign(&mut flags.z, z);
    assign(&mut flags.h, h);
    assign(&mut flags.pv, pv);
    assign(&mut flags.n, n);
    assign(&mut flags.c, c);
}

impl StatePatch {
    /// Merge the present slots into `cpu`.
    pub fn apply(&self, cpu: &mut Cpu) {
        let regs = &mut cpu.regs;

        assign(&mut regs.a, self.a);
        if let Some(f) = self.f {
            regs.set_f(f);
        }
        assign(&mut regs.b, self.b);
        assign(&mut regs.c, self.c);
        assign(&mut regs.d, self.d);
        assign(&mut regs.e, self.e);
        assign(&mut regs.h, self.h);
        assign(&mut regs.l, self.l);
        patch_flags(
            &mut regs.flags,
            self.flag_s,
            self.flag_z,
            self.flag_h,
            self.flag_pv,
            self.flag_n,
            self.flag_c,
        );

        let alt = &mut regs.alt;
        assign(&mut alt.a, self.alt_a);
        if let Some(f) = self.alt_f {
            alt.flags = Flags::from_byte(f);
        }
        assign(&mut alt.b, self.alt_b);
        assign(&mut alt.c, self.alt_c);
        assign(&mut alt.d, self.alt_d);
        assign(&mut alt.e, self.alt_e);
        assign(&mut alt.h, self.alt_h);
        assign(&mut alt.l, self.alt_l);
        patch_flags(
            &mut alt.flags,
            self.alt_flag_s,
            self.alt_flag_z,
            self.alt_flag_h,
            self.alt_flag_pv,
            self.alt_flag_n,
            self.alt_flag_c,
        );

        assign(&mut regs.i, self.i);
        assign(&mut regs.r, self.r);
        assign(&mut regs.ix, self.ix);
        assign(&mut regs.iy, self.iy);
        assign(&mut regs.sp, self.sp);
        assign(&mut regs.pc, self.pc);

        assign(&mut cpu.halted, self.halted);
        assign(&mut cpu.interrupts_enabled, self.interrupts_enabled);
        assign(&mut cpu.interrupt_mode, self.interrupt_mode.map(|im| im.min(2)));
    }
}

impl From<&CpuState> for StatePatch {
    /// A patch that restores every field of `state`.
    fn from(state: &CpuState) -> Self {
        let regs = &state.registers;
        let flags = regs.flags;
        let alt = &regs.alt;
        Self {
            a: Some(regs.a),
            f: Some(flags.to_byte()),
            b: Some(regs.b),
            c: Some(regs.c),
            d: Some(regs.d),
            e: Some(regs.e),
            h: Some(regs.h),
            l: Some(regs.l),
            flag_s: Some(flags.s),
            flag_z: Some(flags.z),
            flag_h: Some(flags.h),
            flag_pv: Some(flags.pv),
            flag_n: Some(flags.n),
            flag_c: Some(flags.c),
            alt_a: Some(alt.a),
            alt_f: Some(alt.flags.to_byte()),
            alt_b: Some(alt.b),
            alt_c: Some(alt.c),
            alt_d: Some(alt.d),
            alt_e: Some(alt.e),
            alt_h: Some(alt.h),
            alt_l: Some(alt.l),
            alt_flag_s: Some(alt.flags.s),
            alt_flag_z: Some(alt.flags.z),
            alt_flag_h: Some(alt.flags.h),
            alt_flag_pv: Some(alt.flags.pv),
            alt_flag_n: Some(alt.flags.n),
            alt_flag_c: Some(alt.flags.c),
            i: Some(regs.i),
            r: Some(regs.r),
            ix: Some(regs.ix),
            iy: Some(regs.iy),
            sp: Some(regs.sp),
            pc: Some(regs.pc),
            halted: Some(state.halted),
            interrupts_enabled: Some(state.interrupts_enabled),
            interrupt_mode: Some(state.interrupt_mode),
        }
    }
}

impl From<CpuState> for StatePatch {
    fn from(state: CpuState) -> Self {
        Self::from(&state)
    }
}
