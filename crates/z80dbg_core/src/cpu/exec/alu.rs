use crate::cpu::Cpu;

impl Cpu {
    pub(super) fn exec_add_hl_rp(&mut self, opcode: u8) {
        let value = self.read_rp((opcode >> 4) & 0x03);
        let result = self.alu_add16(self.regs.hl(), value);
        self.regs.set_hl(result);
    }

    /// RLCA / RRCA / RLA / RRA.
    ///
    /// Same rotation as the CB forms, but S, Z and P/V are left alone.
    pub(super) fn exec_rotate_a(&mut self, opcode: u8) {
        let saved = self.regs.flags;
        let a = self.regs.a;
        let result = self.alu_rotate((opcode >> 3) & 0x03, a);
        self.regs.a = result;
        let flags = &mut self.regs.flags;
        flags.s = saved.s;
        flags.z = saved.z;
        flags.pv = saved.pv;
    }

    pub(super) fn exec_cpl(&mut self) {
        self.regs.a = !self.regs.a;
        self.regs.flags.h = true;
        self.regs.flags.n = true;
    }

    pub(super) fn exec_scf(&mut self) {
        let flags = &mut self.regs.flags;
        flags.h = false;
        flags.n = false;
        flags.c = true;
    }

    pub(super) fn exec_ccf(&mut self) {
        let flags = &mut self.regs.flags;
        flags.h = flags.c;
        flags.n = false;
        flags.c = !flags.c;
    }
}
