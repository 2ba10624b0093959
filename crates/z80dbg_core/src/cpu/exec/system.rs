use crate::cpu::Cpu;

impl Cpu {
    pub(super) fn exec_halt(&mut self) {
        log::debug!("HALT at 0x{:04X}", self.regs.pc.wrapping_sub(1));
        self.halted = true;
    }

    pub(super) fn exec_di(&mut self) {
        self.interrupts_enabled = false;
    }

    pub(super) fn exec_ei(&mut self) {
        self.interrupts_enabled = true;
    }

    pub(super) fn exec_ex_af(&mut self) {
        self.regs.exchange_af();
    }

    pub(super) fn exec_exx(&mut self) {
        self.regs.exchange_pairs();
    }

    pub(super) fn exec_ex_de_hl(&mut self) {
        let de = self.regs.de();
        let hl = self.regs.hl();
        self.regs.set_de(hl);
        self.regs.set_hl(de);
    }
}
