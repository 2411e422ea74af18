use core::arch::asm;

use super::types::VirtualAddress;

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
compile_error!("No frame-base register support on this architecture.");

/// Frame-base register of the immediate caller. Inlined so the value read
/// belongs to the caller's activation record, not this function's. Only
/// meaningful in builds that keep frame-pointer linkage.
#[inline(always)]
pub fn current_frame_base() -> VirtualAddress {
    let out: u64;
    #[cfg(target_arch = "x86_64")]
    unsafe {
        asm!(
            "mov {out}, rbp",
            out = out(reg) out,
            options(nostack, readonly)
        );
    }
    #[cfg(target_arch = "aarch64")]
    unsafe {
        asm!(
            "mov {out}, x29",
            out = out(reg) out,
            options(nostack, readonly)
        );
    }
    VirtualAddress::new(out)
}
