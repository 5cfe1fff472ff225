// TEAM_431: Console output sink for kernel diagnostics.
// The serial/VGA drivers live outside this crate; whoever owns the
// output device installs a callback with `set_output`. With no callback
// installed, output is discarded.

use core::fmt::{self, Write};
use core::sync::atomic::{AtomicPtr, Ordering};

type OutputFn = fn(&str);

static OUTPUT: AtomicPtr<()> = AtomicPtr::new(core::ptr::null_mut());

/// Install the function that receives console output.
pub fn set_output(callback: OutputFn) {
    OUTPUT.store(callback as *mut (), Ordering::SeqCst);
}

/// Detach the current output function.
pub fn clear_output() {
    OUTPUT.store(core::ptr::null_mut(), Ordering::SeqCst);
}

pub fn has_output() -> bool {
    !OUTPUT.load(Ordering::SeqCst).is_null()
}

struct CallbackWriter(OutputFn);

impl Write for CallbackWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        (self.0)(s);
        Ok(())
    }
}

pub fn _print(args: fmt::Arguments) {
    let ptr = OUTPUT.load(Ordering::SeqCst);
    if ptr.is_null() {
        return;
    }
    // SAFETY: OUTPUT only ever holds null or a pointer stored by `set_output`,
    // which came from a valid `fn(&str)`.
    let callback: OutputFn = unsafe { core::mem::transmute::<*mut (), OutputFn>(ptr) };
    let _ = CallbackWriter(callback).write_fmt(args);
}

#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => ($crate::console::_print(format_args!($($arg)*)));
}

#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)));
}
