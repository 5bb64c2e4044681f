use std::sync::{
    OnceLock,
    atomic::{AtomicBool, Ordering},
};

static RECEIVED_CTRL_C: AtomicBool = AtomicBool::new(false);
static HANDLER_INSTALLED: OnceLock<()> = OnceLock::new();

/// Installs a SIGINT/SIGTERM handler. The first signal only raises a flag which running
/// algorithms observe through [`crate::algorithm::CtrlC`]; a second signal terminates the process.
pub fn initialize() {
    HANDLER_INSTALLED.get_or_init(|| {
        if let Err(err) = ctrlc::set_handler(|| {
            if RECEIVED_CTRL_C.swap(true, Ordering::Relaxed) {
                std::process::exit(130);
            }
            log::warn!("Received termination signal; finishing the current phase");
        }) {
            log::warn!("signal handling: failed to install handler err={err}");
        }
    });
}

pub fn received_ctrl_c() -> bool {
    RECEIVED_CTRL_C.load(Ordering::Relaxed)
}
