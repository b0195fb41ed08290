//! Terminal setup and restoration

use std::sync::Once;

static HOOK: Once = Once::new();

/// Restore the terminal before the default panic report is printed.
/// Installing more than once is a no-op.
pub fn install_panic_hook() {
    HOOK.call_once(|| {
        let report = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            ratatui::restore();
            report(info);
        }));
    });
}
