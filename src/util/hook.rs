use crate::ui::tui;

/// Restores the terminal before the default hook prints, so the report does
/// not land inside the alternate screen. The panic also goes to the log file.
pub fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::Tui::restore();
        tracing::error!("panic: {panic_info}");
        hook(panic_info);
    }));
}
