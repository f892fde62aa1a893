/// Messages from background services to the GTK main loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    ConfigReload,
}
