#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Previous,
    Next,
    First,
    Last,
    GoTo(usize),
    ConfigReload,
}
