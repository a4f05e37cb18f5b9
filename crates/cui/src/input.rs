use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    None,
    Quit,
    Back,
    ToggleHelp,
    MoveUp,
    MoveDown,
    Activate,
    NewGame,
    EditGame,
    OpenSettings,
    Delete,
    FillRemaining,
    AddPlayerSlot,
    RemovePlayerSlot,
}

pub fn map_key(key: KeyEvent) -> InputAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => InputAction::Back,
        KeyCode::Up | KeyCode::BackTab => InputAction::MoveUp,
        KeyCode::Down | KeyCode::Tab => InputAction::MoveDown,
        KeyCode::Enter => InputAction::Activate,
        KeyCode::Char('a') if ctrl => InputAction::AddPlayerSlot,
        KeyCode::Char('d') if ctrl => InputAction::RemovePlayerSlot,
        KeyCode::Char('q') => InputAction::Quit,
        KeyCode::Char('?') => InputAction::ToggleHelp,
        KeyCode::Char('c') => InputAction::NewGame,
        KeyCode::Char('e') => InputAction::EditGame,
        KeyCode::Char('s') => InputAction::OpenSettings,
        KeyCode::Char('x') => InputAction::Delete,
        KeyCode::Char('f') => InputAction::FillRemaining,
        _ => InputAction::None,
    }
}
