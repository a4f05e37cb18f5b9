use crate::app::App;
use crate::input::InputAction;

pub fn dispatch(app: &mut App, action: InputAction) {
    match action {
        InputAction::None => {}
        InputAction::Quit => app.should_quit = true,
        InputAction::Back => app.back(),
        InputAction::ToggleHelp => app.show_help = !app.show_help,
        InputAction::MoveUp => app.move_cursor(false),
        InputAction::MoveDown => app.move_cursor(true),
        InputAction::Activate => app.activate(),
        InputAction::NewGame => app.start_create(),
        InputAction::EditGame => app.start_edit(),
        InputAction::OpenSettings => app.open_settings(),
        InputAction::Delete => app.request_delete(),
        InputAction::FillRemaining => app.fill_remaining(),
        InputAction::AddPlayerSlot => app.add_player_slot(),
        InputAction::RemovePlayerSlot => app.remove_player_slot(),
    }
}
