use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use hazari_core::{
    reconcile, remaining_pool, round_pool_for, settle_round, Event, EventBus, GameEdit, GameSpec,
    Ledger, DEFAULT_TOTAL_POINTS, MAX_PLAYERS, MIN_PLAYERS,
};
use hazari_store::{game_position, now_millis, Store};
use std::collections::BTreeMap;

const MAX_TITLE_LEN: usize = 40;
const MAX_NAME_LEN: usize = 10;
const MAX_POINTS_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Create,
    Details,
    Edit,
    Settings,
}

/// Shared by the create and edit screens. Field cursor: 0 title, 1 total
/// points, then one slot per player.
#[derive(Debug, Clone)]
pub struct GameForm {
    pub title: String,
    pub total_points: String,
    pub players: Vec<String>,
    pub cursor: usize,
}

impl GameForm {
    fn blank() -> Self {
        Self {
            title: String::new(),
            total_points: DEFAULT_TOTAL_POINTS.to_string(),
            players: vec![String::new(); MAX_PLAYERS],
            cursor: 0,
        }
    }

    fn from_game(game: &Ledger) -> Self {
        Self {
            title: game.title.clone(),
            total_points: game.total_points.to_string(),
            players: game.players.clone(),
            cursor: 0,
        }
    }

    pub fn field_count(&self) -> usize {
        2 + self.players.len()
    }

    pub fn pool_preview(&self) -> i64 {
        round_pool_for(self.players.len())
    }
}

#[derive(Debug, Clone)]
pub enum Confirm {
    DeleteGame(String),
    ClearAll,
}

impl Confirm {
    pub fn message(&self) -> &'static str {
        match self {
            Confirm::DeleteGame(_) => "Delete this game?",
            Confirm::ClearAll => "Delete all game history? This cannot be undone.",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Celebration {
    pub winner: String,
    pub score: i64,
}

pub struct App {
    pub store: Store,
    pub games: Vec<Ledger>,
    pub screen: Screen,
    pub home_cursor: usize,
    pub open_id: Option<String>,
    pub form: GameForm,
    pub entry: Vec<String>,
    pub entry_cursor: usize,
    pub confirm: Option<Confirm>,
    pub celebration: Option<Celebration>,
    pub status_line: String,
    pub show_help: bool,
    pub should_quit: bool,
}

impl App {
    pub fn bootstrap(store: Store) -> Result<Self> {
        let games = store
            .load_all()
            .with_context(|| format!("load games from {}", store.path().display()))?;
        Ok(Self {
            store,
            games,
            screen: Screen::Home,
            home_cursor: 0,
            open_id: None,
            form: GameForm::blank(),
            entry: Vec::new(),
            entry_cursor: 0,
            confirm: None,
            celebration: None,
            status_line: String::new(),
            show_help: false,
            should_quit: false,
        })
    }

    pub fn open_game(&self) -> Option<&Ledger> {
        let id = self.open_id.as_deref()?;
        self.games.iter().find(|game| game.id == id)
    }

    /// Modal and text-field input runs before the key map; returns true when
    /// the key was consumed.
    pub fn handle_form_key(&mut self, key: KeyEvent) -> bool {
        if self.celebration.is_some() {
            if matches!(
                key.code,
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')
            ) {
                self.celebration = None;
            }
            return true;
        }
        if let Some(confirm) = self.confirm.take() {
            if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                self.run_confirmed(confirm);
            } else {
                self.status_line = "Cancelled".to_string();
            }
            return true;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        match self.screen {
            Screen::Create | Screen::Edit => self.form_field_key(key),
            Screen::Details => self.entry_field_key(key),
            _ => false,
        }
    }

    fn form_field_key(&mut self, key: KeyEvent) -> bool {
        let numeric = self.form.cursor == 1;
        let (field, cap) = match self.form.cursor {
            0 => (&mut self.form.title, MAX_TITLE_LEN),
            1 => (&mut self.form.total_points, MAX_POINTS_LEN),
            seat => match self.form.players.get_mut(seat - 2) {
                Some(name) => (name, MAX_NAME_LEN),
                None => return false,
            },
        };
        match key.code {
            KeyCode::Backspace => {
                field.pop();
                true
            }
            KeyCode::Char(c) => {
                let accepted = if numeric { c.is_ascii_digit() } else { !c.is_control() };
                if accepted && field.chars().count() < cap {
                    field.push(c);
                }
                // Swallow every character so stray letters never trigger
                // global shortcuts while a form is open.
                true
            }
            _ => false,
        }
    }

    fn entry_field_key(&mut self, key: KeyEvent) -> bool {
        if !self.open_game().map(Ledger::is_active).unwrap_or(false) {
            return false;
        }
        let Some(field) = self.entry.get_mut(self.entry_cursor) else {
            return false;
        };
        match key.code {
            KeyCode::Backspace => {
                field.pop();
                true
            }
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if field.chars().count() < MAX_POINTS_LEN {
                    field.push(c);
                }
                true
            }
            KeyCode::Char('-') => {
                if field.is_empty() {
                    field.push('-');
                }
                true
            }
            _ => false,
        }
    }

    pub fn move_cursor(&mut self, down: bool) {
        match self.screen {
            Screen::Home => {
                self.home_cursor = step(self.home_cursor, self.games.len(), down);
            }
            Screen::Create | Screen::Edit => {
                self.form.cursor = step(self.form.cursor, self.form.field_count(), down);
            }
            Screen::Details => {
                self.entry_cursor = step(self.entry_cursor, self.entry.len(), down);
            }
            Screen::Settings => {}
        }
    }

    pub fn activate(&mut self) {
        match self.screen {
            Screen::Home => self.open_selected(),
            Screen::Create => self.submit_create(),
            Screen::Edit => self.submit_edit(),
            Screen::Details => self.commit_round(),
            Screen::Settings => {}
        }
    }

    pub fn back(&mut self) {
        if self.show_help {
            self.show_help = false;
            return;
        }
        self.status_line.clear();
        match self.screen {
            Screen::Create | Screen::Settings => self.screen = Screen::Home,
            Screen::Edit => self.screen = Screen::Details,
            Screen::Details => {
                self.open_id = None;
                self.screen = Screen::Home;
            }
            Screen::Home => {}
        }
    }

    fn open_selected(&mut self) {
        let Some(game) = self.games.get(self.home_cursor) else {
            return;
        };
        self.open_id = Some(game.id.clone());
        self.screen = Screen::Details;
        self.reset_entry();
        self.status_line.clear();
    }

    pub fn start_create(&mut self) {
        if self.screen != Screen::Home {
            return;
        }
        self.form = GameForm::blank();
        self.screen = Screen::Create;
        self.status_line.clear();
    }

    pub fn start_edit(&mut self) {
        if self.screen != Screen::Details {
            return;
        }
        let Some(game) = self.open_game() else {
            return;
        };
        self.form = GameForm::from_game(game);
        self.screen = Screen::Edit;
        self.status_line.clear();
    }

    pub fn open_settings(&mut self) {
        if self.screen == Screen::Home {
            self.screen = Screen::Settings;
            self.status_line.clear();
        }
    }

    pub fn add_player_slot(&mut self) {
        if self.screen != Screen::Create {
            return;
        }
        if self.form.players.len() < MAX_PLAYERS {
            self.form.players.push(String::new());
        }
    }

    pub fn remove_player_slot(&mut self) {
        if self.screen != Screen::Create {
            return;
        }
        if self.form.players.len() <= MIN_PLAYERS {
            self.status_line = format!("Need at least {MIN_PLAYERS} players");
            return;
        }
        let seat = if self.form.cursor >= 2 {
            (self.form.cursor - 2).min(self.form.players.len() - 1)
        } else {
            self.form.players.len() - 1
        };
        self.form.players.remove(seat);
        self.form.cursor = self.form.cursor.min(self.form.field_count() - 1);
    }

    fn submit_create(&mut self) {
        let spec = GameSpec {
            title: self.form.title.clone(),
            players: self.form.players.clone(),
            total_points: parse_number(&self.form.total_points),
        };
        let stamp = now_millis();
        match Ledger::create(spec, stamp.to_string(), stamp) {
            Ok(game) => {
                let id = game.id.clone();
                // Newest first, like the home list expects.
                self.games.insert(0, game);
                self.persist();
                self.home_cursor = 0;
                self.open_id = Some(id);
                self.screen = Screen::Details;
                self.reset_entry();
                self.status_line = "Game created".to_string();
            }
            Err(err) => self.status_line = err.to_string(),
        }
    }

    fn submit_edit(&mut self) {
        let Some(id) = self.open_id.clone() else {
            return;
        };
        let index = match game_position(&self.games, &id) {
            Ok(index) => index,
            Err(err) => {
                self.status_line = err.to_string();
                return;
            }
        };
        let edit = GameEdit {
            title: self.form.title.clone(),
            total_points: parse_number(&self.form.total_points),
            players: self.form.players.clone(),
        };
        match reconcile(&mut self.games[index], &edit) {
            Ok(()) => {
                self.persist();
                self.screen = Screen::Details;
                self.reset_entry();
                self.status_line = "Game updated".to_string();
            }
            Err(err) => self.status_line = err.to_string(),
        }
    }

    fn commit_round(&mut self) {
        let Some(id) = self.open_id.clone() else {
            return;
        };
        let index = match game_position(&self.games, &id) {
            Ok(index) => index,
            Err(err) => {
                self.status_line = err.to_string();
                return;
            }
        };
        if !self.games[index].is_active() {
            return;
        }
        let mut deltas = BTreeMap::new();
        for (seat, player) in self.games[index].players.iter().enumerate() {
            let raw = self.entry.get(seat).map(String::as_str).unwrap_or("");
            deltas.insert(player.clone(), parse_number(raw));
        }
        let mut events = EventBus::default();
        match settle_round(&mut self.games[index], &deltas, now_millis(), &mut events) {
            Ok(_) => {
                self.persist();
                self.reset_entry();
                for event in events.drain() {
                    match event {
                        Event::RoundSettled { round, .. } => {
                            self.status_line = format!("Round {round} recorded");
                        }
                        Event::GameCompleted { winner, score } => {
                            self.celebration = Some(Celebration { winner, score });
                        }
                    }
                }
            }
            Err(err) => self.status_line = err.to_string(),
        }
    }

    pub fn fill_remaining(&mut self) {
        if self.screen != Screen::Details {
            return;
        }
        let Some(game) = self.open_game() else {
            return;
        };
        if !game.is_active() {
            return;
        }
        let pool = game.round_pool;
        let others: i64 = self
            .entry
            .iter()
            .enumerate()
            .filter(|(seat, _)| *seat != self.entry_cursor)
            .map(|(_, raw)| parse_number(raw))
            .sum();
        if let Some(field) = self.entry.get_mut(self.entry_cursor) {
            *field = remaining_pool(pool, others).to_string();
        }
    }

    pub fn request_delete(&mut self) {
        match self.screen {
            Screen::Home => {
                if let Some(game) = self.games.get(self.home_cursor) {
                    self.confirm = Some(Confirm::DeleteGame(game.id.clone()));
                }
            }
            Screen::Settings => {
                self.confirm = Some(Confirm::ClearAll);
            }
            _ => {}
        }
    }

    fn run_confirmed(&mut self, confirm: Confirm) {
        match confirm {
            Confirm::DeleteGame(id) => match game_position(&self.games, &id) {
                Ok(index) => {
                    self.games.remove(index);
                    self.persist();
                    if self.home_cursor >= self.games.len() {
                        self.home_cursor = self.games.len().saturating_sub(1);
                    }
                    if self.open_id.as_deref() == Some(id.as_str()) {
                        self.open_id = None;
                        self.screen = Screen::Home;
                    }
                    self.status_line = "Game deleted".to_string();
                }
                Err(err) => self.status_line = err.to_string(),
            },
            Confirm::ClearAll => match self.store.clear_all() {
                Ok(()) => {
                    self.games.clear();
                    self.home_cursor = 0;
                    self.status_line = "All game history cleared".to_string();
                }
                Err(err) => self.status_line = err.to_string(),
            },
        }
    }

    fn reset_entry(&mut self) {
        let seats = self.open_game().map(|game| game.players.len()).unwrap_or(0);
        self.entry = vec!["0".to_string(); seats];
        self.entry_cursor = 0;
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save_all(&self.games) {
            self.status_line = format!("save failed: {err}");
        }
    }
}

fn step(cursor: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if down {
        (cursor + 1) % len
    } else {
        (cursor + len - 1) % len
    }
}

/// Blank or malformed numeric input counts as 0; validation happens in the
/// engine, not here.
fn parse_number(raw: &str) -> i64 {
    raw.trim().parse::<i64>().unwrap_or(0)
}
