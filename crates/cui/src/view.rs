use crate::app::{App, Screen};
use hazari_core::{winner, GameStatus, Ledger};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::{Alignment, Color, Line, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub fn draw(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, root[0], app);
    match app.screen {
        Screen::Home => draw_home(frame, root[1], app),
        Screen::Create | Screen::Edit => draw_form(frame, root[1], app),
        Screen::Details => draw_details(frame, root[1], app),
        Screen::Settings => draw_settings(frame, root[1]),
    }
    draw_status(frame, root[2], app);

    if let Some(confirm) = &app.confirm {
        draw_popup(frame, "Confirm", &[confirm.message().to_string(), String::new(), "y: yes   any other key: cancel".to_string()]);
    }
    if let Some(celebration) = &app.celebration {
        draw_popup(
            frame,
            "Game Completed!",
            &[
                format!("{} wins!", celebration.winner),
                format!("Final score: {} points", celebration.score),
                String::new(),
                "Enter: continue".to_string(),
            ],
        );
    }
    if app.show_help {
        draw_help(frame);
    }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let screen = match app.screen {
        Screen::Home => "Games",
        Screen::Create => "Create Game",
        Screen::Details => "Game Details",
        Screen::Edit => "Edit Game",
        Screen::Settings => "Settings",
    };
    let header = Paragraph::new(format!("Hazari Scoreboard | {screen}"))
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let hints = match app.screen {
        Screen::Home => "enter open  c create  x delete  s settings  ? help  q quit",
        Screen::Create => "type to edit  up/down field  ctrl-a/ctrl-d player slots  enter save  esc back",
        Screen::Details => "digits score  f fill rest  enter commit  e edit  esc back",
        Screen::Edit => "type to edit  up/down field  enter save  esc cancel",
        Screen::Settings => "x clear all history  esc back",
    };
    let line = if app.status_line.is_empty() {
        hints.to_string()
    } else {
        format!("{} | {hints}", app.status_line)
    };
    let status = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, area);
}

fn draw_home(frame: &mut Frame, area: Rect, app: &App) {
    if app.games.is_empty() {
        let empty = Paragraph::new("No games yet. Press 'c' to create one.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Game History"));
        frame.render_widget(empty, area);
        return;
    }
    let items: Vec<ListItem> = app
        .games
        .iter()
        .map(|game| {
            let status = match game.status {
                GameStatus::Active => "active",
                GameStatus::Completed => "completed",
            };
            ListItem::new(format!(
                "{}  ({} players, to {})  {}  {}",
                game.title,
                game.players.len(),
                game.total_points,
                status,
                format_timestamp(game.created_at_ms),
            ))
        })
        .collect();
    let title = format!("Game History ({})", app.games.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(app.home_cursor.min(app.games.len() - 1)));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_form(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::new();
    lines.push(field_line(0, app, "Title", &app.form.title));
    lines.push(field_line(1, app, "Total points", &app.form.total_points));
    lines.push(Line::from(format!(
        "    Round pool: {} (fixed by player count)",
        app.form.pool_preview()
    )));
    for (seat, name) in app.form.players.iter().enumerate() {
        lines.push(field_line(seat + 2, app, &format!("Player {}", seat + 1), name));
    }
    if app.screen == Screen::Create {
        lines.push(Line::from(""));
        lines.push(Line::from(
            "    ctrl-a adds a 4th player, ctrl-d removes the focused one",
        ));
    }
    let block_title = if app.screen == Screen::Create {
        "New Game"
    } else {
        "Edit Game"
    };
    let form = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(block_title))
        .wrap(Wrap { trim: false });
    frame.render_widget(form, area);
}

fn field_line<'a>(index: usize, app: &App, label: &str, value: &str) -> Line<'a> {
    let focused = app.form.cursor == index;
    let marker = if focused { "> " } else { "  " };
    let text = format!("{marker}{label}: {value}{}", if focused { "_" } else { "" });
    if focused {
        Line::styled(text, Style::default().fg(Color::Yellow))
    } else {
        Line::from(text)
    }
}

fn draw_details(frame: &mut Frame, area: Rect, app: &App) {
    let Some(game) = app.open_game() else {
        let missing = Paragraph::new("Game not found. Press esc to go back.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(missing, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(6),
            Constraint::Min(6),
        ])
        .split(columns[0]);

    draw_game_info(frame, left[0], game);
    draw_standings(frame, left[1], game);
    draw_round_entry(frame, left[2], app, game);
    draw_history(frame, columns[1], game);
}

fn draw_game_info(frame: &mut Frame, area: Rect, game: &Ledger) {
    let mut lines = vec![
        Line::from(format!("Title: {}", game.title)),
        Line::from(format!("Created: {}", format_timestamp(game.created_at_ms))),
        Line::from(format!("Total points: {}", game.total_points)),
        Line::from(format!("Round pool: {}", game.round_pool)),
        Line::from(format!("Current round: {}", game.current_round)),
    ];
    match winner(game) {
        Some(best) => lines.push(Line::styled(
            format!("Completed. Winner: {} ({})", best.player, best.score),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        None => lines.push(Line::from("Status: active")),
    }
    let info = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Game Information"));
    frame.render_widget(info, area);
}

fn draw_standings(frame: &mut Frame, area: Rect, game: &Ledger) {
    let mut standings: Vec<_> = game.scores.iter().collect();
    standings.sort_by(|a, b| b.score.cmp(&a.score));
    let lines: Vec<Line> = standings
        .iter()
        .enumerate()
        .map(|(rank, entry)| {
            Line::from(format!("{}. {:<12} {:>6}", rank + 1, entry.player, entry.score))
        })
        .collect();
    let board = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Standings"));
    frame.render_widget(board, area);
}

fn draw_round_entry(frame: &mut Frame, area: Rect, app: &App, game: &Ledger) {
    if !game.is_active() {
        let done = Paragraph::new("Game completed, no more rounds.")
            .block(Block::default().borders(Borders::ALL).title("Round Entry"));
        frame.render_widget(done, area);
        return;
    }
    let lines: Vec<Line> = game
        .players
        .iter()
        .enumerate()
        .map(|(seat, player)| {
            let value = app.entry.get(seat).map(String::as_str).unwrap_or("0");
            let focused = seat == app.entry_cursor;
            let marker = if focused { "> " } else { "  " };
            let text = format!("{marker}{player:<12} {value}{}", if focused { "_" } else { "" });
            if focused {
                Line::styled(text, Style::default().fg(Color::Yellow))
            } else {
                Line::from(text)
            }
        })
        .collect();
    let title = format!("Round {} Scores (pool {})", game.current_round, game.round_pool);
    let entry = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(entry, area);
}

fn draw_history(frame: &mut Frame, area: Rect, game: &Ledger) {
    let mut lines = Vec::new();
    let header = game
        .players
        .iter()
        .map(|player| format!("{player:>8}"))
        .collect::<String>();
    lines.push(Line::styled(
        format!("{:<5}{header}", "Rnd"),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    // Newest round on top.
    for entry in game.history.iter().rev() {
        let row = game
            .players
            .iter()
            .map(|player| format!("{:>8}", entry.scores.get(player).copied().unwrap_or(0)))
            .collect::<String>();
        lines.push(Line::from(format!("{:<5}{row}", format!("R{}", entry.round))));
    }
    if game.history.is_empty() {
        lines.push(Line::from("No rounds recorded yet."));
    }
    let history = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Round History"));
    frame.render_widget(history, area);
}

fn draw_settings(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from("Settings"),
        Line::from(""),
        Line::from("x  Clear all game history (asks for confirmation)"),
        Line::from("esc  Back to the game list"),
    ];
    let settings = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(settings, area);
}

fn draw_help(frame: &mut Frame) {
    draw_popup(
        frame,
        "Keys",
        &[
            "enter  open game / save form / commit round".to_string(),
            "c      create game (from the list)".to_string(),
            "e      edit game (from details)".to_string(),
            "f      fill remaining pool for the focused player".to_string(),
            "x      delete game / clear history".to_string(),
            "s      settings".to_string(),
            "q      quit".to_string(),
        ],
    );
}

fn draw_popup(frame: &mut Frame, title: &str, body: &[String]) {
    let area = centered_rect(frame.area(), 50, (body.len() as u16) + 4);
    let lines: Vec<Line> = body.iter().map(|line| Line::from(line.clone())).collect();
    let popup = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false });
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn centered_rect(area: Rect, width_percent: u16, height: u16) -> Rect {
    let width = area.width * width_percent / 100;
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect {
        x,
        y,
        width,
        height: height.min(area.height),
    }
}

/// UTC date from unix millis; the pack carries no calendar crate so the
/// civil-date conversion is done inline.
fn format_timestamp(ms: u64) -> String {
    let secs = ms / 1000;
    let (year, month, day) = civil_from_days((secs / 86_400) as i64);
    let rem = secs % 86_400;
    format!(
        "{year:04}-{month:02}-{day:02} {:02}:{:02}",
        rem / 3600,
        (rem % 3600) / 60
    )
}

fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn civil_conversion_known_dates() {
        assert_eq!(civil_from_days(0), (1970, 1, 1));
        assert_eq!(civil_from_days(19_723), (2024, 1, 1));
    }

    #[test]
    fn timestamp_formatting() {
        // 2024-01-01 00:00:30 UTC
        assert_eq!(format_timestamp(1_704_067_230_000), "2024-01-01 00:00");
    }
}
