use crate::session::{GameSession, SessionConfig};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    style::{Color as TermColor, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
    ExecutableCommand, QueueableCommand,
};
use geister_agents::Difficulty;
use geister_core::{
    generate_possible_moves, is_escape_square, is_valid_position, GamePhase, Ghost, GhostColor,
    Player, Position, BOARD_SIZE,
};
use std::io::{self, Write};
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct InteractiveGame {
    session: GameSession,
    cursor_pos: Position,
    /// Roster index of the ghost Enter places during setup
    setup_index: usize,
    message: String,
}

impl InteractiveGame {
    pub fn new(config: SessionConfig, seed: Option<u64>) -> Self {
        let session = match seed {
            Some(seed) => GameSession::with_seed(config, seed),
            None => GameSession::new(config),
        };
        Self {
            session,
            cursor_pos: Position::new(4, 1),
            setup_index: 0,
            message: String::from(
                "Place your ghosts: Enter=place, Tab=next ghost, a=auto, s=start",
            ),
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(Hide)?;
        stdout.execute(Clear(ClearType::All))?;

        let result = self.game_loop();

        stdout.execute(Show)?;
        terminal::disable_raw_mode()?;
        stdout.execute(Clear(ClearType::All))?;
        stdout.execute(MoveTo(0, 0))?;

        result
    }

    fn game_loop(&mut self) -> io::Result<()> {
        loop {
            if self.session.take_ai_trigger() && self.session.spawn_ai_move() {
                self.message = String::from("Computer thinking...");
            }
            if self.session.is_ai_thinking() {
                if let Some(mv) = self.session.poll_ai() {
                    self.message = format!("Computer played {mv}");
                } else if !self.session.is_ai_thinking() {
                    self.message = String::from("Computer could not move");
                }
            }
            self.announce_winner();
            self.draw_board()?;

            // Keep polling the worker while it searches.
            if self.session.is_ai_thinking() && !event::poll(POLL_INTERVAL)? {
                continue;
            }

            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                if kind != KeyEventKind::Press {
                    continue;
                }
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('h') | KeyCode::Left => self.move_cursor(0, -1),
                    KeyCode::Char('j') | KeyCode::Down => self.move_cursor(1, 0),
                    KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-1, 0),
                    KeyCode::Char('l') | KeyCode::Right => self.move_cursor(0, 1),
                    KeyCode::Enter | KeyCode::Char(' ') => self.handle_selection(),
                    KeyCode::Tab => self.next_setup_ghost(),
                    KeyCode::Char('a') => self.auto_place(),
                    KeyCode::Char('s') => self.start_game(),
                    KeyCode::Char('n') => self.new_game(),
                    KeyCode::Char('1') => self.set_difficulty(Difficulty::Easy),
                    KeyCode::Char('2') => self.set_difficulty(Difficulty::Medium),
                    KeyCode::Char('3') => self.set_difficulty(Difficulty::Hard),
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn move_cursor(&mut self, d_row: i8, d_col: i8) {
        let next = self.cursor_pos.offset(d_row, d_col);
        if is_valid_position(next) {
            self.cursor_pos = next;
        }
    }

    fn handle_selection(&mut self) {
        match self.session.state().game_phase {
            GamePhase::Setup => self.place_at_cursor(),
            GamePhase::Playing => self.play_at_cursor(),
            GamePhase::Finished => {}
        }
    }

    fn place_at_cursor(&mut self) {
        let ghosts = &self.session.state().player_ghosts;
        let Some(&ghost) = ghosts.get(self.setup_index) else {
            return;
        };

        match self.session.place_ghost(&ghost, self.cursor_pos) {
            Ok(()) => {
                self.message = format!("Placed {} ({})", ghost.id, ghost.color);
                self.next_setup_ghost();
            }
            Err(err) => self.message = err.to_string(),
        }
    }

    /// Advances to the next unplaced ghost, or just the next one once all
    /// are on the board.
    fn next_setup_ghost(&mut self) {
        let ghosts = &self.session.state().player_ghosts;
        if ghosts.is_empty() {
            return;
        }
        let count = ghosts.len();
        let start = self.setup_index;
        self.setup_index = (1..=count)
            .map(|step| (start + step) % count)
            .find(|&i| !ghosts[i].position.is_placed())
            .unwrap_or((start + 1) % count);
    }

    fn play_at_cursor(&mut self) {
        let state = self.session.state();
        let own_ghost = state
            .ghost_at(self.cursor_pos)
            .filter(|g| g.owner == Player::Player)
            .copied();
        let is_target = state
            .selected_piece
            .is_some_and(|selected| state.can_move(selected.position, self.cursor_pos));

        let moves_before = state.move_history.len();
        match own_ghost {
            Some(ghost) if !is_target => self.session.click_ghost(&ghost),
            _ => self.session.click_cell(self.cursor_pos),
        }

        let state = self.session.state();
        if state.move_history.len() > moves_before {
            if let Some(mv) = state.move_history.last() {
                self.message = format!("You played {mv}");
            }
        } else if let Some(selected) = state.selected_piece {
            self.message = format!("Selected {} at {}", selected.id, selected.position);
        }
    }

    fn auto_place(&mut self) {
        self.message = match self.session.auto_place_ghosts() {
            Ok(()) => String::from("Ghosts placed, press s to start"),
            Err(err) => err.to_string(),
        };
    }

    fn start_game(&mut self) {
        self.message = match self.session.start_game_phase() {
            Ok(()) => String::from("Game started, your move"),
            Err(err) => err.to_string(),
        };
    }

    fn new_game(&mut self) {
        self.session.reset();
        self.cursor_pos = Position::new(4, 1);
        self.setup_index = 0;
        self.message = String::from("New game started!");
    }

    fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.session.set_difficulty(difficulty);
        self.message = format!("Difficulty set to {difficulty}");
    }

    fn announce_winner(&mut self) {
        let outcome = self.session.outcome();
        if let (Some(winner), Some(condition)) = (outcome.winner, outcome.condition) {
            let who = match winner {
                Player::Player => "You win",
                Player::Computer => "Computer wins",
            };
            self.message = format!("{who} ({condition})! n=new game, q=quit");
        }
    }

    fn draw_board(&self) -> io::Result<()> {
        let mut stdout = io::stdout();
        let state = self.session.state();
        stdout.queue(MoveTo(0, 0))?;
        stdout.queue(Clear(ClearType::FromCursorDown))?;

        let targets: Vec<Position> = match state.selected_piece {
            Some(selected) => generate_possible_moves(state)
                .into_iter()
                .filter(|m| m.from == selected.position)
                .map(|m| m.to)
                .collect(),
            None => Vec::new(),
        };

        stdout.queue(Print(format!(
            "Geister ({}) - hjkl to move, Enter to select\r\n",
            self.session.difficulty()
        )))?;
        stdout.queue(Print("Commands: n=new, 1/2/3=difficulty, q=quit\r\n\r\n"))?;
        stdout.queue(Print("   0 1 2 3 4 5\r\n"))?;
        stdout.queue(Print("  ┌────────────┐\r\n"))?;

        for row in 0..BOARD_SIZE {
            stdout.queue(Print(format!("{row} │")))?;
            for col in 0..BOARD_SIZE {
                let pos = Position::new(row, col);
                let background = if self.cursor_pos == pos {
                    TermColor::Yellow
                } else if state.selected_piece.is_some_and(|g| g.position == pos) {
                    TermColor::Green
                } else if targets.contains(&pos) {
                    TermColor::DarkBlue
                } else if is_escape_square(pos, Player::Player)
                    || is_escape_square(pos, Player::Computer)
                {
                    TermColor::DarkYellow
                } else if (row + col) % 2 == 0 {
                    TermColor::DarkGrey
                } else {
                    TermColor::Black
                };
                stdout.queue(SetBackgroundColor(background))?;

                match state.ghost_at(pos) {
                    Some(ghost) => {
                        let (symbol, color) = ghost_symbol(ghost);
                        stdout.queue(SetForegroundColor(color))?;
                        stdout.queue(Print(format!("{symbol} ")))?;
                    }
                    None => {
                        stdout.queue(Print("  "))?;
                    }
                }
                stdout.queue(ResetColor)?;
            }
            stdout.queue(Print(format!("│{row}\r\n")))?;
        }

        stdout.queue(Print("  └────────────┘\r\n\r\n"))?;

        if state.game_phase == GamePhase::Setup {
            if let Some(ghost) = state.player_ghosts.get(self.setup_index) {
                let placed = if ghost.position.is_placed() {
                    format!(" (at {})", ghost.position)
                } else {
                    String::new()
                };
                stdout.queue(Print(format!(
                    "Placing {} ({}){placed}\r\n",
                    ghost.id, ghost.color
                )))?;
            }
        } else {
            let turn = match state.current_player {
                Player::Player => "Your move",
                Player::Computer => "Computer's move",
            };
            stdout.queue(Print(format!(
                "{turn} | Move {}\r\n",
                state.move_history.len() + 1
            )))?;
            stdout.queue(Print(format!(
                "Captured by you: {} | Captured by computer: {}\r\n",
                captured_summary(state.captured_ghosts.iter(), Player::Computer),
                captured_summary(state.captured_ghosts.iter(), Player::Player),
            )))?;
        }

        stdout.queue(Print(format!("\r\n{}\r\n", self.message)))?;
        stdout.flush()?;
        Ok(())
    }
}

/// Own ghosts always show their color; computer ghosts only once revealed.
fn ghost_symbol(ghost: &Ghost) -> (char, TermColor) {
    match (ghost.owner, ghost.color) {
        (Player::Player, GhostColor::Blue) => ('B', TermColor::Cyan),
        (Player::Player, GhostColor::Red) => ('R', TermColor::Red),
        (Player::Computer, _) if !ghost.is_revealed => ('?', TermColor::Magenta),
        (Player::Computer, GhostColor::Blue) => ('b', TermColor::Cyan),
        (Player::Computer, GhostColor::Red) => ('r', TermColor::Red),
    }
}

fn captured_summary<'a>(captured: impl Iterator<Item = &'a Ghost>, owner: Player) -> String {
    let (blue, red) = captured
        .filter(|g| g.owner == owner)
        .fold((0, 0), |(blue, red), g| match g.color {
            GhostColor::Blue => (blue + 1, red),
            GhostColor::Red => (blue, red + 1),
        });
    format!("{blue} blue, {red} red")
}

#[cfg(test)]
mod tests {
    use super::*;
    use geister_core::GhostId;

    #[test]
    fn test_hidden_computer_ghost_symbol() {
        let id = GhostId::new(Player::Computer, 1);
        let ghost = Ghost::new(id, GhostColor::Red, Position::new(0, 1));
        assert_eq!(ghost_symbol(&ghost).0, '?');
        assert_eq!(ghost_symbol(&ghost.with_revealed(true)).0, 'r');
    }

    #[test]
    fn test_captured_summary_counts_by_owner() {
        let ghosts = [
            Ghost::new(GhostId::new(Player::Computer, 1), GhostColor::Blue, Position::new(0, 1)),
            Ghost::new(GhostId::new(Player::Computer, 3), GhostColor::Red, Position::new(0, 2)),
            Ghost::new(GhostId::new(Player::Player, 3), GhostColor::Red, Position::new(4, 2)),
        ];
        assert_eq!(captured_summary(ghosts.iter(), Player::Computer), "1 blue, 1 red");
        assert_eq!(captured_summary(ghosts.iter(), Player::Player), "0 blue, 1 red");
    }

    #[test]
    fn test_cursor_stays_on_board() {
        let mut game = InteractiveGame::new(SessionConfig::default(), Some(1));
        game.cursor_pos = Position::new(0, 0);
        game.move_cursor(-1, 0);
        game.move_cursor(0, -1);
        assert_eq!(game.cursor_pos, Position::new(0, 0));
        game.move_cursor(1, 1);
        assert_eq!(game.cursor_pos, Position::new(1, 1));
    }

    #[test]
    fn test_setup_cycles_to_unplaced_ghost() {
        let mut game = InteractiveGame::new(SessionConfig::default(), Some(1));
        game.cursor_pos = Position::new(4, 1);
        game.place_at_cursor();
        assert_eq!(game.setup_index, 1);

        game.cursor_pos = Position::new(4, 2);
        game.place_at_cursor();
        assert_eq!(game.setup_index, 2);
        assert!(game.session.state().player_ghosts[0].position.is_placed());
    }
}
