use crate::{Board, Coordinate, PublicGameState};

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", draw(self, |_| None))
    }
}

/// Draws the board with each avatar shown as its position in the turn order.
///
/// Where several avatars share a tile, the one that moves first is shown.
pub fn visualize_state(state: &PublicGameState) -> String {
    let players = state.players();
    draw(state.board(), |c| {
        players
            .iter()
            .position(|p| p.position == c)
            .and_then(|i| char::from_digit((i % 10) as u32, 10))
    })
}

fn draw(board: &Board, marker: impl Fn(Coordinate) -> Option<char>) -> String {
    let columns = board.size().columns;
    // Draw the top of the box
    let mut result = String::from("    ");
    for j in 0..columns {
        result += &format!("{}", j % 10);
    }
    result += "\n   ╭";
    result += &"─".repeat(columns);
    result += "╮\n";

    for (i, row) in board.rows().enumerate() {
        result += &format!("{:>2} │", i);
        for (j, tile) in row.iter().enumerate() {
            let c = Coordinate::new(i as i32, j as i32);
            result.push(marker(c).unwrap_or(tile.connector.as_char()));
        }
        result += "│\n";
    }

    // Draw the bottom of the box
    result += "   ╰";
    result += &"─".repeat(columns);
    result += "╯";
    result
}
