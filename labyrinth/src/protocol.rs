//! The JSON representation of game data, as exchanged with remote players.
//!
//! Every message is a single JSON value on its own line. The referee sends
//! calls of the form `[method, [arguments...]]`, and the player answers with
//! either `"void"` or, for `take-turn`, its choice of action.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};

use crate::{
    Action, Board, BoardError, Color, Connector, Coordinate, Direction, GameState, Gem, GemPair,
    PlayerState, PrivatePlayerInfo, PublicGameState, SlideAction, SlideActionWithRotation,
    StateConfig, StateError, Tile,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonCoordinate {
    #[serde(rename = "row#")]
    pub row: i64,
    #[serde(rename = "column#")]
    pub column: i64,
}

/// The board as two matrices of the same shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonBoard {
    pub connectors: Vec<Vec<Connector>>,
    pub treasures: Vec<Vec<(Gem, Gem)>>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonTile {
    pub tilekey: Connector,
    #[serde(rename = "1-image")]
    pub first_gem: Gem,
    #[serde(rename = "2-image")]
    pub second_gem: Gem,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonPlayer {
    pub current: JsonCoordinate,
    pub home: JsonCoordinate,
    pub color: Color,
}

/// A player as the referee sees it, i.e. including its goal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRefereePlayer {
    #[serde(flatten)]
    pub player: JsonPlayer,
    pub goto: JsonCoordinate,
}

/// The public game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonState {
    pub board: JsonBoard,
    pub spare: JsonTile,
    /// The players in turn order, starting with the active one.
    pub plmt: Vec<JsonPlayer>,
    pub last: Option<(usize, Direction)>,
}

/// The complete game state, as given to a referee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRefereeState {
    pub board: JsonBoard,
    pub spare: JsonTile,
    pub plmt: Vec<JsonRefereePlayer>,
    pub last: Option<(usize, Direction)>,
    /// Additional goals, handed out in order before players are sent home.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<Vec<JsonCoordinate>>,
}

/// A rotation of the spare tile, which is a multiple of 90 degrees on the wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Degrees(u8);

/// The response to a `take-turn` call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonChoice {
    Pass(PassToken),
    Move(usize, Direction, Degrees, JsonCoordinate),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassToken {
    #[serde(rename = "PASS")]
    Pass,
}

/// The response to calls that return nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Void {
    #[serde(rename = "void")]
    Void,
}

/// A call from the referee to a player.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    /// Tells the player its next goal. The state is only sent after the first
    /// call, i.e. once the game is running.
    Setup {
        state: Option<PublicGameState>,
        goal: Coordinate,
    },
    TakeTurn {
        state: PublicGameState,
    },
    Win {
        won: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
enum MethodName {
    #[serde(rename = "setup")]
    Setup,
    #[serde(rename = "take-turn")]
    TakeTurn,
    #[serde(rename = "win")]
    Win,
}

/// `false` on the wire, in place of the state in the first `setup` call.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "bool", into = "bool")]
struct NoState;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum SetupState {
    Initial(NoState),
    Update(JsonState),
}

/// The error type for data that does not describe a valid game.
#[derive(Debug)]
pub enum ProtocolError {
    /// Not valid JSON, or not of the expected shape.
    Malformed(serde_json::Error),
    NegativeCoordinate { coordinate: JsonCoordinate },
    /// The connector and treasure matrices have different shapes.
    MismatchedBoard,
    Board(BoardError),
    State(StateError),
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Malformed(err) => Some(err),
            ProtocolError::Board(err) => Some(err),
            ProtocolError::State(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Malformed(_) => write!(f, "Malformed message"),
            ProtocolError::NegativeCoordinate { coordinate } => write!(
                f,
                "Coordinates must be natural numbers, got ({}, {})",
                coordinate.row, coordinate.column
            ),
            ProtocolError::MismatchedBoard => {
                write!(f, "The connectors and treasures of the board have different shapes")
            }
            ProtocolError::Board(_) => write!(f, "Invalid board"),
            ProtocolError::State(_) => write!(f, "Invalid game state"),
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        ProtocolError::Malformed(err)
    }
}

impl From<BoardError> for ProtocolError {
    fn from(err: BoardError) -> Self {
        ProtocolError::Board(err)
    }
}

impl From<StateError> for ProtocolError {
    fn from(err: StateError) -> Self {
        ProtocolError::State(err)
    }
}

impl From<Coordinate> for JsonCoordinate {
    fn from(c: Coordinate) -> Self {
        Self {
            row: c.row.into(),
            column: c.column.into(),
        }
    }
}

impl TryFrom<JsonCoordinate> for Coordinate {
    type Error = ProtocolError;

    fn try_from(c: JsonCoordinate) -> Result<Self, Self::Error> {
        match (i32::try_from(c.row), i32::try_from(c.column)) {
            (Ok(row), Ok(column)) if row >= 0 && column >= 0 => Ok(Coordinate::new(row, column)),
            _ => Err(ProtocolError::NegativeCoordinate { coordinate: c }),
        }
    }
}

impl From<Tile> for JsonTile {
    fn from(tile: Tile) -> Self {
        let (first_gem, second_gem) = tile.treasure.gems();
        Self {
            tilekey: tile.connector,
            first_gem,
            second_gem,
        }
    }
}

impl From<JsonTile> for Tile {
    fn from(tile: JsonTile) -> Self {
        Tile::new(tile.tilekey, GemPair::new(tile.first_gem, tile.second_gem))
    }
}

impl From<&Board> for JsonBoard {
    fn from(board: &Board) -> Self {
        Self {
            connectors: board
                .rows()
                .map(|row| row.iter().map(|tile| tile.connector).collect())
                .collect(),
            treasures: board
                .rows()
                .map(|row| row.iter().map(|tile| tile.treasure.gems()).collect())
                .collect(),
        }
    }
}

impl TryFrom<JsonBoard> for Board {
    type Error = ProtocolError;

    fn try_from(board: JsonBoard) -> Result<Self, Self::Error> {
        let JsonBoard {
            connectors,
            treasures,
        } = board;
        let same_shape = connectors.len() == treasures.len()
            && connectors.iter().zip(&treasures).all(|(c, t)| c.len() == t.len());
        if !same_shape {
            return Err(ProtocolError::MismatchedBoard);
        }
        let rows = connectors
            .into_iter()
            .zip(treasures)
            .map(|(connectors, treasures)| {
                connectors
                    .into_iter()
                    .zip(treasures)
                    .map(|(connector, (a, b))| Tile::new(connector, GemPair::new(a, b)))
                    .collect()
            })
            .collect();
        Ok(Board::new(rows)?)
    }
}

impl From<&PlayerState> for JsonPlayer {
    fn from(player: &PlayerState) -> Self {
        Self {
            current: player.position.into(),
            home: player.home.into(),
            color: player.color.clone(),
        }
    }
}

impl TryFrom<JsonPlayer> for PlayerState {
    type Error = ProtocolError;

    fn try_from(player: JsonPlayer) -> Result<Self, Self::Error> {
        Ok(PlayerState::new(
            player.color,
            player.current.try_into()?,
            player.home.try_into()?,
        ))
    }
}

fn encode_last_slide(slide: Option<SlideAction>) -> Option<(usize, Direction)> {
    slide.map(|s| (s.index, s.direction))
}

fn decode_last_slide(last: Option<(usize, Direction)>) -> Option<SlideAction> {
    last.map(|(index, direction)| SlideAction::new(direction, index))
}

impl From<&PublicGameState> for JsonState {
    fn from(state: &PublicGameState) -> Self {
        Self {
            board: state.board().into(),
            spare: state.spare().into(),
            plmt: state.players().iter().map(JsonPlayer::from).collect(),
            last: encode_last_slide(state.last_slide()),
        }
    }
}

impl JsonState {
    pub fn into_public_state(self, config: &StateConfig) -> Result<PublicGameState, ProtocolError> {
        let players = self
            .plmt
            .into_iter()
            .map(PlayerState::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PublicGameState::new(
            self.board.try_into()?,
            self.spare.into(),
            players,
            decode_last_slide(self.last),
            config,
        )?)
    }
}

impl From<&GameState> for JsonRefereeState {
    fn from(state: &GameState) -> Self {
        let plmt = state
            .players()
            .iter()
            .map(|player| JsonRefereePlayer {
                player: player.into(),
                goto: state.goal(&player.color).unwrap_or(player.home).into(),
            })
            .collect();
        let goals = (!state.goal_sequence().is_empty())
            .then(|| state.goal_sequence().iter().map(|&g| g.into()).collect());
        Self {
            board: state.board().into(),
            spare: state.spare().into(),
            plmt,
            last: encode_last_slide(state.last_slide()),
            goals,
        }
    }
}

impl JsonRefereeState {
    pub fn into_game_state(self, config: &StateConfig) -> Result<GameState, ProtocolError> {
        let mut players = Vec::with_capacity(self.plmt.len());
        let mut private = BTreeMap::new();
        for JsonRefereePlayer { player, goto } in self.plmt {
            let player = PlayerState::try_from(player)?;
            private.insert(player.color.clone(), PrivatePlayerInfo::new(goto.try_into()?));
            players.push(player);
        }
        let goals = self
            .goals
            .unwrap_or_default()
            .into_iter()
            .map(Coordinate::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let public = PublicGameState::new(
            self.board.try_into()?,
            self.spare.into(),
            players,
            decode_last_slide(self.last),
            config,
        )?;
        Ok(GameState::new(public, private, goals, config)?)
    }
}

impl TryFrom<u16> for Degrees {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        match degrees {
            0 | 90 | 180 | 270 => Ok(Degrees((degrees / 90) as u8)),
            _ => Err(format!("{} is not a multiple of 90 below 360", degrees)),
        }
    }
}

impl From<Degrees> for u16 {
    fn from(degrees: Degrees) -> Self {
        u16::from(degrees.0) * 90
    }
}

impl TryFrom<bool> for NoState {
    type Error = &'static str;

    fn try_from(value: bool) -> Result<Self, Self::Error> {
        if value {
            Err("expected false or a state")
        } else {
            Ok(NoState)
        }
    }
}

impl From<NoState> for bool {
    fn from(_: NoState) -> Self {
        false
    }
}

impl From<Action> for JsonChoice {
    fn from(action: Action) -> Self {
        match action {
            Action::Pass => JsonChoice::Pass(PassToken::Pass),
            Action::Move { slide, destination } => JsonChoice::Move(
                slide.slide.index,
                slide.slide.direction,
                Degrees(slide.rotations % 4),
                destination.into(),
            ),
        }
    }
}

impl TryFrom<JsonChoice> for Action {
    type Error = ProtocolError;

    fn try_from(choice: JsonChoice) -> Result<Self, Self::Error> {
        match choice {
            JsonChoice::Pass(_) => Ok(Action::Pass),
            JsonChoice::Move(index, direction, Degrees(rotations), destination) => Ok(Action::Move {
                slide: SlideActionWithRotation::new(direction, index, rotations),
                destination: destination.try_into()?,
            }),
        }
    }
}

impl Call {
    /// Decodes a call, checking any states it contains against `config`.
    pub fn from_json(value: serde_json::Value, config: &StateConfig) -> Result<Self, ProtocolError> {
        let (method, args): (MethodName, serde_json::Value) = serde_json::from_value(value)?;
        match method {
            MethodName::Setup => {
                let (state, goal): (SetupState, JsonCoordinate) = serde_json::from_value(args)?;
                let state = match state {
                    SetupState::Initial(NoState) => None,
                    SetupState::Update(state) => Some(state.into_public_state(config)?),
                };
                Ok(Call::Setup {
                    state,
                    goal: goal.try_into()?,
                })
            }
            MethodName::TakeTurn => {
                let (state,): (JsonState,) = serde_json::from_value(args)?;
                Ok(Call::TakeTurn {
                    state: state.into_public_state(config)?,
                })
            }
            MethodName::Win => {
                let (won,): (bool,) = serde_json::from_value(args)?;
                Ok(Call::Win { won })
            }
        }
    }
}

impl Serialize for Call {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Call::Setup { state, goal } => {
                let state = match state {
                    Some(state) => SetupState::Update(state.into()),
                    None => SetupState::Initial(NoState),
                };
                (MethodName::Setup, (state, JsonCoordinate::from(*goal))).serialize(serializer)
            }
            Call::TakeTurn { state } => {
                (MethodName::TakeTurn, (JsonState::from(state),)).serialize(serializer)
            }
            Call::Win { won } => (MethodName::Win, (won,)).serialize(serializer),
        }
    }
}

/// Parses the response to a `take-turn` call.
pub fn parse_choice(line: &str) -> Result<Action, ProtocolError> {
    let choice: JsonChoice = serde_json::from_str(line)?;
    choice.try_into()
}

/// Parses the response to a `setup` or `win` call.
pub fn parse_void(line: &str) -> Result<(), ProtocolError> {
    let Void::Void = serde_json::from_str::<Void>(line)?;
    Ok(())
}
