//! Driver-facing error kinds. Every variant is a caller mistake: validation
//! runs before mutation, so an `Err` implies the game state is untouched.

use thiserror::Error;

use crate::common::*;
use crate::score::ScoreError;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("a game needs exactly 4 seats, got {0}")]
    WrongSeatCount(usize),

    #[error("{seat} is not the active seat ({active} is)")]
    NotActiveSeat { seat: Seat, active: Seat },

    #[error("{seat} does not hold {tile}")]
    TileNotInHand { seat: Seat, tile: TileId },

    #[error("discarding {tile} right after the call is swap-calling (kuikae)")]
    KuikaeForbidden { tile: TileId },

    #[error("riichi requires the full 1000 points ({seat} holds {points})")]
    RiichiWithoutPoints { seat: Seat, points: GamePoints },

    #[error("{seat} cannot declare riichi over an open meld")]
    RiichiWithOpenMeld { seat: Seat },

    #[error("discarding {tile} would not leave {seat} tenpai")]
    RiichiNotTenpai { seat: Seat, tile: TileId },

    #[error("{seat} cannot call their own discard")]
    CannotCallOwnDiscard { seat: Seat },

    #[error("a {kind} takes {expected} tiles, got {got}")]
    WrongCallSize { kind: MeldKind, expected: usize, got: usize },

    #[error("call tiles do not form a valid {kind}")]
    MalformedCall { kind: MeldKind },

    #[error("chi is only allowed on the previous seat's discard")]
    NotNextSeat,

    #[error("the last discard of {seat} is not part of the call")]
    DiscardNotInCall { seat: Seat },

    #[error("{seat} has no pon to extend into an added kan")]
    NoPonToExtend { seat: Seat },

    #[error("{seat} cannot declare a nine-terminal draw: {reason}")]
    NineTerminalsUnavailable { seat: Seat, reason: &'static str },

    #[error("{seat} cannot tsumo: {source}")]
    CannotTsumo { seat: Seat, source: ScoreError },

    #[error("{seat} cannot ron: {source}")]
    CannotRon { seat: Seat, source: ScoreError },

    #[error("{seat} is furiten and cannot ron")]
    RonWhileFuriten { seat: Seat },

    #[error("{seat} has no discards to ron")]
    NoDiscards { seat: Seat },

    #[error("{seat} has no kan containing {tile} for chankan")]
    NoChankanTarget { seat: Seat, tile: TileId },

    #[error(transparent)]
    Wall(#[from] WallError),

    #[error(transparent)]
    Tile(#[from] ParseTileError),
}
