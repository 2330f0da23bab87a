use std::convert::Infallible;
use std::str::FromStr;

use anyhow::bail;
use labyrinth::{Action, Coordinate, PublicGameState};
use tracing::debug;

use crate::Player;

/// The calls a player receives.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Method {
    Setup,
    TakeTurn,
    Win,
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "setUp" | "setup" => Ok(Method::Setup),
            "takeTurn" | "take-turn" => Ok(Method::TakeTurn),
            "win" => Ok(Method::Win),
            _ => Err(format!("Unknown method '{}'", s)),
        }
    }
}

/// How a [`FaultyPlayer`] misbehaves.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fault {
    /// Every call of the method returns an error.
    Fail,
    /// The n-th call of the method (counting from 1) never returns.
    Hang(usize),
}

/// Wraps a player and sabotages one of its methods.
pub struct FaultyPlayer<P> {
    inner: P,
    method: Method,
    fault: Fault,
    calls: usize,
}

impl<P: Player> FaultyPlayer<P> {
    pub fn new(inner: P, method: Method, fault: Fault) -> Self {
        Self {
            inner,
            method,
            fault,
            calls: 0,
        }
    }

    async fn sabotage(&mut self, method: Method) -> anyhow::Result<()> {
        if method != self.method {
            return Ok(());
        }
        self.calls += 1;
        match self.fault {
            Fault::Fail => bail!("{} fails on {:?}", self.inner.name(), method),
            Fault::Hang(n) if n == self.calls => {
                debug!(name: "Hanging", player = self.inner.name(), call = n);
                match std::future::pending::<Infallible>().await {}
            }
            Fault::Hang(_) => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl<P: Player> Player for FaultyPlayer<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn setup(&mut self, state: Option<PublicGameState>, goal: Coordinate) -> anyhow::Result<()> {
        self.sabotage(Method::Setup).await?;
        self.inner.setup(state, goal).await
    }

    async fn take_turn(&mut self, state: PublicGameState) -> anyhow::Result<Action> {
        self.sabotage(Method::TakeTurn).await?;
        self.inner.take_turn(state).await
    }

    async fn win(&mut self, won: bool) -> anyhow::Result<()> {
        self.sabotage(Method::Win).await?;
        self.inner.win(won).await
    }
}
