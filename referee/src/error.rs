use labyrinth::StateError;

/// Why a player was removed from a game.
#[derive(Debug)]
pub enum AgentFault {
    /// The player did not answer within the referee's time limit.
    Timeout,
    /// The player answered with an error, or with something that could not
    /// be understood.
    Failed(anyhow::Error),
    /// The player chose an action that breaks the rules.
    IllegalAction(StateError),
}

impl std::error::Error for AgentFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AgentFault::Timeout => None,
            AgentFault::Failed(err) => Some(err.as_ref()),
            AgentFault::IllegalAction(err) => Some(err),
        }
    }
}

impl std::fmt::Display for AgentFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentFault::Timeout => write!(f, "Did not respond in time"),
            AgentFault::Failed(err) => write!(f, "Failed to respond: {:#}", err),
            AgentFault::IllegalAction(err) => write!(f, "Chose an illegal action: {}", err),
        }
    }
}
