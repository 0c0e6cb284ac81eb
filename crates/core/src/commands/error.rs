use super::node::NodeId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Registration is closed, can not register {what}")]
    Frozen { what: String },
    #[error("A command manager has already been installed")]
    AlreadyInstalled,
}

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Redirect target '{path}' does not exist in the command graph")]
    UnknownRedirectTarget { path: String },
    #[error("The root of a command graph must be a literal node")]
    RootNotLiteral,
}

/// Structural inconsistencies found while serializing a tree. Any of these
/// aborts the packet for that requester.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Internal error (bug): node {node:?} is referenced but was never assigned an id")]
    UnassignedNode { node: NodeId },
    #[error("String of {len} bytes exceeds the maximum of {max}: '{value}'")]
    StringTooLong {
        value: String,
        len: usize,
        max: usize,
    },
    #[error("Command tree has {count} nodes, more than the protocol can address")]
    TooManyNodes { count: usize },
}

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Registration is still open, freeze the command manager before synthesizing")]
    RegistrationOpen,
    #[error("Command '{name}' is registered by both '{first}' and '{second}'")]
    DuplicatePrimary {
        name: String,
        first: String,
        second: String,
    },
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Why a registrar did not contribute a subtree.
#[derive(Debug, Error)]
pub enum ContributeError {
    #[error("{0:#}")]
    Failed(#[from] anyhow::Error),
    #[error("registrar panicked: {0}")]
    Panicked(String),
}
