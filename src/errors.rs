use thiserror::Error;

/// Errors surfaced by the POS core and its HTTP boundary.
#[derive(Debug, Error)]
pub enum PosError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("unknown menu item: `{0}`")]
    UnknownItem(String),

    #[error("unknown order: `{0}`")]
    UnknownOrder(String),

    #[error("invalid catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}

pub type PosResult<T> = Result<T, PosError>;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("connection error: {0}")]
    Connect(String),
}
